//! Local-to-UTC conversion.
//!
//! Timezone resolution is delegated: the engine only knows a location string
//! and a naive wall-clock time, and asks a [`TimeConverter`] for the matching
//! UTC instant. The interactive client plugs in a remote geolocation service;
//! [`TzDatabaseConverter`] resolves IANA zone names offline via `chrono-tz`.

use crate::dst::{self, DstPolicy};
use crate::error::{EngineError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Maps a wall-clock time at a location to an absolute UTC instant.
pub trait TimeConverter {
    fn to_utc(&self, location: &str, local: NaiveDateTime) -> Result<DateTime<Utc>>;
}

impl<T: TimeConverter + ?Sized> TimeConverter for &T {
    fn to_utc(&self, location: &str, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        (**self).to_utc(location, local)
    }
}

impl<T: TimeConverter + ?Sized> TimeConverter for Box<T> {
    fn to_utc(&self, location: &str, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        (**self).to_utc(location, local)
    }
}

/// Converter that treats locations as IANA timezone names
/// (e.g., "America/Los_Angeles", "Asia/Kolkata", "UTC").
#[derive(Debug, Clone, Copy, Default)]
pub struct TzDatabaseConverter {
    policy: DstPolicy,
}

impl TzDatabaseConverter {
    pub fn new(policy: DstPolicy) -> Self {
        Self { policy }
    }
}

impl TimeConverter for TzDatabaseConverter {
    fn to_utc(&self, location: &str, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        let tz: Tz = location
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(location.to_string()))?;

        dst::resolve_local(&tz, local, self.policy).ok_or_else(|| EngineError::Conversion {
            location: location.to_string(),
            reason: format!("{} does not exist (DST gap)", local),
        })
    }
}
