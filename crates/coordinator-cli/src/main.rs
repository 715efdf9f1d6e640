//! `coordinator` CLI — find a common meeting window across timezones.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve free-text locations through the remote service (reads API_KEY.txt)
//! coordinator
//!
//! # Use a different credential file
//! coordinator --api-key-file ~/.config/coordinator/key.txt
//!
//! # Offline: locations are IANA zone names, no API key needed
//! coordinator --offline
//!
//! # Pin the reference date instead of using today
//! coordinator --offline --date 2026-03-16
//! ```
//!
//! Then, at the `command:` prompt: `add`, `run`, `vis`, `clear`, `help`, `quit`.

mod abstract_api;
mod config;
mod repl;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use window_engine::{Session, TimeConverter, TzDatabaseConverter};

use crate::abstract_api::AbstractApiConverter;
use crate::config::{Backend, Settings};
use crate::repl::Repl;

#[derive(Parser)]
#[command(
    name = "coordinator",
    version,
    about = "Find a common meeting window across constraints in different timezones"
)]
struct Cli {
    /// File whose first line is the conversion service API key
    #[arg(long, default_value_os_t = config::default_api_key_file())]
    api_key_file: PathBuf,

    /// Conversion service endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Attempts per conversion before giving up (transient failures only)
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Resolve locations as IANA timezone names locally instead of calling the service
    #[arg(long)]
    offline: bool,

    /// Reference date for all constraints (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;

    let converter: Box<dyn TimeConverter> = match &settings.backend {
        Backend::Offline => {
            info!("using offline IANA timezone resolution");
            Box::new(TzDatabaseConverter::default())
        }
        Backend::Remote {
            api_key,
            endpoint,
            timeout,
            retry,
        } => {
            info!(endpoint = %endpoint, ?timeout, attempts = retry.max_attempts, "using remote conversion service");
            Box::new(AbstractApiConverter::new(endpoint, api_key, *timeout, *retry)?)
        }
    };

    let session = Session::new(converter, settings.reference_date);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(stdin.lock(), stdout.lock(), session);
    repl.run()?;
    info!(
        constraints = repl.session().constraint_count(),
        "session finished"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init();
}
