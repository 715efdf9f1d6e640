//! Remote conversion through the Abstract API timezone service.
//!
//! One GET per conversion. The service geolocates free-text location names,
//! so no zone names are resolved locally. Greenwich is used as the target
//! location; its reported `gmt_offset` is subtracted so the result stays true
//! UTC while the UK is on summer time.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, Utc};
use reqwest::blocking::Client as BlockingClient;
use reqwest::StatusCode;
use serde::Deserialize;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use window_engine::error::Result as EngineResult;
use window_engine::{EngineError, TimeConverter};

pub const DEFAULT_ENDPOINT: &str = "https://timezone.abstractapi.com/v1/convert_time/";
pub const TARGET_LOCATION: &str = "Greenwich, United Kingdom";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Retry schedule for transient failures (transport errors, 429 and 5xx).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base, 2×base, 4×base, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

pub struct AbstractApiConverter {
    http: BlockingClient,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl AbstractApiConverter {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> anyhow::Result<Self> {
        let http = BlockingClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            retry,
        })
    }

    /// Fetch the raw response body, retrying transient failures.
    fn fetch(&self, location: &str, base_datetime: &str) -> Result<String, String> {
        let mut attempt = 1;
        loop {
            debug!(location, base_datetime, attempt, "sending conversion request");
            let outcome = self
                .http
                .get(&self.endpoint)
                .query(&[
                    ("api_key", self.api_key.as_str()),
                    ("base_location", location),
                    ("base_datetime", base_datetime),
                    ("target_location", TARGET_LOCATION),
                ])
                .send();

            let retryable = match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!(%status, "conversion request completed");
                        return response
                            .text()
                            .map_err(|e| format!("failed to read response body: {}", e));
                    }
                    warn!(%status, location, "conversion request failed");
                    if !is_transient(status) {
                        return Err(format!(
                            "service returned status {} (check the location name)",
                            status
                        ));
                    }
                    if attempt >= self.retry.max_attempts {
                        return Err(format!("service returned status {}", status));
                    }
                    format!("status {}", status)
                }
                Err(e) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(format!("request failed: {}", e));
                    }
                    e.to_string()
                }
            };

            let delay = self.retry.delay_for(attempt);
            warn!(reason = %retryable, ?delay, attempt, "retrying conversion request");
            thread::sleep(delay);
            attempt += 1;
        }
    }
}

impl TimeConverter for AbstractApiConverter {
    fn to_utc(&self, location: &str, local: NaiveDateTime) -> EngineResult<DateTime<Utc>> {
        let base_datetime = local.format(DATETIME_FORMAT).to_string();
        self.fetch(location, &base_datetime)
            .and_then(|body| parse_response(&body))
            .map_err(|reason| EngineError::Conversion {
                location: location.to_string(),
                reason,
            })
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[derive(Debug, Deserialize)]
struct ConvertTimeResponse {
    target_location: Option<LocationTime>,
}

#[derive(Debug, Deserialize)]
struct LocationTime {
    datetime: String,
    #[serde(default)]
    gmt_offset: Option<f64>,
}

/// Extract the UTC instant from a `convert_time` response body.
fn parse_response(body: &str) -> Result<DateTime<Utc>, String> {
    let response: ConvertTimeResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed response JSON: {}", e))?;
    let target = response
        .target_location
        .ok_or_else(|| "response has no target_location (unknown location?)".to_string())?;

    let wall_clock = NaiveDateTime::parse_from_str(&target.datetime, DATETIME_FORMAT)
        .map_err(|e| format!("unparseable datetime '{}': {}", target.datetime, e))?;
    let offset_minutes = target
        .gmt_offset
        .map(|hours| (hours * 60.0).round() as i64)
        .unwrap_or(0);

    Ok((wall_clock - ChronoDuration::minutes(offset_minutes)).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serve `status` and `body` to every connection on a local port.
    /// Returns the endpoint URL and a counter of requests received.
    fn serve(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/convert_time/", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (endpoint, hits)
    }

    fn converter(endpoint: &str, max_attempts: u32) -> AbstractApiConverter {
        AbstractApiConverter::new(
            endpoint,
            "key",
            Duration::from_secs(5),
            RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(1),
            },
        )
        .unwrap()
    }

    fn morning() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 7, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_target_datetime_in_winter() {
        let body = r#"{
            "base_location": {"datetime": "2026-01-15 09:00:00", "gmt_offset": 9},
            "target_location": {"datetime": "2026-01-15 00:00:00", "gmt_offset": 0}
        }"#;
        assert_eq!(
            parse_response(body).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn removes_british_summer_time() {
        let body = r#"{"target_location": {"datetime": "2026-07-15 13:00:00", "gmt_offset": 1}}"#;
        assert_eq!(
            parse_response(body).unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_offset_means_utc() {
        let body = r#"{"target_location": {"datetime": "2026-03-16 08:30:00"}}"#;
        assert_eq!(
            parse_response(body).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 16, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(parse_response("[]").is_err());
        assert!(parse_response("{}").unwrap_err().contains("target_location"));
        assert!(parse_response("not json").unwrap_err().contains("malformed"));
    }

    #[test]
    fn bad_datetime_is_an_error() {
        let body = r#"{"target_location": {"datetime": "16/03/2026 08:30"}}"#;
        assert!(parse_response(body).unwrap_err().contains("16/03/2026 08:30"));
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1000));
    }

    #[test]
    fn only_throttling_and_server_errors_are_transient() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::BAD_GATEWAY));
        assert!(!is_transient(StatusCode::BAD_REQUEST));
        assert!(!is_transient(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn unreachable_endpoint_becomes_conversion_error() {
        let converter = AbstractApiConverter::new(
            "http://127.0.0.1:9/convert_time/",
            "key",
            Duration::from_millis(200),
            RetryPolicy {
                max_attempts: 1,
                base_delay: Duration::from_millis(1),
            },
        )
        .unwrap();
        let local = chrono::NaiveDate::from_ymd_opt(2026, 3, 16)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let err = converter.to_utc("Tokyo, Japan", local).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Conversion { ref location, .. } if location == "Tokyo, Japan"
        ));
    }

    #[test]
    fn server_error_is_retried_then_aborts() {
        let (endpoint, hits) = serve("500 Internal Server Error", "{}");
        let err = converter(&endpoint, 3)
            .to_utc("Tokyo, Japan", morning())
            .unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        match err {
            EngineError::Conversion { reason, .. } => {
                assert!(reason.contains("500"));
                assert!(!reason.contains("location name"));
            }
            other => panic!("expected Conversion, got {other:?}"),
        }
    }

    #[test]
    fn throttling_is_retried() {
        let (endpoint, hits) = serve("429 Too Many Requests", "{}");
        assert!(converter(&endpoint, 2).to_utc("Tokyo, Japan", morning()).is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn client_error_aborts_without_retry() {
        let (endpoint, hits) = serve("400 Bad Request", "{}");
        let err = converter(&endpoint, 3)
            .to_utc("Nowhere at all", morning())
            .unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        match err {
            EngineError::Conversion { location, reason } => {
                assert_eq!(location, "Nowhere at all");
                assert!(reason.contains("400"));
                assert!(reason.contains("check the location name"));
            }
            other => panic!("expected Conversion, got {other:?}"),
        }
    }

    #[test]
    fn success_is_corrected_for_summer_time() {
        let (endpoint, hits) = serve(
            "200 OK",
            r#"{"target_location": {"datetime": "2026-07-15 01:00:00", "gmt_offset": 1}}"#,
        );
        let utc = converter(&endpoint, 3)
            .to_utc("Tokyo, Japan", morning())
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 7, 15, 0, 0, 0).unwrap());
    }
}
