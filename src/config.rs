//! Configuration module for EventDeck.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::controller::{ControllerOptions, DEFAULT_EVENT_LIMIT};
use crate::scheduler::DEFAULT_REFRESH_INTERVAL;
use crate::view::RenderOptions;

use chrono::format::{Item, StrftimeItems};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Largest page the upstream API will serve.
pub const MAX_EVENT_LIMIT: u32 = 200;

/// Configuration value errors.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name}: cannot parse {value:?}")]
    Parse { name: &'static str, value: String },
    #[error("{name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the console (default: 8080)
    pub http_port: u16,
    /// Base URL of the upstream event API (default: "http://127.0.0.1:8000")
    pub api_url: String,
    /// Time between table refreshes (default: 5000 ms)
    pub refresh_interval: Duration,
    /// Events requested per refresh (default: 50, at most 200)
    pub event_limit: u32,
    /// Timeout for upstream requests (default: 10 s)
    pub request_timeout: Duration,
    /// chrono format for the timestamp column
    pub timestamp_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            api_url: "http://127.0.0.1:8000".to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            event_limit: DEFAULT_EVENT_LIMIT,
            request_timeout: Duration::from_secs(10),
            timestamp_format: RenderOptions::default().timestamp_format,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EVENTDECK_HTTP_PORT`: console port (default: 8080)
    /// - `EVENTDECK_API_URL`: upstream API base URL (default: "http://127.0.0.1:8000")
    /// - `EVENTDECK_REFRESH_MS`: refresh interval in milliseconds (default: 5000)
    /// - `EVENTDECK_EVENT_LIMIT`: events per refresh, 1..=200 (default: 50)
    /// - `EVENTDECK_REQUEST_TIMEOUT_SECS`: upstream timeout (default: 10)
    /// - `EVENTDECK_TIMESTAMP_FORMAT`: chrono format string for timestamps
    ///
    /// Invalid values are logged and the default is kept.
    pub fn load() -> Self {
        Self::load_from(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        apply(parse_var(&lookup, "EVENTDECK_HTTP_PORT"), |port| cfg.http_port = port);

        if let Some(url) = lookup("EVENTDECK_API_URL").filter(|u| !u.trim().is_empty()) {
            cfg.api_url = url.trim().to_string();
        }

        apply(
            parse_var::<u64>(&lookup, "EVENTDECK_REFRESH_MS").and_then(|ms| match ms {
                Some(0) => Err(ConfigError::Invalid {
                    name: "EVENTDECK_REFRESH_MS",
                    reason: "interval must be positive".to_string(),
                }),
                other => Ok(other),
            }),
            |ms| cfg.refresh_interval = Duration::from_millis(ms),
        );

        apply(
            parse_var::<u32>(&lookup, "EVENTDECK_EVENT_LIMIT"),
            |limit| cfg.event_limit = limit.clamp(1, MAX_EVENT_LIMIT),
        );

        apply(
            parse_var::<u64>(&lookup, "EVENTDECK_REQUEST_TIMEOUT_SECS"),
            |secs| cfg.request_timeout = Duration::from_secs(secs.max(1)),
        );

        if let Some(format) = lookup("EVENTDECK_TIMESTAMP_FORMAT") {
            match validate_timestamp_format(&format) {
                Ok(()) => cfg.timestamp_format = format,
                Err(e) => tracing::warn!("Ignoring invalid setting: {}", e),
            }
        }

        cfg
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            limit: self.event_limit,
            render: RenderOptions {
                timestamp_format: self.timestamp_format.clone(),
            },
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse { name, value: raw }),
    }
}

fn apply<T>(value: Result<Option<T>, ConfigError>, set: impl FnOnce(T)) {
    match value {
        Ok(Some(v)) => set(v),
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring invalid setting: {}", e),
    }
}

/// Reject chrono format strings that would fail at render time.
pub fn validate_timestamp_format(format: &str) -> Result<(), ConfigError> {
    if format.is_empty() {
        return Err(ConfigError::Invalid {
            name: "EVENTDECK_TIMESTAMP_FORMAT",
            reason: "format is empty".to_string(),
        });
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::Invalid {
            name: "EVENTDECK_TIMESTAMP_FORMAT",
            reason: format!("unsupported specifier in {:?}", format),
        });
    }
    Ok(())
}
