//! Client side of the upstream event API.
//!
//! The controller talks to the API through the [`EventsApi`] trait so it can
//! run against the real HTTP client or a scripted fake.

mod http;
mod models;

pub use http::*;
pub use models::*;

use std::future::Future;
use thiserror::Error;

/// Errors returned by event API calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never completed (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP error {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Http { status: u16, detail: Option<String> },
    /// A 2xx response whose body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// The configured API base URL is unusable.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// User-facing explanation: the server-provided detail, else the status.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Http { detail: Some(d), .. } => d.clone(),
            ApiError::Http { status, detail: None } => format!("HTTP error {}", status),
            ApiError::Network(msg) | ApiError::Decode(msg) | ApiError::InvalidUrl(msg) => msg.clone(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Operations the console needs from the event API.
pub trait EventsApi: Send + Sync + 'static {
    /// Fetch up to `limit` of the most recent events.
    fn list_events(&self, limit: u32) -> impl Future<Output = Result<Vec<Event>, ApiError>> + Send;

    /// Delete a single event. Any 2xx (including 204) is success.
    fn delete_event(&self, id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Delete several events in one request, returning the server's summary message.
    fn delete_events(
        &self,
        ids: &[i64],
    ) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;
}
