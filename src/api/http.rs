//! reqwest-backed implementation of the event API.

use super::{ApiError, BulkDeleteRequest, BulkDeleteResponse, ErrorBody, Event, EventsApi, EventsResponse};

use reqwest::{Client, Response, Url};
use std::time::Duration;

/// A snapshot image fetched from the upstream API.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// HTTP client for the upstream event API.
#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    client: Client,
    base: Url,
}

impl HttpEventsApi {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                base_url,
                base.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// Build an endpoint URL below the base, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{}: cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch a snapshot image by file name.
    pub async fn fetch_snapshot(&self, filename: &str) -> Result<Snapshot, ApiError> {
        let url = self.endpoint(&["api", "snapshots", filename])?;
        let response = self.client.get(url).send().await.map_err(network_error)?;
        let response = check_status(response).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(network_error)?;

        Ok(Snapshot {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

impl EventsApi for HttpEventsApi {
    async fn list_events(&self, limit: u32) -> Result<Vec<Event>, ApiError> {
        let mut url = self.endpoint(&["api", "events"])?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());

        let response = self.client.get(url).send().await.map_err(network_error)?;
        let response = check_status(response).await?;

        let body: EventsResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Decode(e.to_string())
            } else {
                network_error(e)
            }
        })?;

        Ok(body.events)
    }

    async fn delete_event(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "events", &id.to_string()])?;
        let response = self.client.delete(url).send().await.map_err(network_error)?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_events(&self, ids: &[i64]) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["api", "events", "delete-bulk"])?;
        let response = self
            .client
            .post(url)
            .json(&BulkDeleteRequest { event_ids: ids })
            .send()
            .await
            .map_err(network_error)?;
        let response = check_status(response).await?;

        // The summary is optional: a body that is not JSON still counts as success.
        let text = response.text().await.map_err(network_error)?;
        let message = serde_json::from_str::<BulkDeleteResponse>(&text)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());

        Ok(message)
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

/// Pass 2xx responses through; turn anything else into `ApiError::Http`.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
        .and_then(|body| body.detail_text());

    Err(ApiError::Http {
        status: status.as_u16(),
        detail,
    })
}
