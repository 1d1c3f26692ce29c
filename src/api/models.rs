//! Wire types for the upstream event API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Event type tag that carries per-object detection details.
pub const OBJECT_DETECTED: &str = "object_detected";

/// An event record as returned by `GET /api/events`.
///
/// Only `id` is required. Any other field with an unexpected shape decodes
/// as absent, so one odd record never fails the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub camera_id: Option<CameraId>,
    #[serde(default, deserialize_with = "lenient")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub triggering_class: Option<String>,
    /// `None` unless the API sent an array. The API passes stored details
    /// through as a raw string when they are not valid JSON.
    #[serde(default, deserialize_with = "lenient_objects")]
    pub object_details: Option<Vec<DetectedObject>>,
    #[serde(default, deserialize_with = "lenient")]
    pub snapshot_path: Option<String>,
}

/// One detected object attached to an `object_detected` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    #[serde(default, deserialize_with = "lenient")]
    pub track_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: Option<f64>,
}

/// Decode a field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode `object_details`: non-arrays are absent, malformed entries are blank objects.
fn lenient_objects<'de, D>(deserializer: D) -> Result<Option<Vec<DetectedObject>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Decode the event list, skipping records without a usable `id`.
fn lenient_events<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Skipping malformed event record: {}", e);
                None
            }
        })
        .collect())
}

/// Camera identifiers are opaque: sources report either names or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CameraId {
    Number(i64),
    Text(String),
}

impl CameraId {
    /// Whether the identifier carries no usable value (empty string or zero).
    pub fn is_blank(&self) -> bool {
        match self {
            CameraId::Number(n) => *n == 0,
            CameraId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraId::Number(n) => write!(f, "{}", n),
            CameraId::Text(s) => f.write_str(s),
        }
    }
}

/// Body of `GET /api/events`.
#[derive(Debug, Default, Deserialize)]
pub struct EventsResponse {
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Vec<Event>,
}

/// Body of `POST /api/events/delete-bulk`.
#[derive(Debug, Serialize)]
pub struct BulkDeleteRequest<'a> {
    pub event_ids: &'a [i64],
}

/// Success body of `POST /api/events/delete-bulk`.
#[derive(Debug, Default, Deserialize)]
pub struct BulkDeleteResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body the API attaches to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Flatten `detail` into text. Validation errors arrive as arrays of objects.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
