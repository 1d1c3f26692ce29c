//! Cell formatting for event rows.

use crate::api::DetectedObject;

use chrono::{DateTime, Local, NaiveDateTime};
use std::fmt::Write;

/// Placeholder for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Object summaries shown per event before the rest are collapsed.
pub const MAX_LISTED_OBJECTS: usize = 3;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Format an ISO-8601 timestamp for display.
///
/// Offset-carrying timestamps are converted to local time; naive ones are
/// taken as already local. Unparseable input is shown verbatim.
pub fn format_timestamp(raw: Option<&str>, format: &str) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let mut out = String::new();
    let written = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        write!(out, "{}", dt.with_timezone(&Local).format(format))
    } else if let Some(dt) = parse_naive(raw) {
        write!(out, "{}", dt.format(format))
    } else {
        tracing::warn!("Could not parse timestamp {:?}", raw);
        return raw.to_string();
    };

    if written.is_err() {
        tracing::warn!("Could not format timestamp {:?} with {:?}", raw, format);
        return raw.to_string();
    }
    out
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Summarize one detected object, e.g. `ID: 4 - Class: car (Conf: 0.83)`.
pub fn format_object(obj: &DetectedObject) -> String {
    let track = match obj.track_id {
        Some(id) if id != 0 => format!("ID: {} - ", id),
        _ => String::new(),
    };
    let class = obj
        .class_name
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(NOT_AVAILABLE);
    let confidence = obj
        .confidence
        .map(|c| format!("{:.2}", c))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    format!("{}Class: {} (Conf: {})", track, class, confidence)
}

/// Lines for the details cell: the first few objects plus a count of the rest.
///
/// Returns an empty list when there is nothing to show.
pub fn format_object_details(details: &[DetectedObject]) -> Vec<String> {
    let mut lines: Vec<String> = details
        .iter()
        .take(MAX_LISTED_OBJECTS)
        .map(format_object)
        .collect();

    if details.len() > MAX_LISTED_OBJECTS {
        lines.push(format!("(+{} more objects)", details.len() - MAX_LISTED_OBJECTS));
    }
    lines
}

/// Last segment of a server path, accepting either separator.
///
/// `None` when the path ends in a separator.
pub fn filename_from_path(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\']).next().filter(|name| !name.is_empty())
}
