//! Table view-model for the event list.
//!
//! The controller owns a [`TableState`]; renderers only ever see immutable
//! [`TableView`] snapshots of it.

mod format;
mod templates;

pub use format::*;
pub use templates::*;

use crate::api::{Event, OBJECT_DETECTED};

use reqwest::Url;

/// Columns in the event table, used for notice rows that span the table.
pub const COLUMN_COUNT: usize = 7;

pub const EMPTY_MESSAGE: &str = "No events recorded.";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load event data.";

/// How event fields are turned into cell text.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// chrono format string for the timestamp column.
    pub timestamp_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timestamp_format: "%H:%M:%S %d/%m/%Y".to_string(),
        }
    }
}

/// What the snapshot column shows for an event.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotCell {
    /// Thumbnail served through the console's snapshot proxy.
    Image { url: String },
    /// The event has a path but no file name could be taken from it.
    PathError,
    /// The event has no snapshot.
    Missing,
}

impl SnapshotCell {
    pub fn from_path(path: Option<&str>) -> Self {
        match path.filter(|p| !p.is_empty()) {
            None => SnapshotCell::Missing,
            Some(p) => match filename_from_path(p) {
                Some(name) => SnapshotCell::Image {
                    url: snapshot_href(name),
                },
                None => SnapshotCell::PathError,
            },
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            SnapshotCell::Image { url } => Some(url),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SnapshotCell::Image { .. } => "",
            SnapshotCell::PathError => "Path error",
            SnapshotCell::Missing => "None",
        }
    }
}

/// Shown in place of a thumbnail the browser failed to load.
pub const IMAGE_ERROR_LABEL: &str = "Image error";

/// Console-relative URL for a snapshot, with the file name percent-encoded.
pub fn snapshot_href(filename: &str) -> String {
    match Url::parse("http://console.local/snapshots/") {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(filename);
            }
            url.path().to_string()
        }
        Err(_) => format!("/snapshots/{}", filename),
    }
}

/// One rendered event row.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub id: i64,
    /// Checkbox state; the source of truth for selection.
    pub checked: bool,
    /// Row highlight, kept in step with `checked` by the selection update.
    pub selected: bool,
    pub timestamp: String,
    pub camera: String,
    pub event_type: String,
    /// Detail lines; empty renders as `N/A`.
    pub details: Vec<String>,
    pub snapshot: SnapshotCell,
}

impl EventRow {
    pub fn from_event(event: &Event, options: &RenderOptions) -> Self {
        let camera = event
            .camera_id
            .as_ref()
            .filter(|c| !c.is_blank())
            .map(|c| c.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let mut event_type = event
            .event_type
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        if let Some(class) = event.triggering_class.as_deref().filter(|c| !c.is_empty()) {
            event_type = format!("{} ({})", event_type, class);
        }

        let details = match (&event.event_type, &event.object_details) {
            (Some(t), Some(objects)) if t == OBJECT_DETECTED => format_object_details(objects),
            _ => Vec::new(),
        };

        Self {
            id: event.id,
            checked: false,
            selected: false,
            timestamp: format_timestamp(event.timestamp.as_deref(), &options.timestamp_format),
            camera,
            event_type,
            details,
            snapshot: SnapshotCell::from_path(event.snapshot_path.as_deref()),
        }
    }
}

/// Contents of the table body.
#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Rows(Vec<EventRow>),
    /// The API returned no events.
    Empty,
    /// The last load failed.
    LoadFailed,
}

impl TableBody {
    pub fn rows(&self) -> &[EventRow] {
        match self {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Message for a single spanning row, if the body is a notice.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            TableBody::Rows(_) => None,
            TableBody::Empty => Some(EMPTY_MESSAGE),
            TableBody::LoadFailed => Some(LOAD_ERROR_MESSAGE),
        }
    }
}

/// Tri-state of the select-all checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectAllState {
    pub checked: bool,
    pub indeterminate: bool,
}

/// Aggregate selection controls derived from row checkboxes.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionUi {
    pub selected_count: usize,
    pub bulk_delete_disabled: bool,
    pub bulk_delete_label: String,
    pub select_all: SelectAllState,
}

impl Default for SelectionUi {
    fn default() -> Self {
        Self {
            selected_count: 0,
            bulk_delete_disabled: true,
            bulk_delete_label: bulk_delete_label(0),
            select_all: SelectAllState::default(),
        }
    }
}

pub fn bulk_delete_label(count: usize) -> String {
    format!("Delete selected ({})", count)
}

/// Mutable table state owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub body: TableBody,
    pub selection: SelectionUi,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            body: TableBody::Rows(Vec::new()),
            selection: SelectionUi::default(),
        }
    }
}

impl TableState {
    pub fn rows_mut(&mut self) -> &mut [EventRow] {
        match &mut self.body {
            TableBody::Rows(rows) => rows,
            _ => &mut [],
        }
    }

    /// Remove the row for `id`. Returns whether a row was removed.
    pub fn remove_row(&mut self, id: i64) -> bool {
        match &mut self.body {
            TableBody::Rows(rows) => {
                let before = rows.len();
                rows.retain(|r| r.id != id);
                rows.len() != before
            }
            _ => false,
        }
    }

    /// Ids of checked rows, in table order.
    pub fn checked_ids(&self) -> Vec<i64> {
        self.body
            .rows()
            .iter()
            .filter(|r| r.checked)
            .map(|r| r.id)
            .collect()
    }

    /// Recompute the aggregate controls and row highlights from checkboxes.
    pub fn refresh_selection(&mut self) {
        let rows = self.rows_mut();
        let total = rows.len();
        let mut selected = 0;
        for row in rows.iter_mut() {
            row.selected = row.checked;
            if row.checked {
                selected += 1;
            }
        }

        let select_all = if total > 0 && selected == total {
            SelectAllState { checked: true, indeterminate: false }
        } else if selected > 0 {
            SelectAllState { checked: false, indeterminate: true }
        } else {
            SelectAllState::default()
        };

        self.selection = SelectionUi {
            selected_count: selected,
            bulk_delete_disabled: selected == 0,
            bulk_delete_label: bulk_delete_label(selected),
            select_all,
        };
    }

    pub fn view(&self) -> TableView {
        TableView {
            body: self.body.clone(),
            selection: self.selection.clone(),
        }
    }
}

/// Immutable snapshot handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub body: TableBody,
    pub selection: SelectionUi,
}

impl TableView {
    pub fn rows(&self) -> &[EventRow] {
        self.body.rows()
    }
}
