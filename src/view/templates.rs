//! askama templates for the console pages.

use super::{TableView, COLUMN_COUNT, IMAGE_ERROR_LABEL, NOT_AVAILABLE};

use askama::Template;
use std::time::Duration;

/// The event table on its own, for partial refreshes.
#[derive(Template)]
#[template(path = "table.html")]
pub struct TableTemplate<'a> {
    pub view: &'a TableView,
    pub columns: usize,
    pub not_available: &'static str,
    pub image_error: &'static str,
}

impl<'a> TableTemplate<'a> {
    pub fn new(view: &'a TableView) -> Self {
        Self {
            view,
            columns: COLUMN_COUNT,
            not_available: NOT_AVAILABLE,
            image_error: IMAGE_ERROR_LABEL,
        }
    }
}

/// Full console page: pending alerts, bulk controls and the table.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub view: &'a TableView,
    pub notices: &'a [String],
    pub refresh_secs: u64,
    pub columns: usize,
    pub not_available: &'static str,
    pub image_error: &'static str,
}

impl<'a> IndexTemplate<'a> {
    /// `refresh` is rounded up to whole seconds so the page never reloads
    /// ahead of the poller.
    pub fn new(view: &'a TableView, notices: &'a [String], refresh: Duration) -> Self {
        let refresh_secs = u64::try_from(refresh.as_millis().div_ceil(1000)).unwrap_or(u64::MAX);
        Self {
            view,
            notices,
            refresh_secs: refresh_secs.max(1),
            columns: COLUMN_COUNT,
            not_available: NOT_AVAILABLE,
            image_error: IMAGE_ERROR_LABEL,
        }
    }
}

/// Asks the operator to confirm a destructive action before re-posting it.
#[derive(Template)]
#[template(path = "confirm.html")]
pub struct ConfirmTemplate<'a> {
    pub question: &'a str,
    pub action: &'a str,
}
