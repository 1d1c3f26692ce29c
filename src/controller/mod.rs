//! The event list view-controller.
//!
//! Owns the table view-model and applies API results to it. The table lock
//! is only held for synchronous updates, never across a request, so
//! overlapping loads and deletes each apply when they finish and the last
//! load to complete decides the table contents.

mod prompt;

pub use prompt::*;

use crate::api::EventsApi;
use crate::view::{EventRow, RenderOptions, SelectAllState, TableBody, TableState, TableView};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of events requested per load.
pub const DEFAULT_EVENT_LIMIT: u32 = 50;

/// Controller settings.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub limit: u32,
    pub render: RenderOptions,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_EVENT_LIMIT,
            render: RenderOptions::default(),
        }
    }
}

/// Result of a bulk delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkDeleteOutcome {
    /// Nothing was checked; no request was sent.
    NothingSelected,
    /// The operator did not confirm; no request was sent.
    Declined,
    /// The server accepted the request for this many ids.
    Deleted(usize),
    /// The request failed; rows were left in place.
    Failed,
}

/// Fetches, renders and deletes events through an [`EventsApi`].
pub struct EventListController<A> {
    api: A,
    options: ControllerOptions,
    table: Mutex<TableState>,
}

impl<A: EventsApi> EventListController<A> {
    pub fn new(api: A, options: ControllerOptions) -> Self {
        Self {
            api,
            options,
            table: Mutex::new(TableState::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn table(&self) -> MutexGuard<'_, TableState> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the table for rendering.
    pub fn view(&self) -> TableView {
        self.table().view()
    }

    /// Fetch the latest events and rebuild the table from them.
    ///
    /// Failures replace the table with an error row. Checkbox state is not
    /// carried over from the previous table.
    pub async fn load_and_render(&self) {
        let body = match self.api.list_events(self.options.limit).await {
            Ok(events) if events.is_empty() => TableBody::Empty,
            Ok(events) => TableBody::Rows(
                events
                    .iter()
                    .map(|e| EventRow::from_event(e, &self.options.render))
                    .collect(),
            ),
            Err(e) => {
                tracing::error!("Failed to load events: {}", e);
                TableBody::LoadFailed
            }
        };

        let mut table = self.table();
        table.body = body;
        table.refresh_selection();
    }

    /// Recompute the bulk-delete control, select-all state and row highlights.
    pub fn update_selection_ui(&self) {
        self.table().refresh_selection();
    }

    /// Set one row's checkbox. Returns `false` if no such row is shown.
    pub fn toggle_row(&self, id: i64, checked: bool) -> bool {
        let found = match self.table().rows_mut().iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.checked = checked;
                true
            }
            None => false,
        };
        self.update_selection_ui();
        found
    }

    /// Set every row's checkbox, as the select-all control does.
    pub fn toggle_all(&self, checked: bool) {
        for row in self.table().rows_mut() {
            row.checked = checked;
        }
        self.update_selection_ui();
    }

    /// Ids of checked rows in table order.
    pub fn selected_ids(&self) -> Vec<i64> {
        self.table().checked_ids()
    }

    /// Ask for confirmation, then delete one event.
    pub async fn request_delete(&self, id: i64, prompter: &dyn Prompter) -> bool {
        if !prompter.confirm(&format!("Are you sure you want to delete event ID {}?", id)) {
            return false;
        }
        self.delete_one(id, prompter).await
    }

    /// Delete one event and drop its row on success.
    pub async fn delete_one(&self, id: i64, prompter: &dyn Prompter) -> bool {
        match self.api.delete_event(id).await {
            Ok(()) => {
                tracing::info!("Deleted event {}", id);
                self.table().remove_row(id);
                self.update_selection_ui();
                true
            }
            Err(e) if e.is_network() => {
                tracing::error!("Network error deleting event {}: {}", id, e);
                prompter.alert("Network error while trying to delete the event.");
                false
            }
            Err(e) => {
                tracing::warn!("Failed to delete event {}: {}", id, e);
                prompter.alert(&format!("Failed to delete event {}: {}", id, e.detail()));
                false
            }
        }
    }

    /// Delete every checked event in a single request.
    pub async fn delete_selected(&self, prompter: &dyn Prompter) -> BulkDeleteOutcome {
        let ids = self.selected_ids();
        if ids.is_empty() {
            prompter.alert("Please select at least one event to delete.");
            return BulkDeleteOutcome::NothingSelected;
        }

        let question = format!(
            "Are you sure you want to delete the {} selected event(s)?",
            ids.len()
        );
        if !prompter.confirm(&question) {
            return BulkDeleteOutcome::Declined;
        }

        let outcome = match self.api.delete_events(&ids).await {
            Ok(message) => {
                tracing::info!("Bulk deleted events {:?}", ids);
                let message =
                    message.unwrap_or_else(|| format!("{} event(s) deleted successfully.", ids.len()));
                prompter.alert(&message);

                let mut table = self.table();
                for id in &ids {
                    table.remove_row(*id);
                }
                BulkDeleteOutcome::Deleted(ids.len())
            }
            Err(e) if e.is_network() => {
                tracing::error!("Network error during bulk delete: {}", e);
                prompter.alert("Network error while trying to bulk delete events.");
                BulkDeleteOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("Bulk delete failed: {}", e);
                prompter.alert(&format!("Bulk delete failed: {}", e.detail()));
                BulkDeleteOutcome::Failed
            }
        };

        let mut table = self.table();
        table.selection.select_all = SelectAllState::default();
        table.refresh_selection();
        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{events, FakeApi, ScriptedPrompter};
    use super::*;
    use crate::api::ApiError;
    use crate::view::{EMPTY_MESSAGE, LOAD_ERROR_MESSAGE};

    async fn loaded(ids: &[i64]) -> EventListController<FakeApi> {
        let controller =
            EventListController::new(FakeApi::with_events(events(ids)), ControllerOptions::default());
        controller.load_and_render().await;
        controller
    }

    fn row_ids(controller: &EventListController<FakeApi>) -> Vec<i64> {
        controller.view().rows().iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn test_load_requests_limit() {
        let controller = loaded(&[1, 2]).await;
        assert_eq!(controller.api().calls(), vec!["list 50"]);
        assert_eq!(row_ids(&controller), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_load_empty_shows_notice() {
        let controller = loaded(&[]).await;
        let view = controller.view();

        assert_eq!(view.body, TableBody::Empty);
        assert_eq!(view.body.notice(), Some(EMPTY_MESSAGE));
        assert!(view.selection.bulk_delete_disabled);
        assert_eq!(view.selection.bulk_delete_label, "Delete selected (0)");
    }

    #[tokio::test]
    async fn test_load_failure_shows_error_row() {
        let api = FakeApi::default();
        api.push_list(Err(ApiError::Http { status: 500, detail: None }));
        let controller = EventListController::new(api, ControllerOptions::default());
        controller.load_and_render().await;

        let view = controller.view();
        assert_eq!(view.body.notice(), Some(LOAD_ERROR_MESSAGE));
        assert!(view.selection.bulk_delete_disabled);
    }

    #[tokio::test]
    async fn test_reload_discards_checkbox_state() {
        let controller = loaded(&[1, 2]).await;
        controller.toggle_row(1, true);
        assert_eq!(controller.selected_ids(), vec![1]);

        controller.api().push_list(Ok(events(&[1, 2, 3])));
        controller.load_and_render().await;

        assert!(controller.selected_ids().is_empty());
        assert_eq!(row_ids(&controller), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_only_selected_row() {
        let controller = loaded(&[1, 2, 3]).await;
        controller.toggle_row(2, true);
        assert_eq!(controller.view().selection.bulk_delete_label, "Delete selected (1)");

        let prompter = ScriptedPrompter::answering(true);
        assert!(controller.delete_one(2, &prompter).await);

        let view = controller.view();
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.selection.bulk_delete_label, "Delete selected (0)");
        assert!(view.selection.bulk_delete_disabled);
        assert!(prompter.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_delete_one_http_error_alerts_detail() {
        let controller = loaded(&[1, 2]).await;
        controller.api().push_delete(Err(ApiError::Http {
            status: 404,
            detail: Some("Event with id 2 not found or could not be deleted.".into()),
        }));

        let prompter = ScriptedPrompter::answering(true);
        assert!(!controller.delete_one(2, &prompter).await);

        assert_eq!(
            prompter.alerts(),
            vec!["Failed to delete event 2: Event with id 2 not found or could not be deleted."]
        );
        assert_eq!(row_ids(&controller), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_delete_one_status_only() {
        let controller = loaded(&[1]).await;
        controller
            .api()
            .push_delete(Err(ApiError::Http { status: 503, detail: None }));

        let prompter = ScriptedPrompter::answering(true);
        controller.delete_one(1, &prompter).await;
        assert_eq!(prompter.alerts(), vec!["Failed to delete event 1: HTTP error 503"]);
    }

    #[tokio::test]
    async fn test_delete_one_network_error() {
        let controller = loaded(&[1]).await;
        controller
            .api()
            .push_delete(Err(ApiError::Network("connection refused".into())));

        let prompter = ScriptedPrompter::answering(true);
        controller.delete_one(1, &prompter).await;
        assert_eq!(
            prompter.alerts(),
            vec!["Network error while trying to delete the event."]
        );
        assert_eq!(row_ids(&controller), vec![1]);
    }

    #[tokio::test]
    async fn test_request_delete_declined() {
        let controller = loaded(&[4]).await;
        let prompter = ScriptedPrompter::answering(false);

        assert!(!controller.request_delete(4, &prompter).await);
        assert_eq!(
            prompter.questions(),
            vec!["Are you sure you want to delete event ID 4?"]
        );
        assert_eq!(controller.api().calls(), vec!["list 50"]);
    }

    #[tokio::test]
    async fn test_request_delete_confirmed() {
        let controller = loaded(&[4, 5]).await;
        let prompter = ScriptedPrompter::answering(true);

        assert!(controller.request_delete(4, &prompter).await);
        assert_eq!(row_ids(&controller), vec![5]);
        assert_eq!(controller.api().calls(), vec!["list 50", "delete 4"]);
    }

    #[tokio::test]
    async fn test_bulk_delete_nothing_selected() {
        let controller = loaded(&[1, 2]).await;
        let prompter = ScriptedPrompter::answering(true);

        let outcome = controller.delete_selected(&prompter).await;
        assert_eq!(outcome, BulkDeleteOutcome::NothingSelected);
        assert_eq!(
            prompter.alerts(),
            vec!["Please select at least one event to delete."]
        );
        assert!(prompter.questions().is_empty());
        assert_eq!(controller.api().calls(), vec!["list 50"]);
    }

    #[tokio::test]
    async fn test_bulk_delete_declined_keeps_selection() {
        let controller = loaded(&[1, 2]).await;
        controller.toggle_all(true);
        let prompter = ScriptedPrompter::answering(false);

        let outcome = controller.delete_selected(&prompter).await;
        assert_eq!(outcome, BulkDeleteOutcome::Declined);
        assert_eq!(
            prompter.questions(),
            vec!["Are you sure you want to delete the 2 selected event(s)?"]
        );
        assert_eq!(controller.selected_ids(), vec![1, 2]);
        assert!(controller.view().selection.select_all.checked);
    }

    #[tokio::test]
    async fn test_bulk_delete_success_with_message() {
        let controller = loaded(&[1, 2, 3]).await;
        controller.toggle_row(1, true);
        controller.toggle_row(3, true);
        controller
            .api()
            .push_bulk(Ok(Some("Successfully deleted 2 event(s).".into())));

        let prompter = ScriptedPrompter::answering(true);
        let outcome = controller.delete_selected(&prompter).await;

        assert_eq!(outcome, BulkDeleteOutcome::Deleted(2));
        assert_eq!(prompter.alerts(), vec!["Successfully deleted 2 event(s)."]);
        assert_eq!(controller.api().calls(), vec!["list 50", "bulk [1, 3]"]);

        let view = controller.view();
        assert_eq!(row_ids(&controller), vec![2]);
        assert_eq!(view.selection.select_all, SelectAllState::default());
        assert!(view.selection.bulk_delete_disabled);
    }

    #[tokio::test]
    async fn test_bulk_delete_default_message() {
        let controller = loaded(&[1, 2]).await;
        controller.toggle_all(true);

        let prompter = ScriptedPrompter::answering(true);
        controller.delete_selected(&prompter).await;

        assert_eq!(prompter.alerts(), vec!["2 event(s) deleted successfully."]);
        assert!(controller.view().rows().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_delete_failure_keeps_rows() {
        let controller = loaded(&[1, 2, 3]).await;
        controller.toggle_row(1, true);
        controller.toggle_row(2, true);
        controller
            .api()
            .push_bulk(Err(ApiError::Http { status: 500, detail: None }));

        let prompter = ScriptedPrompter::answering(true);
        let outcome = controller.delete_selected(&prompter).await;

        assert_eq!(outcome, BulkDeleteOutcome::Failed);
        assert_eq!(prompter.alerts(), vec!["Bulk delete failed: HTTP error 500"]);
        assert_eq!(row_ids(&controller), vec![1, 2, 3]);

        let selection = controller.view().selection;
        assert_eq!(selection.selected_count, 2);
        assert!(selection.select_all.indeterminate);
    }

    #[tokio::test]
    async fn test_bulk_delete_network_error() {
        let controller = loaded(&[1]).await;
        controller.toggle_all(true);
        controller
            .api()
            .push_bulk(Err(ApiError::Network("timed out".into())));

        let prompter = ScriptedPrompter::answering(true);
        let outcome = controller.delete_selected(&prompter).await;

        assert_eq!(outcome, BulkDeleteOutcome::Failed);
        assert_eq!(
            prompter.alerts(),
            vec!["Network error while trying to bulk delete events."]
        );
    }

    #[tokio::test]
    async fn test_select_all_then_unselect_one() {
        let controller = loaded(&[1, 2, 3]).await;

        controller.toggle_all(true);
        let state = controller.view().selection.select_all;
        assert!(state.checked);
        assert!(!state.indeterminate);

        assert!(controller.toggle_row(2, false));
        let state = controller.view().selection.select_all;
        assert!(!state.checked);
        assert!(state.indeterminate);

        controller.toggle_all(false);
        assert_eq!(controller.view().selection.select_all, SelectAllState::default());
    }

    #[tokio::test]
    async fn test_toggle_unknown_row() {
        let controller = loaded(&[1]).await;
        assert!(!controller.toggle_row(99, true));
        assert!(controller.selected_ids().is_empty());
    }

    #[tokio::test]
    async fn test_row_highlight_follows_checkbox() {
        let controller = loaded(&[1, 2]).await;
        controller.toggle_row(2, true);

        let view = controller.view();
        let flags: Vec<_> = view.rows().iter().map(|r| (r.checked, r.selected)).collect();
        assert_eq!(flags, vec![(false, false), (true, true)]);
    }
}
