//! HTTP request handlers.

use super::AppState;
use crate::api::ApiError;
use crate::controller::FormPrompter;
use crate::view::{ConfirmTemplate, IndexTemplate, TableTemplate};

use askama::Template;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use rust_embed::RustEmbed;
use serde::Deserialize;

#[derive(RustEmbed)]
#[folder = "static/"]
struct Assets;

fn render(template: impl Template) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

pub async fn handle_index(State(state): State<AppState>) -> Response {
    let view = state.controller.view();
    let notices = state.take_notices();

    render(IndexTemplate::new(&view, &notices, state.config.refresh_interval))
}

pub async fn handle_table(State(state): State<AppState>) -> Response {
    let view = state.controller.view();
    render(TableTemplate::new(&view))
}

// ============================================================================
// Selection
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub checked: bool,
}

pub async fn handle_toggle_row(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ToggleForm>,
) -> Redirect {
    if !state.controller.toggle_row(id, form.checked) {
        tracing::debug!("Toggle for event {} which is no longer shown", id);
    }
    Redirect::to("/")
}

pub async fn handle_toggle_all(
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Redirect {
    state.controller.toggle_all(form.checked);
    Redirect::to("/")
}

// ============================================================================
// Deletion
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirmed: bool,
}

pub async fn handle_delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let prompter = FormPrompter::new(form.confirmed);
    state.controller.request_delete(id, &prompter).await;

    finish_action(&state, &prompter, &format!("/events/{}/delete", id))
}

pub async fn handle_delete_selected(
    State(state): State<AppState>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    let prompter = FormPrompter::new(form.confirmed);
    state.controller.delete_selected(&prompter).await;

    finish_action(&state, &prompter, "/events/delete-selected")
}

/// Ask for confirmation if the action stopped on a question, otherwise queue
/// its alerts and send the browser back to the table.
fn finish_action(state: &AppState, prompter: &FormPrompter, action: &str) -> Response {
    state.push_notices(prompter.take_alerts());

    match prompter.take_pending() {
        Some(question) => render(ConfirmTemplate {
            question: &question,
            action,
        }),
        None => Redirect::to("/").into_response(),
    }
}

// ============================================================================
// Snapshots
// ============================================================================

pub async fn handle_snapshot(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    if filename.is_empty() || filename == "." || filename == ".." || filename.contains(['/', '\\']) {
        return (StatusCode::BAD_REQUEST, "Invalid snapshot name").into_response();
    }

    match state.controller.api().fetch_snapshot(&filename).await {
        Ok(snapshot) => {
            let content_type = snapshot.content_type.unwrap_or_else(|| {
                mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .to_string()
            });
            ([(header::CONTENT_TYPE, content_type)], snapshot.bytes).into_response()
        }
        Err(ApiError::Http { status, .. }) => {
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY).into_response()
        }
        Err(e) => {
            tracing::warn!("Snapshot {} unavailable: {}", filename, e);
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

// ============================================================================
// Static Assets
// ============================================================================

pub async fn handle_static(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                file.data.into_owned(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn handle_health() -> impl IntoResponse {
    "EventDeck running"
}
