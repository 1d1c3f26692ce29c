//! Web server module.

mod handlers;

pub use handlers::*;

use crate::api::HttpEventsApi;
use crate::config::ServerConfig;
use crate::controller::EventListController;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub controller: Arc<EventListController<HttpEventsApi>>,
    /// Alerts raised by actions, shown once on the next page render.
    notices: Arc<Mutex<Vec<String>>>,
}

impl AppState {
    pub fn new(config: ServerConfig, controller: Arc<EventListController<HttpEventsApi>>) -> Self {
        Self {
            config,
            controller,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push_notices(&self, notices: Vec<String>) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(notices);
    }

    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Web server for the event console.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, controller: Arc<EventListController<HttpEventsApi>>) -> Self {
        Self {
            state: AppState::new(config, controller),
        }
    }

    /// Build the router with all routes.
    pub fn routes(&self) -> Router {
        Router::new()
            // Console
            .route("/", get(handlers::handle_index))
            .route("/table", get(handlers::handle_table))
            // Selection
            .route("/rows/toggle-all", post(handlers::handle_toggle_all))
            .route("/rows/{id}/toggle", post(handlers::handle_toggle_row))
            // Deletion
            .route("/events/delete-selected", post(handlers::handle_delete_selected))
            .route("/events/{id}/delete", post(handlers::handle_delete_event))
            // Snapshot proxy and assets
            .route("/snapshots/{filename}", get(handlers::handle_snapshot))
            .route("/static/{*path}", get(handlers::handle_static))
            .route("/health", get(handlers::handle_health))
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(64 * 1024))
            .with_state(self.state.clone())
    }

    /// Serve on the configured port until `shutdown` resolves.
    pub async fn start(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
