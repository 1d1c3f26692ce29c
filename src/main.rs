//! EventDeck - event console for a surveillance event API.
//!
//! Polls the API for recent events, serves them as a table and lets the
//! operator delete one or many of them.

mod api;
mod config;
mod controller;
mod scheduler;
mod view;
mod web;

use api::HttpEventsApi;
use config::ServerConfig;
use controller::EventListController;
use scheduler::{IntervalClock, Poller};
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("eventdeck=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting EventDeck on port {}...", cfg.http_port);
    tracing::info!("Using event API at {}", cfg.api_url);

    let api = HttpEventsApi::new(&cfg.api_url, cfg.request_timeout)?;
    let controller = Arc::new(EventListController::new(api, cfg.controller_options()));

    // First tick loads immediately, then every refresh interval
    let poller = Poller::start(controller.clone(), IntervalClock::new(cfg.refresh_interval));
    tracing::info!(
        "Refreshing every {} ms, {} events per page",
        cfg.refresh_interval.as_millis(),
        cfg.event_limit
    );

    let server = Server::new(cfg, controller);
    let result = server.start(shutdown_signal()).await;

    poller.stop().await;
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
