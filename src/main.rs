// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::theme_service::ThemeService;
use crate::infrastructure::config::load_theme_manager_config;
use crate::infrastructure::fs_dashboard_repository::FsDashboardRepository;
use crate::infrastructure::splunkd_reloader::SplunkdReloader;
use crate::infrastructure::theme_metadata_file::ThemeMetadataFile;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, theme_request};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_theme_manager_config()?;

    // Create adapters (infrastructure layer)
    let repository = Arc::new(FsDashboardRepository::new(config.splunk.home.clone()));
    let themes = Arc::new(ThemeMetadataFile::new(config.metadata_path()));
    let reloader = Arc::new(SplunkdReloader::new(
        &config.splunk.management_uri,
        config.reload_timeout(),
    )?);

    // Create services (application layer)
    let theme_service = ThemeService::new(
        repository,
        themes,
        reloader,
        config.themes.app.clone(),
        config.themes.default_source_app.clone(),
    );

    // Create application state
    let state = Arc::new(AppState { theme_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/services/apply_theme", post(theme_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen_addr))?;
    tracing::info!(
        %addr,
        splunk_home = %config.splunk.home.display(),
        "Starting dashboard theme service"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
