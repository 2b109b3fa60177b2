// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::session::DashboardSession;
use crate::application::session_service::SessionService;
use crate::infrastructure::config::load_app_config;
use crate::presentation::router::serve;

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,battery_dashboard=info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing()?;

    // Load configuration
    let app_config = load_app_config()?;
    let addr = app_config.bind_addr()?;

    // Create the session (application layer)
    let session = DashboardSession::new(app_config.dashboard.clone())?;
    let (session, session_task) = SessionService::spawn(session, app_config.refresh_interval());

    // Start server (presentation layer)
    tracing::info!(%addr, "Starting battery-dashboard service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, session, shutdown_signal()).await?;

    session_task.abort();
    Ok(())
}
