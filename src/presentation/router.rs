// Route table and server lifecycle
use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use tokio::net::TcpListener;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::application::session_service::SessionService;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    capture, dashboard_page, get_dashboard, get_history, health_check, stream_dashboard,
    submit_capture, submit_cell, submit_settings, update_cell, update_settings,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/history", get(get_history))
        .route("/capture", post(capture))
        .route("/settings", patch(update_settings))
        .route("/cells/:cell", put(update_cell))
        .route("/ui/settings", post(submit_settings))
        .route("/ui/cells/:cell", post(submit_cell))
        .route("/ui/capture", post(submit_capture))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves. Open dashboard streams are told to finish
/// before the server waits for in-flight connections to drain.
pub async fn serve(
    listener: TcpListener,
    session: SessionService,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let (state, shutdown_tx) = AppState::new(session);
    let router = build_router(Arc::new(state));

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            shutdown_tx.send_replace(true);
        })
        .await
}
