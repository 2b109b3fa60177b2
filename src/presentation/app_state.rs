// Application state for HTTP handlers
use tokio::sync::watch;

use crate::application::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionService,
    /// Flips to `true` once the server starts draining; long-lived streams end on it.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    /// Returns the state together with the sender that announces shutdown.
    pub fn new(session: SessionService) -> (Self, watch::Sender<bool>) {
        let (shutdown_tx, shutdown) = watch::channel(false);
        (Self { session, shutdown }, shutdown_tx)
    }
}
