// Session service - Single task owning the dashboard session
//
// Every trigger (manual capture, input change, auto-refresh tick) is funnelled
// through one channel and handled to completion before the next, so the
// history never needs a lock.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::application::dashboard_service::build_dashboard;
use crate::application::session::{CaptureOutcome, CellInput, DashboardSession};
use crate::domain::cell::CellReading;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;
use crate::domain::settings::{DashboardSettings, SettingsUpdate};
use crate::domain::telemetry::TelemetrySample;

const COMMAND_BUFFER: usize = 100;

enum SessionCommand {
    Capture(oneshot::Sender<CaptureOutcome>),
    UpdateSettings {
        update: SettingsUpdate,
        reply: oneshot::Sender<Result<DashboardSettings, DashboardError>>,
    },
    SetCell {
        cell: usize,
        input: CellInput,
        reply: oneshot::Sender<Result<CellReading, DashboardError>>,
    },
    History(oneshot::Sender<Vec<TelemetrySample>>),
    Dashboard(oneshot::Sender<Arc<Dashboard>>),
}

#[derive(Clone)]
pub struct SessionService {
    tx: mpsc::Sender<SessionCommand>,
    updates: watch::Receiver<Arc<Dashboard>>,
}

impl SessionService {
    /// Start the session loop. Ticks fire every `refresh_interval` and capture only
    /// while auto refresh is enabled.
    pub fn spawn(session: DashboardSession, refresh_interval: Duration) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (updates_tx, updates) = watch::channel(Arc::new(build_dashboard(&session)));
        let handle = tokio::spawn(run(session, rx, updates_tx, refresh_interval));
        (Self { tx, updates }, handle)
    }

    pub async fn capture(&self) -> Result<CaptureOutcome, DashboardError> {
        self.request(SessionCommand::Capture).await
    }

    pub async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<DashboardSettings, DashboardError> {
        self.request(|reply| SessionCommand::UpdateSettings { update, reply })
            .await?
    }

    pub async fn set_cell(&self, cell: usize, input: CellInput) -> Result<CellReading, DashboardError> {
        self.request(|reply| SessionCommand::SetCell { cell, input, reply })
            .await?
    }

    pub async fn history(&self) -> Result<Vec<TelemetrySample>, DashboardError> {
        self.request(SessionCommand::History).await
    }

    pub async fn dashboard(&self) -> Result<Arc<Dashboard>, DashboardError> {
        self.request(SessionCommand::Dashboard).await
    }

    /// Receiver that observes the dashboard rebuilt after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Dashboard>> {
        self.updates.clone()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, DashboardError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| DashboardError::SessionClosed)?;
        response.await.map_err(|_| DashboardError::SessionClosed)
    }
}

async fn run(
    mut session: DashboardSession,
    mut rx: mpsc::Receiver<SessionCommand>,
    updates: watch::Sender<Arc<Dashboard>>,
    refresh_interval: Duration,
) {
    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tracing::info!(
        interval_ms = refresh_interval.as_millis() as u64,
        "Dashboard session started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if session.settings().auto_refresh {
                    session.capture();
                    publish(&session, &updates);
                }
            }
            command = rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                handle_command(&mut session, command, &updates);
            }
        }
    }

    tracing::info!(history_len = session.history().len(), "Dashboard session stopped");
}

fn handle_command(
    session: &mut DashboardSession,
    command: SessionCommand,
    updates: &watch::Sender<Arc<Dashboard>>,
) {
    match command {
        SessionCommand::Capture(reply) => {
            let outcome = session.capture();
            publish(session, updates);
            let _ = reply.send(outcome);
        }
        SessionCommand::UpdateSettings { update, reply } => {
            let result = session.update_settings(&update);
            match &result {
                Ok(_) => publish(session, updates),
                Err(e) => tracing::debug!(error = %e, "Rejected settings update"),
            }
            let _ = reply.send(result);
        }
        SessionCommand::SetCell { cell, input, reply } => {
            let result = session.set_cell_input(cell, input);
            match &result {
                Ok(_) => publish(session, updates),
                Err(e) => tracing::debug!(cell, error = %e, "Rejected cell input"),
            }
            let _ = reply.send(result);
        }
        SessionCommand::History(reply) => {
            let _ = reply.send(session.history().snapshot());
        }
        SessionCommand::Dashboard(reply) => {
            let _ = reply.send(updates.borrow().clone());
        }
    }
}

fn publish(session: &DashboardSession, updates: &watch::Sender<Arc<Dashboard>>) {
    updates.send_replace(Arc::new(build_dashboard(session)));
}
