// HTTP request handlers
use crate::application::session::{CaptureOutcome, CellInput};
use crate::domain::cell::CellReading;
use crate::domain::dashboard::Dashboard;
use crate::domain::settings::{DashboardSettings, SettingsUpdate};
use crate::domain::telemetry::TelemetrySample;
use crate::infrastructure::html::render_dashboard;
use crate::infrastructure::http_response::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{
        Html, Redirect,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_extra::extract::WithRejection;
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Rendered dashboard page
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let dashboard = state.session.dashboard().await?;
    let body = render_dashboard(&dashboard)?;
    Ok(Html(body))
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = state.session.dashboard().await?;
    Ok(Json(Dashboard::clone(&dashboard)))
}

/// Push the dashboard to the client every time the session changes.
/// The stream ends when the session stops or the server begins shutting down.
pub async fn stream_dashboard(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut updates = state.session.subscribe();
    let mut shutdown = state.shutdown.clone();

    let stream = async_stream::stream! {
        loop {
            let payload = {
                let dashboard = updates.borrow_and_update();
                serde_json::to_string(&**dashboard)
            };
            match payload {
                Ok(json) => {
                    yield Ok::<_, Infallible>(Event::default().event("dashboard").data(json));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode dashboard update");
                }
            }
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = shutdown.changed() => {
                    tracing::debug!("Closing dashboard stream for shutdown");
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TelemetrySample>>, ApiError> {
    Ok(Json(state.session.history().await?))
}

/// Manual "update dashboard" trigger
pub async fn capture(State(state): State<Arc<AppState>>) -> Result<Json<CaptureOutcome>, ApiError> {
    Ok(Json(state.session.capture().await?))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(update), _): WithRejection<Json<SettingsUpdate>, ApiError>,
) -> Result<Json<DashboardSettings>, ApiError> {
    Ok(Json(state.session.update_settings(update).await?))
}

pub async fn update_cell(
    WithRejection(Path(cell), _): WithRejection<Path<usize>, ApiError>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<CellInput>, ApiError>,
) -> Result<Json<CellReading>, ApiError> {
    Ok(Json(state.session.set_cell(cell, input).await?))
}

/// Sidebar settings as posted by the page. An unchecked checkbox is simply absent.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub cell_count: usize,
    pub temperature_threshold: f64,
    pub voltage_threshold: f64,
    pub max_history: usize,
    pub auto_refresh: Option<String>,
}

impl From<SettingsForm> for SettingsUpdate {
    fn from(form: SettingsForm) -> Self {
        Self {
            cell_count: Some(form.cell_count),
            temperature_threshold: Some(form.temperature_threshold),
            voltage_threshold: Some(form.voltage_threshold),
            max_history: Some(form.max_history),
            auto_refresh: Some(form.auto_refresh.is_some()),
        }
    }
}

pub async fn submit_settings(
    State(state): State<Arc<AppState>>,
    WithRejection(Form(form), _): WithRejection<Form<SettingsForm>, ApiError>,
) -> Result<Redirect, ApiError> {
    state.session.update_settings(form.into()).await?;
    Ok(Redirect::to("/"))
}

pub async fn submit_cell(
    WithRejection(Path(cell), _): WithRejection<Path<usize>, ApiError>,
    State(state): State<Arc<AppState>>,
    WithRejection(Form(input), _): WithRejection<Form<CellInput>, ApiError>,
) -> Result<Redirect, ApiError> {
    state.session.set_cell(cell, input).await?;
    Ok(Redirect::to("/"))
}

pub async fn submit_capture(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    state.session.capture().await?;
    Ok(Redirect::to("/"))
}
