// Dashboard session - the single owner of settings, inputs and history
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::alert::{Alert, evaluate};
use crate::domain::cell::{CellMode, CellReading, MAX_CELLS};
use crate::domain::error::DashboardError;
use crate::domain::history::HistoryBuffer;
use crate::domain::settings::{DashboardSettings, SettingsUpdate};
use crate::domain::telemetry::TelemetrySample;

/// Raw values for one cell as submitted from the input panel.
#[derive(Debug, Clone, Deserialize)]
pub struct CellInput {
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    /// Signed and wide so out-of-range values reach validation instead of failing to parse.
    pub capacity: i64,
    pub mode: String,
}

impl CellInput {
    pub fn into_reading(self) -> Result<CellReading, DashboardError> {
        let mode: CellMode = self.mode.parse()?;
        let capacity = u8::try_from(self.capacity)
            .ok()
            .filter(|capacity| *capacity <= 100)
            .ok_or(DashboardError::CapacityOutOfRange(self.capacity))?;
        let reading = CellReading {
            voltage: self.voltage,
            current: self.current,
            temperature: self.temperature,
            capacity,
            mode,
        };
        reading.validate()?;
        Ok(reading)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptureOutcome {
    pub sample: TelemetrySample,
    pub alerts: Vec<String>,
    pub history_len: usize,
}

#[derive(Debug, Clone)]
pub struct DashboardSession {
    settings: DashboardSettings,
    inputs: [CellReading; MAX_CELLS],
    history: HistoryBuffer,
}

impl DashboardSession {
    pub fn new(settings: DashboardSettings) -> Result<Self, DashboardError> {
        settings.validate()?;
        let history = HistoryBuffer::with_capacity(settings.max_history);
        Ok(Self {
            settings,
            inputs: [CellReading::default(); MAX_CELLS],
            history,
        })
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Inputs for the active cells only; inactive cells keep their values for later.
    pub fn current_readings(&self) -> &[CellReading] {
        &self.inputs[..self.settings.cell_count]
    }

    pub fn current_alerts(&self) -> Vec<Alert> {
        evaluate(self.current_readings(), &self.settings.thresholds)
    }

    pub fn update_settings(
        &mut self,
        update: &SettingsUpdate,
    ) -> Result<DashboardSettings, DashboardError> {
        let next = self.settings.merged(update);
        next.validate()?;

        if next.max_history != self.settings.max_history {
            self.history.set_capacity(next.max_history);
        }
        tracing::info!(
            cell_count = next.cell_count,
            temperature_threshold = next.thresholds.temperature,
            voltage_threshold = next.thresholds.voltage,
            max_history = next.max_history,
            auto_refresh = next.auto_refresh,
            "Dashboard settings updated"
        );
        self.settings = next;
        Ok(self.settings.clone())
    }

    /// Store input for a 1-based cell number.
    pub fn set_cell_input(
        &mut self,
        cell: usize,
        input: CellInput,
    ) -> Result<CellReading, DashboardError> {
        if !(1..=MAX_CELLS).contains(&cell) {
            return Err(DashboardError::UnknownCell {
                cell,
                max: MAX_CELLS,
            });
        }
        let reading = input.into_reading()?;
        self.inputs[cell - 1] = reading;
        Ok(reading)
    }

    /// Package the active inputs into a sample, alert on it and record it.
    pub fn capture_at(&mut self, timestamp: DateTime<Utc>) -> CaptureOutcome {
        let sample = TelemetrySample::capture(timestamp, self.current_readings());
        let alerts = evaluate(self.current_readings(), &self.settings.thresholds);
        for alert in &alerts {
            tracing::warn!(cell = alert.cell, kind = ?alert.kind, value = alert.value, "{}", alert);
        }

        self.history.append(sample.clone());
        tracing::debug!(
            cells = sample.cell_count(),
            history_len = self.history.len(),
            "Captured telemetry sample"
        );

        CaptureOutcome {
            sample,
            alerts: alerts.iter().map(ToString::to_string).collect(),
            history_len: self.history.len(),
        }
    }

    pub fn capture(&mut self) -> CaptureOutcome {
        self.capture_at(Utc::now())
    }
}
