// Dashboard domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cell::CellReading;
use super::settings::DashboardSettings;
use super::telemetry::ChartData;

#[derive(Debug, Clone, Serialize)]
pub struct CellCard {
    pub cell: usize,
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    pub capacity: u8,
    pub mode: String,
    pub color: &'static str,
}

impl CellCard {
    pub fn new(cell: usize, reading: &CellReading) -> Self {
        Self {
            cell,
            voltage: reading.voltage,
            current: reading.current,
            temperature: reading.temperature,
            capacity: reading.capacity,
            mode: reading.mode.to_string(),
            color: reading.mode.color(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub settings: DashboardSettings,
    pub alerts: Vec<String>,
    pub cards: Vec<CellCard>,
    pub charts: Vec<ChartData>,
    pub history_len: usize,
    pub last_capture: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn has_history(&self) -> bool {
        self.history_len > 0
    }
}
