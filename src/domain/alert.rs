// Threshold alerts over the current cell readings
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell::CellReading;

pub const DEFAULT_TEMPERATURE_THRESHOLD: f64 = 40.0;
pub const DEFAULT_VOLTAGE_THRESHOLD: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Alert when a cell runs hotter than this (°C).
    pub temperature: f64,
    /// Alert when a cell drops below this (V).
    pub voltage: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE_THRESHOLD,
            voltage: DEFAULT_VOLTAGE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Overheating,
    LowVoltage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    /// 1-based, as shown on the cards.
    pub cell: usize,
    pub value: f64,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AlertKind::Overheating => {
                write!(f, "🔥 Cell {} Overheating! Temp: {:.1} °C", self.cell, self.value)
            }
            AlertKind::LowVoltage => {
                write!(f, "⚡ Low Voltage on Cell {}: {:.2} V", self.cell, self.value)
            }
        }
    }
}

/// Compare each cell against the thresholds, in cell order, temperature before voltage.
pub fn evaluate(readings: &[CellReading], thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for (index, reading) in readings.iter().enumerate() {
        let cell = index + 1;
        if reading.temperature > thresholds.temperature {
            alerts.push(Alert {
                kind: AlertKind::Overheating,
                cell,
                value: reading.temperature,
            });
        }
        if reading.voltage < thresholds.voltage {
            alerts.push(Alert {
                kind: AlertKind::LowVoltage,
                cell,
                value: reading.voltage,
            });
        }
    }

    alerts
}
