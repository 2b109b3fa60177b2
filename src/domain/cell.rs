// Per-cell readings and operating modes
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DashboardError;

/// Upper bound on the number of cells a dashboard can monitor.
pub const MAX_CELLS: usize = 10;

pub const CHARGING_COLOR: &str = "#28a745";
pub const DISCHARGING_COLOR: &str = "#dc3545";
pub const IDLE_COLOR: &str = "#6c757d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellMode {
    Charging,
    Discharging,
    #[default]
    Idle,
}

impl CellMode {
    pub const ALL: [CellMode; 3] = [CellMode::Charging, CellMode::Discharging, CellMode::Idle];

    pub fn label(&self) -> &'static str {
        match self {
            CellMode::Charging => "Charging",
            CellMode::Discharging => "Discharging",
            CellMode::Idle => "Idle",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CellMode::Charging => CHARGING_COLOR,
            CellMode::Discharging => DISCHARGING_COLOR,
            CellMode::Idle => IDLE_COLOR,
        }
    }
}

impl fmt::Display for CellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CellMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Charging" => Ok(CellMode::Charging),
            "Discharging" => Ok(CellMode::Discharging),
            "Idle" => Ok(CellMode::Idle),
            other => Err(DashboardError::UnknownMode(other.to_string())),
        }
    }
}

/// Map a mode label to its card colour, falling back to gray for anything unrecognized.
pub fn color_for_label(label: &str) -> &'static str {
    label
        .parse::<CellMode>()
        .map(|mode| mode.color())
        .unwrap_or(IDLE_COLOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellReading {
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    pub capacity: u8,
    pub mode: CellMode,
}

impl Default for CellReading {
    fn default() -> Self {
        Self {
            voltage: 3.7,
            current: 0.0,
            temperature: 25.0,
            capacity: 100,
            mode: CellMode::Idle,
        }
    }
}

impl CellReading {
    pub fn validate(&self) -> Result<(), DashboardError> {
        let reals = [
            ("voltage", self.voltage),
            ("current", self.current),
            ("temperature", self.temperature),
        ];
        for (field, value) in reals {
            if !value.is_finite() {
                return Err(DashboardError::NonFiniteReading { field });
            }
        }
        if self.capacity > 100 {
            return Err(DashboardError::CapacityOutOfRange(i64::from(self.capacity)));
        }
        Ok(())
    }
}
