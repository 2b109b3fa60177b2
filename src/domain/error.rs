// Domain errors raised at the validation boundary
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("cell count must be between 1 and {max}, got {actual}")]
    CellCountOutOfRange { actual: usize, max: usize },

    #[error("temperature threshold must be between 0 and 100 °C, got {0}")]
    TemperatureThresholdOutOfRange(f64),

    #[error("voltage threshold must be between 0.0 and 5.0 V, got {0}")]
    VoltageThresholdOutOfRange(f64),

    #[error("history capacity must be between 1 and {max}, got {actual}")]
    HistoryCapacityOutOfRange { actual: usize, max: usize },

    #[error("auto refresh interval must be greater than zero")]
    RefreshIntervalZero,

    #[error("cell {cell} does not exist (valid cells are 1..={max})")]
    UnknownCell { cell: usize, max: usize },

    #[error("capacity must be between 0 and 100 %, got {0}")]
    CapacityOutOfRange(i64),

    #[error("{field} must be a finite number")]
    NonFiniteReading { field: &'static str },

    #[error("unknown cell mode '{0}' (expected Charging, Discharging or Idle)")]
    UnknownMode(String),

    #[error("dashboard session is no longer running")]
    SessionClosed,
}
