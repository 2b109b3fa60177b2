// User-adjustable dashboard settings
use serde::{Deserialize, Serialize};

use super::alert::AlertThresholds;
use super::cell::MAX_CELLS;
use super::error::DashboardError;
use super::history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};

pub const DEFAULT_CELL_COUNT: usize = 8;
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub cell_count: usize,
    pub thresholds: AlertThresholds,
    pub max_history: usize,
    pub auto_refresh: bool,
    pub auto_refresh_interval_ms: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            cell_count: DEFAULT_CELL_COUNT,
            thresholds: AlertThresholds::default(),
            max_history: DEFAULT_HISTORY_CAPACITY,
            auto_refresh: false,
            auto_refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

impl DashboardSettings {
    pub fn validate(&self) -> Result<(), DashboardError> {
        if !(1..=MAX_CELLS).contains(&self.cell_count) {
            return Err(DashboardError::CellCountOutOfRange {
                actual: self.cell_count,
                max: MAX_CELLS,
            });
        }
        let temperature = self.thresholds.temperature;
        if !(0.0..=100.0).contains(&temperature) {
            return Err(DashboardError::TemperatureThresholdOutOfRange(temperature));
        }
        let voltage = self.thresholds.voltage;
        if !(0.0..=5.0).contains(&voltage) {
            return Err(DashboardError::VoltageThresholdOutOfRange(voltage));
        }
        if !(1..=MAX_HISTORY_CAPACITY).contains(&self.max_history) {
            return Err(DashboardError::HistoryCapacityOutOfRange {
                actual: self.max_history,
                max: MAX_HISTORY_CAPACITY,
            });
        }
        if self.auto_refresh_interval_ms == 0 {
            return Err(DashboardError::RefreshIntervalZero);
        }
        Ok(())
    }

    /// Apply a partial update, returning the merged settings without touching `self`.
    pub fn merged(&self, update: &SettingsUpdate) -> Self {
        let mut next = self.clone();
        if let Some(cell_count) = update.cell_count {
            next.cell_count = cell_count;
        }
        if let Some(temperature) = update.temperature_threshold {
            next.thresholds.temperature = temperature;
        }
        if let Some(voltage) = update.voltage_threshold {
            next.thresholds.voltage = voltage;
        }
        if let Some(max_history) = update.max_history {
            next.max_history = max_history;
        }
        if let Some(auto_refresh) = update.auto_refresh {
            next.auto_refresh = auto_refresh;
        }
        next
    }
}

/// Sidebar changes; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub cell_count: Option<usize>,
    pub temperature_threshold: Option<f64>,
    pub voltage_threshold: Option<f64>,
    pub max_history: Option<usize>,
    pub auto_refresh: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = DashboardSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.cell_count, 8);
        assert_eq!(settings.max_history, 100);
        assert_eq!(settings.auto_refresh_interval_ms, 1000);
    }

    #[test]
    fn test_bounds() {
        let base = DashboardSettings::default();

        let update = SettingsUpdate {
            cell_count: Some(11),
            ..SettingsUpdate::default()
        };
        assert_eq!(
            base.merged(&update).validate(),
            Err(DashboardError::CellCountOutOfRange { actual: 11, max: 10 })
        );

        let update = SettingsUpdate {
            voltage_threshold: Some(5.5),
            ..SettingsUpdate::default()
        };
        assert_eq!(
            base.merged(&update).validate(),
            Err(DashboardError::VoltageThresholdOutOfRange(5.5))
        );

        let update = SettingsUpdate {
            temperature_threshold: Some(-1.0),
            ..SettingsUpdate::default()
        };
        assert_eq!(
            base.merged(&update).validate(),
            Err(DashboardError::TemperatureThresholdOutOfRange(-1.0))
        );

        let update = SettingsUpdate {
            max_history: Some(0),
            ..SettingsUpdate::default()
        };
        assert_eq!(
            base.merged(&update).validate(),
            Err(DashboardError::HistoryCapacityOutOfRange { actual: 0, max: MAX_HISTORY_CAPACITY })
        );
    }

    #[test]
    fn test_huge_history_capacity_is_rejected() {
        let update = SettingsUpdate {
            max_history: Some(usize::MAX),
            ..SettingsUpdate::default()
        };
        assert_eq!(
            DashboardSettings::default().merged(&update).validate(),
            Err(DashboardError::HistoryCapacityOutOfRange {
                actual: usize::MAX,
                max: MAX_HISTORY_CAPACITY,
            })
        );

        let update = SettingsUpdate {
            max_history: Some(MAX_HISTORY_CAPACITY),
            ..SettingsUpdate::default()
        };
        assert_eq!(DashboardSettings::default().merged(&update).validate(), Ok(()));
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let base = DashboardSettings::default();
        let update = SettingsUpdate {
            cell_count: Some(3),
            auto_refresh: Some(true),
            ..SettingsUpdate::default()
        };
        let merged = base.merged(&update);
        assert_eq!(merged.cell_count, 3);
        assert!(merged.auto_refresh);
        assert_eq!(merged.thresholds, base.thresholds);
        assert_eq!(merged.max_history, base.max_history);
    }
}
