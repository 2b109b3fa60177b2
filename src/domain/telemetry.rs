// Telemetry data domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cell::{CellMode, CellReading};

/// One timestamped capture of every active cell.
///
/// The per-metric sequences always have the same length because a sample can
/// only be built from whole [`CellReading`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySample {
    timestamp: DateTime<Utc>,
    voltages: Vec<f64>,
    currents: Vec<f64>,
    temperatures: Vec<f64>,
    capacities: Vec<u8>,
    modes: Vec<CellMode>,
}

impl TelemetrySample {
    pub fn capture(timestamp: DateTime<Utc>, readings: &[CellReading]) -> Self {
        Self {
            timestamp,
            voltages: readings.iter().map(|r| r.voltage).collect(),
            currents: readings.iter().map(|r| r.current).collect(),
            temperatures: readings.iter().map(|r| r.temperature).collect(),
            capacities: readings.iter().map(|r| r.capacity).collect(),
            modes: readings.iter().map(|r| r.mode).collect(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn cell_count(&self) -> usize {
        self.voltages.len()
    }

    pub fn voltages(&self) -> &[f64] {
        &self.voltages
    }

    pub fn currents(&self) -> &[f64] {
        &self.currents
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn capacities(&self) -> &[u8] {
        &self.capacities
    }

    pub fn modes(&self) -> &[CellMode] {
        &self.modes
    }

    /// Reading for a zero-based cell index, `None` if the cell was not active at capture.
    pub fn cell(&self, index: usize) -> Option<CellReading> {
        Some(CellReading {
            voltage: *self.voltages.get(index)?,
            current: *self.currents.get(index)?,
            temperature: *self.temperatures.get(index)?,
            capacity: *self.capacities.get(index)?,
            mode: *self.modes.get(index)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, color: Option<String>, points: Vec<TimeSeriesPoint>) -> Self {
        Self {
            id,
            name,
            color,
            points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub fraction_digits: usize,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn new(
        id: String,
        title: String,
        unit: String,
        y_min: Option<f64>,
        y_max: Option<f64>,
        fraction_digits: usize,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            y_min,
            y_max,
            fraction_digits,
            series,
        }
    }
}
