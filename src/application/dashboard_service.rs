// Dashboard service - Use case for building the dashboard view
use crate::application::session::DashboardSession;
use crate::domain::cell::CellReading;
use crate::domain::dashboard::{CellCard, Dashboard};
use crate::domain::history::HistoryBuffer;
use crate::domain::telemetry::{ChartData, SeriesData, TelemetrySample, TimeSeriesPoint};

pub const DASHBOARD_TITLE: &str = "Battery Monitoring Dashboard";

const SERIES_PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

struct MetricChart {
    id: &'static str,
    title: &'static str,
    unit: &'static str,
    y_range: Option<(f64, f64)>,
    fraction_digits: usize,
    value: fn(&CellReading) -> f64,
}

fn voltage_of(reading: &CellReading) -> f64 {
    reading.voltage
}

fn current_of(reading: &CellReading) -> f64 {
    reading.current
}

fn temperature_of(reading: &CellReading) -> f64 {
    reading.temperature
}

fn capacity_of(reading: &CellReading) -> f64 {
    f64::from(reading.capacity)
}

const METRIC_CHARTS: [MetricChart; 4] = [
    MetricChart {
        id: "voltage",
        title: "Voltage Tracking Over Time",
        unit: "V",
        y_range: None,
        fraction_digits: 2,
        value: voltage_of,
    },
    MetricChart {
        id: "current",
        title: "Current Tracking Over Time",
        unit: "A",
        y_range: None,
        fraction_digits: 2,
        value: current_of,
    },
    MetricChart {
        id: "temperature",
        title: "Temperature Tracking Over Time",
        unit: "°C",
        y_range: None,
        fraction_digits: 1,
        value: temperature_of,
    },
    MetricChart {
        id: "capacity",
        title: "Capacity Tracking Over Time",
        unit: "%",
        y_range: Some((0.0, 100.0)),
        fraction_digits: 0,
        value: capacity_of,
    },
];

pub fn build_dashboard(session: &DashboardSession) -> Dashboard {
    let history = session.history();

    Dashboard {
        title: DASHBOARD_TITLE.to_string(),
        settings: session.settings().clone(),
        alerts: session
            .current_alerts()
            .iter()
            .map(ToString::to_string)
            .collect(),
        cards: build_cards(session.current_readings()),
        charts: build_charts(history),
        history_len: history.len(),
        last_capture: history.latest().map(TelemetrySample::timestamp),
    }
}

pub fn build_cards(readings: &[CellReading]) -> Vec<CellCard> {
    readings
        .iter()
        .enumerate()
        .map(|(index, reading)| CellCard::new(index + 1, reading))
        .collect()
}

/// One chart per metric, one series per cell seen anywhere in the history.
pub fn build_charts(history: &HistoryBuffer) -> Vec<ChartData> {
    if history.is_empty() {
        return Vec::new();
    }

    let cells = history.max_cell_count();
    METRIC_CHARTS
        .iter()
        .map(|metric| {
            let series = (0..cells)
                .map(|index| build_series(history, index, metric.value))
                .collect();
            ChartData::new(
                metric.id.to_string(),
                metric.title.to_string(),
                metric.unit.to_string(),
                metric.y_range.map(|(min, _)| min),
                metric.y_range.map(|(_, max)| max),
                metric.fraction_digits,
                series,
            )
        })
        .collect()
}

fn build_series(history: &HistoryBuffer, index: usize, value: fn(&CellReading) -> f64) -> SeriesData {
    // Samples captured while fewer cells were active simply have no point here.
    let points = history
        .iter()
        .filter_map(|sample| {
            sample
                .cell(index)
                .map(|reading| TimeSeriesPoint::new(sample.timestamp().timestamp_millis(), value(&reading)))
        })
        .collect();

    SeriesData::new(
        format!("cell-{}", index + 1),
        format!("Cell {}", index + 1),
        Some(SERIES_PALETTE[index % SERIES_PALETTE.len()].to_string()),
        points,
    )
}
