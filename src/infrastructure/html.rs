// Server-rendered dashboard page: askama templates fed with precomputed chart geometry
use askama::Template;
use chrono::{DateTime, Utc};

use crate::domain::cell::{CellMode, MAX_CELLS};
use crate::domain::dashboard::{CellCard, Dashboard};
use crate::domain::history::MAX_HISTORY_CAPACITY;
use crate::domain::telemetry::ChartData;

const CHART_WIDTH: f64 = 960.0;
const CHART_HEIGHT: f64 = 350.0;
const CAPACITY_CHART_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 40.0;
const FALLBACK_SERIES_COLOR: &str = "#636efa";
const NO_DATA_MESSAGE: &str =
    "No data to display yet. Please enter values and update the dashboard.";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    dashboard: &'a Dashboard,
    refresh_seconds: Option<u64>,
    max_cells: usize,
    max_history: usize,
    cell_forms: Vec<CellForm<'a>>,
    charts: Vec<ChartView>,
    no_data_message: &'static str,
}

/// Prefilled input panel for one active cell.
struct CellForm<'a> {
    card: &'a CellCard,
    modes: Vec<ModeOption>,
}

struct ModeOption {
    label: &'static str,
    selected: bool,
}

struct ChartView {
    id: String,
    icon: &'static str,
    title: String,
    width: f64,
    height: f64,
    plot: PlotArea,
    axis_label: String,
    y_min_label: String,
    y_max_label: String,
    start_label: String,
    end_label: String,
    series: Vec<SeriesView>,
}

struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn middle(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

struct SeriesView {
    id: String,
    name: String,
    color: String,
    points: String,
    markers: Vec<Marker>,
}

struct Marker {
    x: String,
    y: String,
}

pub fn render_dashboard(dashboard: &Dashboard) -> Result<String, askama::Error> {
    let settings = &dashboard.settings;
    let refresh_seconds = settings
        .auto_refresh
        .then(|| settings.auto_refresh_interval_ms.div_ceil(1000).max(1));
    let charts = if dashboard.has_history() {
        dashboard.charts.iter().filter_map(chart_view).collect()
    } else {
        Vec::new()
    };

    DashboardTemplate {
        dashboard,
        refresh_seconds,
        max_cells: MAX_CELLS,
        max_history: MAX_HISTORY_CAPACITY,
        cell_forms: dashboard.cards.iter().map(cell_form).collect(),
        charts,
        no_data_message: NO_DATA_MESSAGE,
    }
    .render()
}

fn cell_form(card: &CellCard) -> CellForm<'_> {
    let modes = CellMode::ALL
        .iter()
        .map(|mode| ModeOption {
            label: mode.label(),
            selected: mode.label() == card.mode,
        })
        .collect();
    CellForm { card, modes }
}

struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    fn span(&self) -> f64 {
        self.max - self.min
    }

    fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}

fn time_bounds(chart: &ChartData) -> Option<Bounds> {
    let mut times = chart.series.iter().flat_map(|s| s.points.iter().map(|p| p.time_ms));
    let first = times.next()?;
    let (min, max) = times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
    if min == max {
        // A single capture still needs a non-empty axis.
        return Some(Bounds {
            min: min as f64 - 1000.0,
            max: max as f64 + 1000.0,
        });
    }
    Some(Bounds {
        min: min as f64,
        max: max as f64,
    })
}

fn value_bounds(chart: &ChartData) -> Bounds {
    if let (Some(min), Some(max)) = (chart.y_min, chart.y_max) {
        if max > min {
            return Bounds { min, max };
        }
    }

    let values = chart.series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return Bounds { min: 0.0, max: 1.0 };
    }
    if max - min < f64::EPSILON {
        return Bounds {
            min: min - 1.0,
            max: max + 1.0,
        };
    }
    let pad = (max - min) * 0.05;
    Bounds {
        min: min - pad,
        max: max + pad,
    }
}

/// Project a chart onto SVG coordinates. Charts without any point are skipped.
fn chart_view(chart: &ChartData) -> Option<ChartView> {
    let x_bounds = time_bounds(chart)?;
    let y_bounds = value_bounds(chart);
    let height = if chart.id == "capacity" {
        CAPACITY_CHART_HEIGHT
    } else {
        CHART_HEIGHT
    };
    let plot = PlotArea {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        width: CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        height: height - MARGIN_TOP - MARGIN_BOTTOM,
    };
    let x = |time_ms: i64| plot.left + x_bounds.fraction(time_ms as f64) * plot.width;
    let y = |value: f64| plot.top + (1.0 - y_bounds.fraction(value)) * plot.height;

    let series = chart
        .series
        .iter()
        .filter(|s| !s.points.is_empty())
        .map(|s| {
            let markers: Vec<Marker> = s
                .points
                .iter()
                .map(|p| Marker {
                    x: format!("{:.1}", x(p.time_ms)),
                    y: format!("{:.1}", y(p.value)),
                })
                .collect();
            let points = markers
                .iter()
                .map(|m| format!("{},{}", m.x, m.y))
                .collect::<Vec<_>>()
                .join(" ");
            SeriesView {
                id: s.id.clone(),
                name: s.name.clone(),
                color: s.color.clone().unwrap_or_else(|| FALLBACK_SERIES_COLOR.to_string()),
                points,
                markers,
            }
        })
        .collect();

    let digits = chart.fraction_digits;
    Some(ChartView {
        id: chart.id.clone(),
        icon: chart_icon(&chart.id),
        title: chart.title.clone(),
        width: CHART_WIDTH,
        height,
        axis_label: format!("{} ({})", axis_label(&chart.id), chart.unit),
        y_min_label: format!("{:.digits$}", y_bounds.min),
        y_max_label: format!("{:.digits$}", y_bounds.max),
        start_label: clock_label(x_bounds.min),
        end_label: clock_label(x_bounds.max),
        plot,
        series,
    })
}

fn axis_label(chart_id: &str) -> &str {
    match chart_id {
        "voltage" => "Voltage",
        "current" => "Current",
        "temperature" => "Temperature",
        "capacity" => "Capacity",
        other => other,
    }
}

fn chart_icon(chart_id: &str) -> &'static str {
    match chart_id {
        "current" => "⚡",
        "temperature" => "🌡",
        _ => "📈",
    }
}

fn clock_label(time_ms: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(time_ms as i64)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::build_dashboard;
    use crate::application::session::{CellInput, DashboardSession};
    use crate::domain::settings::{DashboardSettings, SettingsUpdate};
    use crate::domain::telemetry::{SeriesData, TimeSeriesPoint};
    use chrono::TimeZone;

    fn session(cell_count: usize) -> DashboardSession {
        let settings = DashboardSettings {
            cell_count,
            ..DashboardSettings::default()
        };
        DashboardSession::new(settings).unwrap()
    }

    fn render(session: &DashboardSession) -> String {
        render_dashboard(&build_dashboard(session)).unwrap()
    }

    #[test]
    fn test_empty_history_shows_info_message() {
        let page = render(&session(5));
        assert!(page.contains(NO_DATA_MESSAGE));
        assert!(!page.contains("<svg"));
        assert!(!page.contains("http-equiv=\"refresh\""));
        assert_eq!(page.matches("class=\"card\"").count(), 5);
        assert!(page.contains("<h1>🔋 Battery Monitoring Dashboard</h1>"));
        assert!(page.contains("Made with ❤ using Rust"));
    }

    #[test]
    fn test_cards_alerts_and_charts() {
        let mut session = session(2);
        session
            .set_cell_input(
                2,
                CellInput {
                    voltage: 3.2,
                    current: 1.0,
                    temperature: 45.0,
                    capacity: 70,
                    mode: "Charging".to_string(),
                },
            )
            .unwrap();
        session.capture_at(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        session.capture_at(Utc.timestamp_opt(1_700_000_001, 0).unwrap());

        let page = render(&session);
        assert!(page.contains("🔥 Cell 2 Overheating! Temp: 45.0 °C"));
        assert!(page.contains("⚡ Low Voltage on Cell 2: 3.20 V"));
        assert!(page.contains("color:#28a745"));
        assert!(page.contains("<strong>3.20 V</strong>"));
        assert_eq!(page.matches("<svg").count(), 4);
        // two cells on each of the four charts
        assert_eq!(page.matches("<polyline").count(), 8);
        assert!(page.contains("data-series=\"cell-2\""));
        assert!(!page.contains(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_page_contains_input_controls() {
        let page = render(&session(3));

        assert!(page.contains("action=\"/ui/settings\""));
        assert!(page.contains("type=\"range\" name=\"cell_count\" min=\"1\" max=\"10\" value=\"3\""));
        assert!(page.contains("name=\"temperature_threshold\""));
        assert!(page.contains("name=\"voltage_threshold\""));
        assert!(page.contains("type=\"checkbox\" name=\"auto_refresh\""));

        assert_eq!(page.matches("action=\"/ui/cells/").count(), 3);
        assert!(page.contains("action=\"/ui/cells/3\""));
        assert_eq!(page.matches("name=\"capacity\"").count(), 3);
        assert!(page.contains("<option value=\"Idle\" selected>"));

        assert!(page.contains("action=\"/ui/capture\""));
        assert!(page.contains("Update Dashboard"));
    }

    #[test]
    fn test_auto_refresh_adds_meta_refresh() {
        let mut session = session(1);
        session
            .update_settings(&SettingsUpdate {
                auto_refresh: Some(true),
                ..SettingsUpdate::default()
            })
            .unwrap();
        let page = render(&session);
        assert!(page.contains("<meta http-equiv=\"refresh\" content=\"1\">"));
        assert!(page.contains("name=\"auto_refresh\" value=\"on\" checked"));
    }

    #[test]
    fn test_series_names_are_escaped() {
        let mut dashboard = build_dashboard(&session(1));
        dashboard.history_len = 1;
        dashboard.charts = vec![ChartData::new(
            "voltage".to_string(),
            "Voltage".to_string(),
            "V".to_string(),
            None,
            None,
            2,
            vec![SeriesData::new(
                "cell-1".to_string(),
                "<b>Cell & 1".to_string(),
                None,
                vec![TimeSeriesPoint::new(1_700_000_000_000, 3.7)],
            )],
        )];

        let page = render_dashboard(&dashboard).unwrap();
        assert!(page.contains("&lt;b&gt;Cell &amp; 1"));
        assert!(!page.contains("<b>Cell"));
        assert!(page.contains(FALLBACK_SERIES_COLOR));
    }
}
