use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::settings::DashboardSettings;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "BATTERY_DASHBOARD";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.server.bind_addr.parse()?)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard.auto_refresh_interval_ms)
    }
}

/// Load `config/dashboard.*` when present, then `BATTERY_DASHBOARD__*` overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false));
    build_app_config(builder)
}

fn build_app_config(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<AppConfig> {
    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.dashboard.validate()?;
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> anyhow::Result<AppConfig> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        build_app_config(builder)
    }

    #[test]
    fn test_empty_source_yields_defaults() {
        let app_config = from_toml("").unwrap();
        assert_eq!(app_config.dashboard, DashboardSettings::default());
        assert_eq!(app_config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(app_config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_file_overrides() {
        let app_config = from_toml(
            r#"
            [server]
            bind_addr = "127.0.0.1:9000"

            [dashboard]
            cell_count = 4
            max_history = 20
            auto_refresh = true

            [dashboard.thresholds]
            temperature = 55.0
            voltage = 3.1
            "#,
        )
        .unwrap();

        assert_eq!(app_config.bind_addr().unwrap().port(), 9000);
        assert_eq!(app_config.dashboard.cell_count, 4);
        assert_eq!(app_config.dashboard.max_history, 20);
        assert!(app_config.dashboard.auto_refresh);
        assert_eq!(app_config.dashboard.thresholds.temperature, 55.0);
        assert_eq!(app_config.dashboard.thresholds.voltage, 3.1);
        assert_eq!(app_config.dashboard.auto_refresh_interval_ms, 1000);
    }

    #[test]
    fn test_out_of_range_settings_are_rejected() {
        assert!(from_toml("[dashboard]\ncell_count = 11\n").is_err());
    }
}
