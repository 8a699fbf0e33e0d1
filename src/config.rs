use serde::Deserialize;

use crate::analysis::TrendConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub analysis: TrendConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// JSON array of monitored models supplied by the size data source.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of radar snapshots kept in the broadcast channel for /ws/radar (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often the whole catalog is re-analyzed and pushed to /ws/radar.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// How often to log app stats (ws_radar clients, refreshes) at INFO level.
    pub stats_log_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    300
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.catalog.path.is_empty(),
            "catalog.path must be non-empty"
        );

        let a = &self.analysis;
        anyhow::ensure!(
            a.window_size >= 2,
            "analysis.window_size must be >= 2, got {}",
            a.window_size
        );
        anyhow::ensure!(
            a.horizon_days.is_finite() && a.horizon_days > 0.0,
            "analysis.horizon_days must be > 0, got {}",
            a.horizon_days
        );
        anyhow::ensure!(
            a.critical_days.is_finite() && a.critical_days > 0.0,
            "analysis.critical_days must be > 0, got {}",
            a.critical_days
        );
        anyhow::ensure!(
            a.warning_days.is_finite() && a.warning_days > a.critical_days,
            "analysis.warning_days must be greater than critical_days ({}), got {}",
            a.critical_days,
            a.warning_days
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&a.critical_headroom_ratio),
            "analysis.critical_headroom_ratio must be in [0, 1), got {}",
            a.critical_headroom_ratio
        );

        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.refresh_interval_secs > 0,
            "monitoring.refresh_interval_secs must be > 0, got {}",
            self.monitoring.refresh_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
