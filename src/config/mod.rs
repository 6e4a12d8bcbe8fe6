//! Configuration module
//!
//! Each binary reads its own optional file (`config/panel.*` for the panel,
//! `config/robot-mock.*` for the mock device) and then the environment
//! (`ROBOT_CLIENT_*` and `ROBOT_API_*`). Environment wins. Values are
//! validated once and passed into constructors.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Panel settings file, any format the `config` crate recognizes
pub const PANEL_CONFIG_FILE: &str = "config/panel";
/// Mock device settings file
pub const MOCK_CONFIG_FILE: &str = "config/robot-mock";

// ============================================================================
// Panel
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Poll rate in Hz
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: f64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_listen_host")]
    pub listen_host: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            refresh_rate: default_refresh_rate(),
            request_timeout_ms: default_request_timeout_ms(),
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:5487".to_string()
}

fn default_refresh_rate() -> f64 {
    10.0
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_listen_host() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    3000
}

impl PanelConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(PANEL_CONFIG_FILE)
    }

    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(config::Environment::with_prefix("ROBOT_CLIENT"))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> Result<Self, ConfigError> {
        let config: PanelConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.backend_url).map_err(|source| ConfigError::InvalidBackendUrl {
            url: self.backend_url.clone(),
            source,
        })?;

        if !(self.refresh_rate.is_finite() && self.refresh_rate > 0.0) {
            return Err(ConfigError::InvalidRefreshRate(self.refresh_rate));
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Period of the poll timer, `1000 / refresh_rate` ms
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_rate)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MockRobotConfig {
    #[serde(default = "default_mock_host")]
    pub host: String,
    #[serde(default = "default_mock_port")]
    pub port: u16,
    /// Simulation ticks per second
    #[serde(default = "default_mock_refresh_rate")]
    pub refresh_rate: u32,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Degrees removed at 100% fan speed
    #[serde(default = "default_max_fan_cooling")]
    pub mock_max_fan_cooling: f64,
    #[serde(default = "default_temperature_min")]
    pub mock_temperature_min: i32,
    #[serde(default = "default_temperature_max")]
    pub mock_temperature_max: i32,
    #[serde(default = "default_temperature_threshold")]
    pub mock_temperature_threshold: f64,
    /// Per-tick probability of dropping offline
    #[serde(default = "default_offline_chance")]
    pub mock_offline_chance_threshold: f64,
}

impl Default for MockRobotConfig {
    fn default() -> Self {
        Self {
            host: default_mock_host(),
            port: default_mock_port(),
            refresh_rate: default_mock_refresh_rate(),
            allowed_origins: default_allowed_origins(),
            mock_max_fan_cooling: default_max_fan_cooling(),
            mock_temperature_min: default_temperature_min(),
            mock_temperature_max: default_temperature_max(),
            mock_temperature_threshold: default_temperature_threshold(),
            mock_offline_chance_threshold: default_offline_chance(),
        }
    }
}

fn default_mock_host() -> String {
    "localhost".to_string()
}

fn default_mock_port() -> u16 {
    5487
}

fn default_mock_refresh_rate() -> u32 {
    10
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://0.0.0.0:3000".to_string(),
    ]
}

fn default_max_fan_cooling() -> f64 {
    10.0
}

fn default_temperature_min() -> i32 {
    20
}

fn default_temperature_max() -> i32 {
    50
}

fn default_temperature_threshold() -> f64 {
    45.0
}

fn default_offline_chance() -> f64 {
    0.01
}

impl MockRobotConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(MOCK_CONFIG_FILE)
    }

    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("ROBOT_API")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> Result<Self, ConfigError> {
        let config: MockRobotConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_rate == 0 {
            return Err(ConfigError::InvalidRefreshRate(0.0));
        }

        if self.mock_temperature_min > self.mock_temperature_max {
            return Err(ConfigError::InvalidTemperatureRange(
                self.mock_temperature_min,
                self.mock_temperature_max,
            ));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_rate as f64)
    }
}
