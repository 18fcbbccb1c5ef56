use carto_types::{ControlPosition, PitchAlignment, Visibility};
use serde::Deserialize;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "nope"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("log_level must be one of: trace, debug, info, warn, error, nope (got '{0}')")]
    InvalidLogLevel(String),
}

/// Defaults applied to background layer props that the caller leaves unset
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayerDefaults {
    pub minzoom: f64,
    pub maxzoom: f64,
    pub color: String,
    pub emissive_strength: f64,
    pub opacity: f64,
    pub pitch_alignment: PitchAlignment,
    pub visibility: Visibility,
}

impl Default for LayerDefaults {
    fn default() -> Self {
        Self {
            minzoom: 0.0,
            maxzoom: 24.0,
            color: "#000000".to_string(),
            emissive_strength: 0.0,
            opacity: 1.0,
            pitch_alignment: PitchAlignment::Map,
            visibility: Visibility::Visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// `trace`, `debug`, `info`, `warn`, `error`, or `nope` to keep logging off
    pub log_level: String,
    pub control_position: ControlPosition,
    pub layer: LayerDefaults,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            control_position: ControlPosition::TopRight,
            layer: LayerDefaults::default(),
        }
    }
}

impl SyncConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let mut config: SyncConfig = serde_json::from_str(source)?;
        config.log_level = config.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&config.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.log_level));
        }
        Ok(config)
    }

    /// Install a fmt subscriber; `RUST_LOG` wins over the configured level
    pub fn init_logging(&self) {
        if self.log_level == "nope" {
            return;
        }
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.log_level));
        // Fails only when the embedding app already installed a subscriber
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init();
    }
}
