use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{BoundingBox, DomainError, RetryConfig};

/// Environment variable holding the TomTom API key
pub const API_KEY_VAR: &str = "TOMTOM_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub tomtom: TomTomConfig,
    pub area: AreaConfig,
    pub output: OutputConfig,
    pub speeds: SpeedsConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomTomConfig {
    pub base_url: String,
    pub language: String,
    pub zoom: u8,
    pub timeout_secs: u64,
    pub request_delay_ms: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    pub location: String,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeedsConfig {
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub line_thickness: u32,
    pub view: BoundingBox,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl Default for TomTomConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tomtom.com".to_string(),
            language: "ro-RO".to_string(),
            zoom: 15,
            timeout_secs: 30,
            request_delay_ms: 200,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            location: "Iasi, Romania".to_string(),
            bbox: BoundingBox::iasi(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("iasi_data_complete"),
        }
    }
}

impl Default for SpeedsConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 5000,
            height: 5000,
            line_thickness: 3,
            view: BoundingBox::iasi_render_view(),
            output: PathBuf::from("traffic_visualization.png"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.area.bbox.validate()?;
        self.render.view.validate()?;

        if self.tomtom.zoom > 22 {
            return Err(DomainError::configuration(format!(
                "zoom {} is outside the supported range 0-22",
                self.tomtom.zoom
            )));
        }

        if self.speeds.concurrency == 0 {
            return Err(DomainError::configuration("speeds.concurrency must be at least 1"));
        }

        Ok(())
    }
}

/// Read the TomTom API key from the environment.
pub fn api_key_from_env() -> Result<String, DomainError> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(DomainError::credential(format!(
            "{} not found in environment or .env file",
            API_KEY_VAR
        ))),
    }
}
