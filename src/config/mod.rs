//! Application configuration

mod app_config;

pub use app_config::{
    api_key_from_env, AppConfig, AreaConfig, LogFormat, LoggingConfig, OutputConfig,
    RenderConfig, SpeedsConfig, TomTomConfig, API_KEY_VAR,
};
