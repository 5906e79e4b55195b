//! Layered configuration loading
//!
//! Values come from, in increasing priority: the defaults and plain
//! environment variables read by `AppConfig::from_env`, an optional TOML file,
//! and `APP__SECTION__KEY` environment overrides.

use config::{Config, ConfigError, Environment as EnvSource, File};
use mp_shared::AppConfig;

/// Default location of the optional configuration file, without extension
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Load configuration from the default file location
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = std::env::var("APP_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    load_from(&path)
}

/// Load configuration layering `path` (optional) over the environment defaults
pub fn load_from(path: &str) -> Result<AppConfig, ConfigError> {
    let base = AppConfig::from_env();

    let settings = Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::with_name(path).required(false))
        .add_source(
            EnvSource::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    if config.environment.is_production() && config.auth.jwt.is_using_default_secret() {
        return Err(ConfigError::Message(
            "JWT secret must be configured in production".to_string(),
        ));
    }

    Ok(config)
}
