use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Server settings shared by every CRM service binary.
///
/// Loaded from an optional `configuration` file overlaid with
/// `APP__`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Built from explicit sources rather than `load()` so ambient
    // APP__* variables cannot leak into the assertions.
    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config: ServerConfig = Cfg::builder()
            .build()
            .expect("empty config")
            .try_deserialize()
            .expect("deserialize with defaults");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: ServerConfig = Cfg::builder()
            .set_override("port", 9090)
            .expect("override port")
            .set_override("log_level", "debug")
            .expect("override log level")
            .build()
            .expect("config")
            .try_deserialize()
            .expect("deserialize");
        assert_eq!(config.port, 9090);
        assert_eq!(config.log_level, "debug");
    }
}
