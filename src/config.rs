//! Configuration management for the house price service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Prefix for environment overrides, e.g. `HOUSE_PRICE__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "HOUSE_PRICE";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub startup: StartupConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Model artifact locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the JSON metadata sidecar
    pub metadata_path: String,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model_path: "models/model.onnx".to_string(),
            metadata_path: "models/model_metadata.json".to_string(),
            onnx_threads: 1,
        }
    }
}

/// Startup behaviour
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StartupConfig {
    /// Exit instead of serving "unhealthy" when the startup load fails
    pub fail_on_load_error: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Periodic metrics summary
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Seconds between summaries; 0 disables the reporter
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file plus environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path plus environment overrides.
    ///
    /// A missing file is not an error; every key has a default.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::{Mutex, OnceLock};

    // Environment overrides are process-wide; loading tests take this lock
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.models.model_path, "models/model.onnx");
        assert_eq!(config.models.metadata_path, "models/model_metadata.json");
        assert_eq!(config.models.onnx_threads, 1);
        assert!(!config.startup.fail_on_load_error);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.metrics.report_interval_secs, 60);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let _guard = env_lock();
        let config = AppConfig::load_from_path("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_overrides() {
        let _guard = env_lock();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[startup]
fail_on_load_error = true

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.startup.fail_on_load_error);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.models.onnx_threads, 1);
    }

    #[test]
    fn test_environment_overrides() {
        let _guard = env_lock();
        env::set_var("HOUSE_PRICE__SERVER__PORT", "9000");
        env::set_var("HOUSE_PRICE__STARTUP__FAIL_ON_LOAD_ERROR", "true");

        let config = AppConfig::load_from_path("does/not/exist.toml");

        env::remove_var("HOUSE_PRICE__SERVER__PORT");
        env::remove_var("HOUSE_PRICE__STARTUP__FAIL_ON_LOAD_ERROR");

        let config = config.unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.startup.fail_on_load_error);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
