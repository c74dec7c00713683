//! Application configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML file,
//! then `SIGFLOW_*` environment variables. Nested keys use `__`, so
//! `SIGFLOW_CORRELATION__ERROR_PROBE_ORDER=dtid_first` sets
//! `correlation.error_probe_order`. Command-line flags are applied last by the
//! caller.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sigflow_dialog_core::CorrelationConfig;
use sigflow_infra_common::{Error, ErrorExt, Result};

pub const ENV_PREFIX: &str = "SIGFLOW";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    pub correlation: CorrelationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
            correlation: CorrelationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from defaults, `path` (if given) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Load with an explicit environment source
    pub(crate) fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                let message = format!("config file {} does not exist", path.display());
                return Err(Error::config(message));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder
            .add_source(env.prefix_separator("_").separator("__"))
            .build()
            .and_then(|settings| settings.try_deserialize::<AppConfig>())
            .map_err(|e| Error::config(e.to_string()))
            .with_context("config", "load")
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::internal(e.to_string()))
            .with_context("config", "render")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sigflow_dialog_core::{DtidPolicy, ErrorProbeOrder};
    use std::collections::HashMap;
    use std::io::Write;

    pub(crate) fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    #[test]
    fn defaults_without_sources() {
        let config = AppConfig::load_with_env(None, no_env()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[correlation]
error_probe_order = "dtid_first"
report_orphan_errors = true
"#
        )
        .unwrap();

        let config = AppConfig::load_with_env(Some(file.path()), no_env()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(!config.json_logs);
        assert_eq!(config.correlation.error_probe_order, ErrorProbeOrder::DtidFirst);
        assert_eq!(config.correlation.dtid_policy, DtidPolicy::FirstSeen);
        assert!(config.correlation.report_orphan_errors);
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let env = Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::from([
            ("SIGFLOW_LOG_LEVEL".to_string(), "trace".to_string()),
            ("SIGFLOW_CORRELATION__DTID_POLICY".to_string(), "last_seen".to_string()),
        ])));

        let config = AppConfig::load_with_env(Some(file.path()), env).unwrap();
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.correlation.dtid_policy, DtidPolicy::LastSeen);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let path = Path::new("/nonexistent/sigflow.toml");
        let err = AppConfig::load_with_env(Some(path), no_env()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn renders_toml() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("log_level = \"warn\""));
        assert!(rendered.contains("error_probe_order = \"otid_first\""));
    }
}
