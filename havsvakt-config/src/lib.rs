//! # Havsvakt Configuration System
//!
//! Hierarchical configuration for the geofence alerting service.
//!
//! ## Features
//! - **Unified Configuration**: one document for evaluator, notifier, source
//!   and telemetry settings
//! - **Validation**: every section is checked with `validator` before use
//! - **Environment Awareness**: per-environment overrides and `HAVSVAKT_*`
//!   variables

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod evaluator;
mod notifier;
mod source;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use evaluator::EvaluatorConfig;
pub use notifier::{NotifierConfig, SmtpConfig};
pub use source::SourceConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/havsvakt.yaml";
const ENV_PREFIX: &str = "HAVSVAKT_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct HavsvaktConfig {
    /// Cycle cadence, staleness and state persistence.
    #[validate(nested)]
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Message transport and presentation.
    #[validate(nested)]
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Where vessels, alerts and geofences are read from.
    #[validate(nested)]
    #[serde(default)]
    pub source: SourceConfig,

    /// Logging.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl HavsvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/havsvakt.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<HAVSVAKT_ENV>.yaml` - Environment-specific overrides.
    /// 4. `HAVSVAKT_*` environment variables (`__` separates nested keys).
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(HavsvaktConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("HAVSVAKT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, on top of defaults and
    /// below environment variables.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.metadata() {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(PathBuf::from(path)));
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: PathBuf::from(path),
                    source,
                });
            }
        }

        Self::extract(
            Figment::from(Serialized::defaults(HavsvaktConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        config.check_consistency()?;
        Ok(config)
    }

    /// Cross-section rules that field-level validation cannot express.
    pub fn check_consistency(&self) -> Result<(), ConfigError> {
        if self.notifier.uses_smtp() && self.notifier.smtp.is_none() {
            return Err(ConfigError::Incomplete(
                "notifier.transport is 'smtp' but notifier.smtp is not set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = HavsvaktConfig::default();
        config.validate().expect("Default config should validate");
        config.check_consistency().expect("Default config is consistent");
    }

    #[test]
    fn file_and_environment_layers() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/havsvakt.yaml",
                r#"
evaluator:
  interval_secs: 30
  state_path: state/membership.json
notifier:
  subject_prefix: Port Ops
"#,
            )?;
            jail.set_env("HAVSVAKT_EVALUATOR__INTERVAL_SECS", "15");

            let config = HavsvaktConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.evaluator.interval_secs, 15);
            assert_eq!(
                config.evaluator.state_path,
                Some(PathBuf::from("state/membership.json"))
            );
            assert_eq!(config.notifier.subject_prefix, "Port Ops");
            assert_eq!(config.notifier.transport, "log");
            Ok(())
        });
    }

    #[test]
    fn smtp_transport_requires_relay() {
        Jail::expect_with(|jail| {
            jail.create_file("havsvakt.yaml", "notifier:\n  transport: smtp\n")?;
            let result = HavsvaktConfig::load_from_path("havsvakt.yaml");
            assert!(matches!(result, Err(ConfigError::Incomplete(_))));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_reported() {
        Jail::expect_with(|jail| {
            jail.create_file("havsvakt.yaml", "evaluator:\n  interval_secs: 0\n")?;
            let result = HavsvaktConfig::load_from_path("havsvakt.yaml");
            assert!(matches!(result, Err(ConfigError::Validation(_))));
            Ok(())
        });
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            HavsvaktConfig::load_from_path("does/not/exist.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
