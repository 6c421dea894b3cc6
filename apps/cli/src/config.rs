//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by main)             │
//! │     --format json, --negative-cost clamp                               │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     PICSPLIT_NEGATIVE_COST=clamp                                       │
//! │     PICSPLIT_OUTPUT_FORMAT=json                                        │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/picsplit/config.toml (Linux)                             │
//! │     ~/Library/Application Support/app.picsplit.picsplit/ (macOS)       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [settlement]
//! negative_cost = "propagate"   # propagate | clamp
//!
//! [bill]
//! dedupe_item_names = true
//! merge_discount_lines = true
//! discount_marker = "code128割引"
//!
//! [output]
//! format = "text"               # text | json
//! currency_symbol = "¥"
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};

use picsplit_core::{NegativeCostPolicy, NormalizeOptions, SettleOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

// =============================================================================
// Output Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Printed before every amount in text reports.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Default tracing filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_currency_symbol() -> String {
    "¥".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: OutputFormat::default(),
            currency_symbol: default_currency_symbol(),
            log_level: default_log_level(),
        }
    }
}

// =============================================================================
// Load Report
// =============================================================================

/// An environment variable whose value could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// What `AppConfig::load` did. Loading runs before the subscriber exists,
/// so the caller logs this once tracing is installed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Config file that was read, if any.
    pub source: Option<PathBuf>,
    pub rejected: Vec<RejectedOverride>,
}

impl LoadReport {
    pub fn log(&self) {
        match &self.source {
            Some(path) => info!(?path, "Loaded config from file"),
            None => debug!("No config file, using defaults"),
        }
        for rejected in &self.rejected {
            warn!(
                value = %rejected.value,
                reason = %rejected.reason,
                "Ignoring {}",
                rejected.var
            );
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settlement: SettleOptions,

    #[serde(default)]
    pub bill: NormalizeOptions,

    #[serde(default)]
    pub output: OutputSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> CliResult<(Self, LoadReport)> {
        let mut config = Self::default();
        let mut report = LoadReport::default();

        let path = config_path
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                let contents = std::fs::read_to_string(&path).map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
                config = Self::from_toml(&contents)?;
                report.source = Some(path);
            } else if config_path.is_some() {
                return Err(CliError::InvalidConfig(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
        }

        report.rejected = config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok((config, report))
    }

    /// Parses a TOML document; missing sections take their defaults.
    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.bill.merge_discount_lines && self.bill.discount_marker.trim().is_empty() {
            return Err(CliError::InvalidConfig(
                "bill.discount_marker must not be empty when merge_discount_lines is on".into(),
            ));
        }
        Ok(())
    }

    /// Applies environment variable overrides and returns the ones whose
    /// value could not be parsed. `lookup` is `std::env::var` outside tests.
    fn apply_env_overrides<F>(&mut self, lookup: F) -> Vec<RejectedOverride>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();

        if let Some(value) = lookup("PICSPLIT_NEGATIVE_COST") {
            match value.parse::<NegativeCostPolicy>() {
                Ok(parsed) => self.settlement.negative_cost = parsed,
                Err(e) => rejected.push(RejectedOverride {
                    var: "PICSPLIT_NEGATIVE_COST",
                    value,
                    reason: e.to_string(),
                }),
            }
        }

        if let Some(value) = lookup("PICSPLIT_OUTPUT_FORMAT") {
            match value.parse::<OutputFormat>() {
                Ok(parsed) => self.output.format = parsed,
                Err(reason) => rejected.push(RejectedOverride {
                    var: "PICSPLIT_OUTPUT_FORMAT",
                    value,
                    reason,
                }),
            }
        }

        if let Some(symbol) = lookup("PICSPLIT_CURRENCY_SYMBOL") {
            self.output.currency_symbol = symbol;
        }

        if let Some(level) = lookup("PICSPLIT_LOG_LEVEL") {
            self.output.log_level = level;
        }

        rejected
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "picsplit", "picsplit")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.settlement.negative_cost, NegativeCostPolicy::Propagate);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.currency_symbol, "¥");
        assert!(config.bill.merge_discount_lines);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [settlement]
            negative_cost = "clamp"

            [output]
            currency_symbol = "$"
            "#,
        )
        .unwrap();
        assert_eq!(config.settlement.negative_cost, NegativeCostPolicy::Clamp);
        assert_eq!(config.output.currency_symbol, "$");
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.bill.discount_marker, "code128割引");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PICSPLIT_NEGATIVE_COST", "clamp"),
            ("PICSPLIT_OUTPUT_FORMAT", "json"),
            ("PICSPLIT_CURRENCY_SYMBOL", "€"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        let rejected = config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert!(rejected.is_empty());
        assert_eq!(config.settlement.negative_cost, NegativeCostPolicy::Clamp);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.currency_symbol, "€");
    }

    #[test]
    fn test_unknown_env_values_are_rejected() {
        let mut config = AppConfig::default();
        let rejected = config.apply_env_overrides(|key| match key {
            "PICSPLIT_NEGATIVE_COST" => Some("clmap".to_string()),
            "PICSPLIT_OUTPUT_FORMAT" => Some("xml".to_string()),
            _ => None,
        });

        assert_eq!(config, AppConfig::default());
        let vars: Vec<_> = rejected.iter().map(|r| r.var).collect();
        assert_eq!(vars, vec!["PICSPLIT_NEGATIVE_COST", "PICSPLIT_OUTPUT_FORMAT"]);
        assert_eq!(rejected[0].value, "clmap");
        assert!(!rejected[0].reason.is_empty());
    }

    #[test]
    fn test_rejected_overrides_are_logged() {
        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut config = AppConfig::default();
        let report = LoadReport {
            source: None,
            rejected: config.apply_env_overrides(|key| {
                (key == "PICSPLIT_NEGATIVE_COST").then(|| "clmap".to_string())
            }),
        };

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || report.log());

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"));
        assert!(logged.contains("Ignoring PICSPLIT_NEGATIVE_COST"));
        assert!(logged.contains("clmap"));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let mut config = AppConfig::default();
        config.bill.discount_marker = " ".to_string();
        assert!(matches!(config.validate(), Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"json\"").unwrap();

        let (config, report) = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(report.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }
}
