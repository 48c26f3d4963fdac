//! User settings for Ahorra
//!
//! Stored as `config.json` in the base directory. Every field has a serde
//! default so older files keep loading as new settings appear.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// What happens when an expense would push a budget past its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementMode {
    /// Always record; alerts inform afterwards
    #[default]
    Advisory,
    /// Reject the write
    Strict,
}

impl fmt::Display for EnforcementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advisory => write!(f, "advisory"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for EnforcementMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisory" => Ok(Self::Advisory),
            "strict" => Ok(Self::Strict),
            other => Err(LedgerError::Config(format!(
                "Unknown enforcement mode '{}' (expected advisory or strict)",
                other
            ))),
        }
    }
}

/// Budget alert behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Skip a notification when the user already has one with the same
    /// category, severity and period
    #[serde(default)]
    pub deduplicate_per_period: bool,
}

/// User settings for Ahorra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub enforcement: EnforcementMode,

    #[serde(default)]
    pub alerts: AlertSettings,

    /// Currency symbol used when rendering amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for display (strftime)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            enforcement: EnforcementMode::default(),
            alerts: AlertSettings::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Nothing is written; `ahorra init` decides when to persist.
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))
    }

    /// Change one setting by name, as given on the command line
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        match key {
            "enforcement" => self.enforcement = value.parse()?,
            "dedup" | "deduplicate" => {
                self.alerts.deduplicate_per_period = match value.trim().to_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    other => {
                        return Err(LedgerError::Config(format!(
                            "Expected true or false for {}, got '{}'",
                            key, other
                        )))
                    }
                }
            }
            "currency" => self.currency_symbol = value.to_string(),
            "date-format" => self.date_format = value.to_string(),
            other => return Err(LedgerError::Config(format!("Unknown setting '{}'", other))),
        }
        Ok(())
    }
}
