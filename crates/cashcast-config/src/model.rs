use std::{fmt, path::PathBuf, str::FromStr};

use cashcast_domain::Severity;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Horizon used when the CLI is given no `--months`.
    #[serde(default = "Config::default_months_value")]
    pub default_months: i32,
    #[serde(default = "Config::default_min_alert_severity")]
    pub min_alert_severity: Severity,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default = "Config::default_enabled")]
    pub advanced_alerts: bool,
    #[serde(default = "Config::default_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_months: Self::default_months_value(),
            min_alert_severity: Self::default_min_alert_severity(),
            output: OutputFormat::default(),
            advanced_alerts: Self::default_enabled(),
            ui_color_enabled: Self::default_enabled(),
        }
    }
}

impl Config {
    pub fn default_months_value() -> i32 {
        12
    }

    pub fn default_min_alert_severity() -> Severity {
        Severity::Info
    }

    pub fn default_enabled() -> bool {
        true
    }

    /// Application home: `CASHCAST_HOME` when set, otherwise `~/.cashcast`.
    pub fn resolve_home_dir() -> PathBuf {
        if let Some(custom) = std::env::var_os("CASHCAST_HOME") {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cashcast")
    }

    /// Updates one preference from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_ascii_uppercase(),
            "default_months" => {
                let months: i32 = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a whole number"))?;
                if months <= 0 {
                    return Err(invalid(key, value, "must be positive"));
                }
                self.default_months = months;
            }
            "min_alert_severity" => {
                self.min_alert_severity =
                    value.parse().map_err(|err: String| invalid(key, value, &err))?;
            }
            "output" => {
                self.output = value.parse().map_err(|err: String| invalid(key, value, &err))?;
            }
            "advanced_alerts" => self.advanced_alerts = parse_flag(key, value)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(key, value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("default_months", self.default_months.to_string()),
            ("min_alert_severity", self.min_alert_severity.to_string()),
            ("output", self.output.to_string()),
            ("advanced_alerts", self.advanced_alerts.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        };
        f.write_str(label)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(invalid(key, value, "must not be empty"))
    } else {
        Ok(value.to_string())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
