use std::path::PathBuf;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use dash_domain::{parse_weekday, weekday_name};

use crate::ConfigError;

/// Stores user-configurable preferences for the dashboard engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_week_starts_on")]
    pub week_starts_on: String,
    /// Budget that expenses are measured against. Zero means no budget set.
    #[serde(default)]
    pub monthly_budget: f64,
    #[serde(default = "Config::default_free_event_limit")]
    pub free_event_limit: usize,
    #[serde(default = "Config::default_expiry_warning_days")]
    pub expiry_warning_days: i64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_snapshot: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "fr-FR".into(),
            currency: "EUR".into(),
            week_starts_on: Self::default_week_starts_on(),
            monthly_budget: 0.0,
            free_event_limit: Self::default_free_event_limit(),
            expiry_warning_days: Self::default_expiry_warning_days(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_snapshot: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "locale",
        "currency",
        "week_starts_on",
        "monthly_budget",
        "free_event_limit",
        "expiry_warning_days",
        "ui_color_enabled",
    ];

    pub fn default_week_starts_on() -> String {
        "monday".into()
    }

    pub fn default_free_event_limit() -> usize {
        5
    }

    pub fn default_expiry_warning_days() -> i64 {
        3
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Configured first day of the week, Monday when the stored value is unreadable.
    pub fn week_start(&self) -> Weekday {
        parse_weekday(&self.week_starts_on).unwrap_or(Weekday::Mon)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "week_starts_on" => self.week_starts_on.clone(),
            "monthly_budget" => format!("{:.2}", self.monthly_budget),
            "free_event_limit" => self.free_event_limit.to_string(),
            "expiry_warning_days" => self.expiry_warning_days.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Parses and assigns a single key from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        match key {
            "locale" if !value.is_empty() => self.locale = value.to_string(),
            "currency" if !value.is_empty() => self.currency = value.to_ascii_uppercase(),
            "locale" | "currency" => return Err(invalid("must not be empty")),
            "week_starts_on" => {
                let day = parse_weekday(value).ok_or_else(|| invalid("expected a weekday name"))?;
                self.week_starts_on = weekday_name(day).to_string();
            }
            "monthly_budget" => {
                let amount: f64 = value
                    .parse()
                    .map_err(|_| invalid("expected a number"))?;
                if !amount.is_finite() || amount < 0.0 {
                    return Err(invalid("must be a non-negative amount"));
                }
                self.monthly_budget = amount;
            }
            "free_event_limit" => {
                self.free_event_limit = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
            }
            "expiry_warning_days" => {
                let days: i64 = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number of days"))?;
                if days < 0 {
                    return Err(invalid("must not be negative"));
                }
                self.expiry_warning_days = days;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid("expected on/off")),
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}
