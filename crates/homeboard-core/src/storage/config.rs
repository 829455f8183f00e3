//! TOML-based application configuration.
//!
//! Stores:
//! - Display timezone and projected window length
//! - Custody and classification rules
//! - Notification lead times and display pacing
//! - Locations of the person rules and calendar event files
//!
//! Configuration is stored at `~/.config/homeboard/config.toml`.

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::dashboard::DashboardSettings;
use crate::error::{ConfigError, Result};
use crate::notify::NotificationPolicy;
use crate::planning::{CalendarEvent, ClassificationRules, Person, ProjectionContext};
use crate::sources::{load_calendar, load_persons};

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// IANA timezone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

/// Custody configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyConfig {
    #[serde(default = "default_home_location")]
    pub home_location: String,
    /// Name of the custody record to follow; the first one when unset.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default = "default_gated_terms")]
    pub gated_terms: Vec<String>,
    #[serde(default = "default_exchange_names")]
    pub exchange_names: Vec<String>,
    #[serde(default = "default_child_event_terms")]
    pub child_event_terms: Vec<String>,
}

/// Event classification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default = "default_birthday_terms")]
    pub birthday_terms: Vec<String>,
    #[serde(default = "default_leave_shift_labels")]
    pub leave_shift_labels: Vec<String>,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_one_hour_lead")]
    pub one_hour_lead_min: u32,
    #[serde(default = "default_thirty_min_lead")]
    pub thirty_min_lead_min: u32,
    #[serde(default = "default_tolerance")]
    pub tolerance_min: u32,
    #[serde(default = "default_all_day_interval")]
    pub all_day_interval_hours: u32,
    #[serde(default = "default_display_secs")]
    pub display_secs: u32,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u32,
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
    /// Ring the terminal bell when a notification is shown.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Input files configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Person rules; defaults to `persons.json` in the data directory.
    #[serde(default)]
    pub persons_path: Option<PathBuf>,
    /// Calendar events; defaults to `calendar.json` in the data directory.
    #[serde(default)]
    pub calendar_path: Option<PathBuf>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/homeboard/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub custody: CustodyConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

// Default functions
fn default_timezone() -> String {
    "Europe/Paris".into()
}
fn default_window_days() -> u32 {
    8
}
fn default_home_location() -> String {
    "Chez Papa".into()
}
fn default_gated_terms() -> Vec<String> {
    vec!["Rugby".into()]
}
fn default_exchange_names() -> Vec<String> {
    vec!["Echange enfants".into()]
}
fn default_child_event_terms() -> Vec<String> {
    vec!["Lyam".into(), "Noah".into(), "Enfant".into()]
}
fn default_birthday_terms() -> Vec<String> {
    vec!["anniversaire".into()]
}
fn default_leave_shift_labels() -> Vec<String> {
    vec!["CP".into()]
}
fn default_true() -> bool {
    true
}
fn default_one_hour_lead() -> u32 {
    60
}
fn default_thirty_min_lead() -> u32 {
    30
}
fn default_tolerance() -> u32 {
    5
}
fn default_all_day_interval() -> u32 {
    3
}
fn default_display_secs() -> u32 {
    15
}
fn default_cooldown_secs() -> u32 {
    2
}
fn default_scan_interval() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    60
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            window_days: default_window_days(),
        }
    }
}

impl Default for CustodyConfig {
    fn default() -> Self {
        Self {
            home_location: default_home_location(),
            group: None,
            gated_terms: default_gated_terms(),
            exchange_names: default_exchange_names(),
            child_event_terms: default_child_event_terms(),
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            birthday_terms: default_birthday_terms(),
            leave_shift_labels: default_leave_shift_labels(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            one_hour_lead_min: 60,
            thirty_min_lead_min: 30,
            tolerance_min: 5,
            all_day_interval_hours: 3,
            display_secs: 15,
            cooldown_secs: 2,
            scan_interval_secs: 30,
            bell: true,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            persons_path: None,
            calendar_path: None,
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    // Unset optional values accept plain strings; an empty
                    // string clears them.
                    serde_json::Value::Null if value.is_empty() => serde_json::Value::Null,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// Booleans and numbers are type-checked; lists take a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.timezone().map(|_| ())
    }

    /// Display timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.display
            .timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "display.timezone".into(),
                message: e.to_string(),
            })
    }

    pub fn classification_rules(&self) -> ClassificationRules {
        ClassificationRules {
            home_location: self.custody.home_location.clone(),
            custody_group: self.custody.group.clone().filter(|g| !g.is_empty()),
            gated_terms: self.custody.gated_terms.clone(),
            exchange_names: self.custody.exchange_names.clone(),
            child_event_terms: self.custody.child_event_terms.clone(),
            birthday_terms: self.classification.birthday_terms.clone(),
            leave_shift_labels: self.classification.leave_shift_labels.clone(),
        }
    }

    pub fn projection_context(&self) -> Result<ProjectionContext, ConfigError> {
        Ok(ProjectionContext::new(self.timezone()?, self.classification_rules()))
    }

    pub fn notification_policy(&self) -> NotificationPolicy {
        let n = &self.notifications;
        NotificationPolicy {
            one_hour_lead: Duration::minutes(i64::from(n.one_hour_lead_min)),
            thirty_min_lead: Duration::minutes(i64::from(n.thirty_min_lead_min)),
            tolerance: Duration::minutes(i64::from(n.tolerance_min)),
            all_day_interval: Duration::hours(i64::from(n.all_day_interval_hours)),
        }
    }

    pub fn dashboard_settings(&self) -> Result<DashboardSettings, ConfigError> {
        Ok(DashboardSettings {
            context: self.projection_context()?,
            window_days: self.display.window_days,
            policy: self.notification_policy(),
            notifications_enabled: self.notifications.enabled,
            display: Duration::seconds(i64::from(self.notifications.display_secs)),
            cooldown: Duration::seconds(i64::from(self.notifications.cooldown_secs)),
        })
    }

    /// Person rules file, resolved against the data directory.
    pub fn persons_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.sources.persons_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("persons.json")),
        }
    }

    /// Calendar events file, resolved against the data directory.
    pub fn calendar_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.sources.calendar_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("calendar.json")),
        }
    }

    /// Reads the configured person rules file.
    pub fn load_persons(&self) -> Result<Vec<Person>> {
        Ok(load_persons(&self.persons_path()?)?)
    }

    /// Reads the configured calendar events file.
    pub fn load_calendar(&self) -> Result<Vec<CalendarEvent>> {
        Ok(load_calendar(&self.calendar_path()?)?)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
