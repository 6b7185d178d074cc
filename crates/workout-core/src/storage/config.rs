//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Storage slot key
//! - Calendar week start
//! - Default rest timer duration for a fresh state
//! - Alarm behaviour
//! - Default weight unit
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::DEFAULT_SLOT_KEY;
use crate::derive::WeekStart;
use crate::error::ConfigError;
use crate::model::WeightUnit;
use crate::timer::{DEFAULT_ALARM_SECS, DEFAULT_REST_MINUTES, DEFAULT_REST_SECONDS};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CalendarConfig {
    #[serde(default)]
    pub week_start: WeekStart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestTimerConfig {
    #[serde(default = "default_rest_minutes")]
    pub default_minutes: u32,
    #[serde(default = "default_rest_seconds")]
    pub default_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How long the alarm keeps repeating after expiry.
    #[serde(default = "default_alarm_secs")]
    pub duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UnitsConfig {
    #[serde(default)]
    pub default_unit: WeightUnit,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub rest_timer: RestTimerConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub units: UnitsConfig,
}

fn default_slot_key() -> String {
    DEFAULT_SLOT_KEY.into()
}
fn default_rest_minutes() -> u32 {
    u32::from(DEFAULT_REST_MINUTES)
}
fn default_rest_seconds() -> u32 {
    u32::from(DEFAULT_REST_SECONDS)
}
fn default_true() -> bool {
    true
}
fn default_alarm_secs() -> u64 {
    DEFAULT_ALARM_SECS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            slot_key: default_slot_key(),
        }
    }
}

impl Default for RestTimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_rest_minutes(),
            default_seconds: default_rest_seconds(),
        }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: DEFAULT_ALARM_SECS,
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
        if key.is_empty() {
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
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load from `<dir>/config.toml`, writing the defaults if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(dir)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Persist to `<dir>/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(dir);
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::create_dir_all(dir).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The new value is typed against the
    /// existing one and must deserialize back into a valid `Config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Dot-path keys of every leaf value, sorted.
    pub fn keys(&self) -> Vec<String> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let path = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&path, v, out);
                    }
                }
                _ => out.push(prefix.to_string()),
            }
        }
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.storage.slot_key, "workoutCalendar.v1");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[calendar]\nweek_start = \"monday\"\n").unwrap();
        assert_eq!(parsed.calendar.week_start, WeekStart::Monday);
        assert_eq!(parsed.rest_timer.default_seconds, 30);
        assert!(parsed.alarm.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("alarm.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("rest_timer.default_minutes").as_deref(), Some("1"));
        assert_eq!(cfg.get("calendar.week_start").as_deref(), Some("sunday"));
        assert!(cfg.get("alarm.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("alarm.enabled", "false").unwrap();
        cfg.set("alarm.duration_secs", "25").unwrap();
        cfg.set("units.default_unit", "lb").unwrap();
        assert!(!cfg.alarm.enabled);
        assert_eq!(cfg.alarm.duration_secs, 25);
        assert_eq!(cfg.units.default_unit, WeightUnit::Lb);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("alarm.volume", "3"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("alarm.enabled", "loud").is_err());
        assert!(cfg.set("calendar.week_start", "friday").is_err());
        assert!(cfg.set("alarm", "x").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(Config::path_in(dir.path()).exists());

        let mut changed = cfg.clone();
        changed.set("rest_timer.default_minutes", "3").unwrap();
        changed.save_to(dir.path()).unwrap();
        assert_eq!(Config::load_from(dir.path()).unwrap().rest_timer.default_minutes, 3);
    }

    #[test]
    fn keys_lists_leaves() {
        let keys = Config::default().keys();
        assert!(keys.contains(&"storage.slot_key".to_string()));
        assert!(keys.contains(&"alarm.duration_secs".to_string()));
        assert_eq!(keys.len(), 7);
    }
}
