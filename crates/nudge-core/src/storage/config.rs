//! TOML-based engine configuration.
//!
//! Holds the dispatch budget, timing model tuning and optional user
//! context rules. Stored at `~/.config/nudge/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::context::{ContextRule, ContextRuleSet, RuleAction};
use crate::error::{ConfigError, Result, ValidationError};

pub const MIN_DAILY_LIMIT: u32 = 1;
pub const MAX_DAILY_LIMIT: u32 = 50;
const MAX_PREDICTION_WINDOW_HOURS: u32 = 168;

/// Delivery budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Deliveries allowed per day (1-50)
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    /// Minimum gap between two deliveries
    #[serde(default = "default_minimum_interval_secs")]
    pub minimum_interval_secs: u64,
    /// Critical items are scheduled immediately instead of at the
    /// predicted best time
    #[serde(default = "default_true")]
    pub bypass_timing_for_critical: bool,
}

/// Timing model tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,
    #[serde(default = "default_prediction_window_hours")]
    pub prediction_window_hours: u32,
    #[serde(default = "default_true")]
    pub adaptive_scheduling: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    /// User rules; the built-in set applies when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ContextRule>,
}

fn default_daily_limit() -> u32 {
    20
}
fn default_minimum_interval_secs() -> u64 {
    300
}
fn default_decay_factor() -> f64 {
    crate::timing::DEFAULT_DECAY_FACTOR
}
fn default_prediction_window_hours() -> u32 {
    24
}
fn default_true() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            minimum_interval_secs: default_minimum_interval_secs(),
            bypass_timing_for_critical: true,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            decay_factor: default_decay_factor(),
            prediction_window_hours: default_prediction_window_hours(),
            adaptive_scheduling: true,
        }
    }
}

impl DispatchConfig {
    /// Daily limit clamped to 1-50.
    pub fn effective_daily_limit(&self) -> u32 {
        self.daily_limit.clamp(MIN_DAILY_LIMIT, MAX_DAILY_LIMIT)
    }
}

fn out_of_range(field: &str, value: f64, min: f64, max: f64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        value,
        min,
        max,
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::MissingKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        value
                            .parse::<f64>()
                            .ok()
                            .and_then(serde_json::Number::from_f64)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }
        Err(unknown())
    }

    /// `~/.config/nudge/config.toml`
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when the file is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
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
            other => Some(other.to_string()),
        }
    }

    /// Change one value in memory. The existing value's type decides how
    /// `value` is parsed; the result must pass [`validate`](Self::validate).
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// [`update`](Self::update) and save to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let limit = self.dispatch.daily_limit;
        if !(MIN_DAILY_LIMIT..=MAX_DAILY_LIMIT).contains(&limit) {
            return Err(out_of_range(
                "dispatch.daily_limit",
                f64::from(limit),
                f64::from(MIN_DAILY_LIMIT),
                f64::from(MAX_DAILY_LIMIT),
            ));
        }

        let decay = self.timing.decay_factor;
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(out_of_range("timing.decay_factor", decay, 0.0, 1.0));
        }

        let window = self.timing.prediction_window_hours;
        if window == 0 || window > MAX_PREDICTION_WINDOW_HOURS {
            return Err(out_of_range(
                "timing.prediction_window_hours",
                f64::from(window),
                1.0,
                f64::from(MAX_PREDICTION_WINDOW_HOURS),
            ));
        }

        for rule in &self.rules {
            if let RuleAction::Throttle { factor } = rule.action {
                if !(0.0..=1.0).contains(&factor) {
                    return Err(out_of_range(
                        &format!("rules.{}.action.factor", rule.name),
                        factor,
                        0.0,
                        1.0,
                    ));
                }
            }
            if rule.name.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "rules.name".to_string(),
                    message: "rule name is empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Configured rules, or the built-in set when none are configured.
    pub fn rule_set(&self) -> ContextRuleSet {
        if self.rules.is_empty() {
            ContextRuleSet::with_defaults()
        } else {
            ContextRuleSet::from_rules(self.rules.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Condition, FocusMode};
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.dispatch.daily_limit, 20);
        assert_eq!(parsed.dispatch.minimum_interval_secs, 300);
        assert_eq!(parsed.timing.prediction_window_hours, 24);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[dispatch]\ndaily_limit = 5\n").unwrap();
        assert_eq!(cfg.dispatch.daily_limit, 5);
        assert!(cfg.dispatch.bypass_timing_for_critical);
        assert_eq!(cfg.timing.decay_factor, 0.95);
        assert!(cfg.rules.is_empty());
    }

    #[test]
    fn rules_parse_from_toml() {
        let cfg: Config = toml::from_str(
            r#"
            [[rules]]
            name = "No pings at work"

            [rules.condition]
            type = "Focus"
            mode = "work"

            [rules.action]
            type = "BlockLowPriority"
            "#,
        )
        .unwrap();
        let rules = cfg.rule_set();
        assert_eq!(rules.rules().len(), 1);
        assert_eq!(
            rules.rules()[0].condition,
            Condition::Focus {
                mode: FocusMode::Work
            }
        );
    }

    #[test]
    fn empty_rules_use_defaults() {
        assert_eq!(Config::default().rule_set().rules().len(), 4);
    }

    #[test]
    fn effective_daily_limit_is_clamped() {
        let mut cfg = Config::default();
        cfg.dispatch.daily_limit = 500;
        assert_eq!(cfg.dispatch.effective_daily_limit(), 50);
        cfg.dispatch.daily_limit = 0;
        assert_eq!(cfg.dispatch.effective_daily_limit(), 1);
    }

    #[test]
    fn get_by_dot_path() {
        let cfg = Config::default();
        assert_eq!(cfg.get("dispatch.daily_limit").as_deref(), Some("20"));
        assert_eq!(cfg.get("timing.adaptive_scheduling").as_deref(), Some("true"));
        assert_eq!(cfg.get("timing.missing"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn update_parses_by_existing_type() {
        let mut cfg = Config::default();
        cfg.update("dispatch.daily_limit", "12").unwrap();
        cfg.update("timing.decay_factor", "0.9").unwrap();
        cfg.update("dispatch.bypass_timing_for_critical", "false").unwrap();
        assert_eq!(cfg.dispatch.daily_limit, 12);
        assert_eq!(cfg.timing.decay_factor, 0.9);
        assert!(!cfg.dispatch.bypass_timing_for_critical);
    }

    #[test]
    fn update_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("dispatch.nope", "1"),
            Err(CoreError::Config(ConfigError::MissingKey(_)))
        ));
        assert!(matches!(
            cfg.update("dispatch.daily_limit", "many"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(matches!(
            cfg.update("dispatch.daily_limit", "80"),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(cfg.dispatch.daily_limit, 20);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut edited = cfg;
        edited.update("timing.prediction_window_hours", "12").unwrap();
        edited.save_to(&path).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap().timing.prediction_window_hours,
            12
        );
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "dispatch = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn load_from_reports_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be read as a file
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
