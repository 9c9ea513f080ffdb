//! Lazily resolved, process-wide dashboard settings.

use crate::defaults::default_config;
use crate::merge::merge;
use crate::model::{
    ConfigOverride, EXCEPTION_CATEGORIES, EXCEPTIONS_KEY, ExceptionsConfig, HorizonConfig,
    PANEL_PERMISSIONS_KEY, PASSWORD_VALIDATOR_KEY, PasswordValidatorConfig,
};
use log::{debug, info};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};

/// Permission string returned for panels with no registered entry.
pub const NO_ACCESS_PERMISSION: char = '!';

/// Settings shared by the whole process, resolved from [`default_config`].
pub static HORIZON_CONFIG: LazyLock<LazySettings> =
    LazyLock::new(|| LazySettings::new(default_config()));

/// Merged configuration plus the flattened key view used by [`ResolvedConfig::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    config: HorizonConfig,
    values: Map<String, Value>,
}

impl ResolvedConfig {
    /// Wrap a merged config.
    pub fn new(config: HorizonConfig) -> Self {
        let mut values = config.settings.clone();
        values.insert(
            EXCEPTIONS_KEY.to_string(),
            exceptions_value(&config.exceptions),
        );
        values.insert(
            PASSWORD_VALIDATOR_KEY.to_string(),
            password_validator_value(&config.password_validator),
        );
        values.insert(
            PANEL_PERMISSIONS_KEY.to_string(),
            Value::Object(
                config
                    .panel_permissions
                    .iter()
                    .map(|(panel, perms)| (panel.clone(), Value::from(perms.as_str())))
                    .collect(),
            ),
        );
        Self { config, values }
    }

    /// Typed view of the resolved configuration.
    pub fn config(&self) -> &HorizonConfig {
        &self.config
    }

    /// Value for a top-level key, or `fallback` when the key is absent.
    pub fn get(&self, key: &str, fallback: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(fallback)
    }

    /// Borrow a top-level value if present.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Permission characters registered for a panel, `['!']` when unknown.
    pub fn panel_permissions(&self, panel: &str) -> Vec<char> {
        match self.config.panel_permissions.get(panel) {
            Some(perms) => perms.chars().collect(),
            None => vec![NO_ACCESS_PERMISSION],
        }
    }
}

fn exceptions_value(exceptions: &ExceptionsConfig) -> Value {
    let mut group: Map<String, Value> = exceptions
        .extra
        .iter()
        .map(|(name, ids)| (name.clone(), Value::from(ids.clone())))
        .collect();
    for name in EXCEPTION_CATEGORIES {
        let ids = exceptions.category(name).unwrap_or_default();
        group.insert(name.to_string(), Value::from(ids.to_vec()));
    }
    Value::Object(group)
}

fn password_validator_value(validator: &PasswordValidatorConfig) -> Value {
    let mut group = validator.extra.clone();
    group.insert("regex".to_string(), Value::from(validator.regex.as_str()));
    group.insert(
        "help_text".to_string(),
        Value::from(validator.help_text.as_str()),
    );
    Value::Object(group)
}

/// Settings holder that merges defaults and overrides on first read.
///
/// The override is captured when resolution happens; later calls to
/// [`LazySettings::configure`] only take effect after [`LazySettings::reset`].
#[derive(Debug)]
pub struct LazySettings {
    defaults: HorizonConfig,
    overrides: RwLock<ConfigOverride>,
    resolved: RwLock<Option<Arc<ResolvedConfig>>>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new(default_config())
    }
}

impl LazySettings {
    /// Create an unresolved holder over the given defaults.
    pub fn new(defaults: HorizonConfig) -> Self {
        Self {
            defaults,
            overrides: RwLock::new(ConfigOverride::default()),
            resolved: RwLock::new(None),
        }
    }

    /// Create a holder with an override already in place.
    pub fn with_overrides(defaults: HorizonConfig, overrides: ConfigOverride) -> Self {
        let settings = Self::new(defaults);
        settings.configure(overrides);
        settings
    }

    /// Install the deployment override used by the next resolution.
    pub fn configure(&self, overrides: ConfigOverride) {
        info!(
            "dashboard overrides configured (keys={}, resolved={})",
            overrides.key_count(),
            self.is_resolved()
        );
        *self.overrides.write() = overrides;
    }

    /// Built-in defaults this holder resolves against.
    pub fn defaults(&self) -> &HorizonConfig {
        &self.defaults
    }

    /// Return the resolved config, resolving it first if needed.
    pub fn resolved(&self) -> Arc<ResolvedConfig> {
        if let Some(resolved) = self.resolved.read().clone() {
            return resolved;
        }

        let mut slot = self.resolved.write();
        // Another reader may have resolved while we waited for the write lock.
        if let Some(resolved) = slot.as_ref() {
            return Arc::clone(resolved);
        }
        let overrides = self.overrides.read();
        let resolved = Arc::new(ResolvedConfig::new(merge(&self.defaults, &overrides)));
        debug!(
            "resolved dashboard config (overrides={}, panels={})",
            overrides.key_count(),
            resolved.config().panel_permissions.len()
        );
        *slot = Some(Arc::clone(&resolved));
        resolved
    }

    /// Value for a top-level key, or `fallback` when the key is absent.
    pub fn get(&self, key: &str, fallback: Value) -> Value {
        self.resolved().get(key, fallback)
    }

    /// Permission characters registered for a panel, `['!']` when unknown.
    pub fn panel_permissions(&self, panel: &str) -> Vec<char> {
        self.resolved().panel_permissions(panel)
    }

    /// Whether the config has been resolved since creation or the last reset.
    pub fn is_resolved(&self) -> bool {
        self.resolved.read().is_some()
    }

    /// Drop the cached resolution so the next read resolves again.
    pub fn reset(&self) {
        let previous = self.resolved.write().take();
        info!(
            "dashboard config reset (was_resolved={})",
            previous.is_some()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExceptionsConfig, ExceptionsOverride, PasswordValidatorConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::thread;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn scenario_defaults() -> HorizonConfig {
        HorizonConfig {
            exceptions: ExceptionsConfig {
                unauthorized: strings(&["X"]),
                not_found: strings(&["Y"]),
                recoverable: strings(&["Z"]),
                extra: BTreeMap::new(),
            },
            password_validator: PasswordValidatorConfig {
                regex: "R".to_string(),
                help_text: "H".to_string(),
                extra: Map::new(),
            },
            panel_permissions: BTreeMap::from([("overview".to_string(), "abc".to_string())]),
            settings: Map::from_iter([("ajax_queue_limit".to_string(), json!(10))]),
        }
    }

    #[test]
    fn resolves_on_first_read_only() {
        let settings = LazySettings::new(scenario_defaults());
        assert!(!settings.is_resolved());
        assert_eq!(settings.get("ajax_queue_limit", Value::Null), json!(10));
        assert!(settings.is_resolved());
    }

    #[test]
    fn missing_key_returns_fallback() {
        let settings = LazySettings::new(scenario_defaults());
        assert_eq!(settings.get("not_a_key", json!("fallback")), json!("fallback"));
        assert_eq!(settings.get("not_a_key", Value::Null), Value::Null);
    }

    #[test]
    fn override_wins_for_shared_keys() {
        let overrides = ConfigOverride::builder()
            .setting("ajax_queue_limit", json!(3))
            .build();
        let settings = LazySettings::with_overrides(scenario_defaults(), overrides);
        assert_eq!(settings.get("ajax_queue_limit", Value::Null), json!(3));
    }

    #[test]
    fn later_configure_is_ignored_until_reset() {
        let settings = LazySettings::new(scenario_defaults());
        assert_eq!(settings.get("ajax_queue_limit", Value::Null), json!(10));

        settings.configure(
            ConfigOverride::builder()
                .setting("ajax_queue_limit", json!(99))
                .build(),
        );
        assert_eq!(settings.get("ajax_queue_limit", Value::Null), json!(10));

        settings.reset();
        assert!(!settings.is_resolved());
        assert_eq!(settings.get("ajax_queue_limit", Value::Null), json!(99));
    }

    #[test]
    fn scenario_resolution() {
        let overrides = ConfigOverride::builder()
            .exceptions(ExceptionsOverride {
                unauthorized: Some(strings(&["X2"])),
                ..ExceptionsOverride::default()
            })
            .build();
        let settings = LazySettings::with_overrides(scenario_defaults(), overrides);

        assert_eq!(
            settings.get("exceptions", Value::Null),
            json!({ "unauthorized": ["X2"], "not_found": ["Y"], "recoverable": ["Z"] })
        );
        assert_eq!(
            settings.get("password_validator", Value::Null),
            json!({ "regex": "R", "help_text": "H" })
        );
        assert_eq!(settings.panel_permissions("overview"), vec!['a', 'b', 'c']);
    }

    #[test]
    fn group_set_as_plain_setting_is_repaired() {
        let overrides = ConfigOverride::builder()
            .setting("exceptions", json!({ "unauthorized": ["X2"] }))
            .build();
        let settings = LazySettings::with_overrides(scenario_defaults(), overrides);

        assert_eq!(
            settings.get("exceptions", Value::Null),
            json!({ "unauthorized": ["X2"], "not_found": ["Y"], "recoverable": ["Z"] })
        );
        let resolved = settings.resolved();
        assert_eq!(resolved.config().exceptions.unauthorized, strings(&["X2"]));
        assert_eq!(
            resolved.value("exceptions"),
            Some(&json!({ "unauthorized": ["X2"], "not_found": ["Y"], "recoverable": ["Z"] }))
        );
    }

    #[test]
    fn flattened_view_keeps_extras_and_settings() {
        let mut defaults = scenario_defaults();
        defaults
            .exceptions
            .extra
            .insert("conflict".to_string(), strings(&["C"]));
        let settings = LazySettings::new(defaults);

        assert_eq!(
            settings.get("exceptions", Value::Null),
            json!({
                "unauthorized": ["X"],
                "not_found": ["Y"],
                "recoverable": ["Z"],
                "conflict": ["C"]
            })
        );
        assert_eq!(
            settings.get("panel_permissions", Value::Null),
            json!({ "overview": "abc" })
        );
        assert_eq!(settings.get("ajax_queue_limit", Value::Null), json!(10));
    }

    #[test]
    fn unregistered_panel_denies() {
        let settings = LazySettings::new(scenario_defaults());
        assert_eq!(settings.panel_permissions("nonexistent-panel"), vec!['!']);
    }

    #[test]
    fn concurrent_first_reads_share_one_resolution() {
        let settings = Arc::new(LazySettings::new(scenario_defaults()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let settings = Arc::clone(&settings);
                thread::spawn(move || settings.resolved())
            })
            .collect();
        let resolved: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .collect();
        let first = &resolved[0];
        for other in &resolved[1..] {
            assert!(Arc::ptr_eq(first, other));
        }
    }
}
