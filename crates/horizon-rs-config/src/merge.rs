//! Default/override merge with sub-key repair.

use crate::model::{
    ConfigOverride, EXCEPTIONS_KEY, ExceptionsConfig, ExceptionsOverride, HorizonConfig,
    PANEL_PERMISSIONS_KEY, PASSWORD_VALIDATOR_KEY, PasswordValidatorConfig,
    PasswordValidatorOverride, decode_group, is_group_key,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Combine the defaults with an override.
///
/// Top-level keys are replaced wholesale. The `exceptions`,
/// `password_validator` and `panel_permissions` groups then get each required
/// sub-key the override left out copied back from the defaults. A group that
/// was placed in `settings` instead of its typed slot is repaired the same
/// way; the typed slot wins when both are set. Neither input is modified.
pub fn merge(defaults: &HorizonConfig, overrides: &ConfigOverride) -> HorizonConfig {
    let mut resolved = defaults.clone();

    for (key, value) in &overrides.settings {
        if !is_group_key(key) {
            resolved.settings.insert(key.clone(), value.clone());
        }
    }

    let exceptions = overrides
        .exceptions
        .clone()
        .or_else(|| group_from_settings(overrides, EXCEPTIONS_KEY));
    if let Some(exceptions) = exceptions {
        resolved.exceptions = repair_exceptions(&exceptions, &defaults.exceptions);
    }
    let validator = overrides
        .password_validator
        .clone()
        .or_else(|| group_from_settings(overrides, PASSWORD_VALIDATOR_KEY));
    if let Some(validator) = validator {
        resolved.password_validator =
            repair_password_validator(&validator, &defaults.password_validator);
    }
    let panels = overrides
        .panel_permissions
        .clone()
        .or_else(|| group_from_settings(overrides, PANEL_PERMISSIONS_KEY));
    if let Some(panels) = panels {
        resolved.panel_permissions =
            repair_panel_permissions(&panels, &defaults.panel_permissions);
    }

    resolved
}

fn group_from_settings<T: DeserializeOwned>(overrides: &ConfigOverride, key: &str) -> Option<T> {
    overrides
        .settings
        .get(key)
        .and_then(|value| decode_group(key, value))
}

fn repair_exceptions(
    overrides: &ExceptionsOverride,
    defaults: &ExceptionsConfig,
) -> ExceptionsConfig {
    ExceptionsConfig {
        unauthorized: overrides
            .unauthorized
            .clone()
            .unwrap_or_else(|| defaults.unauthorized.clone()),
        not_found: overrides
            .not_found
            .clone()
            .unwrap_or_else(|| defaults.not_found.clone()),
        recoverable: overrides
            .recoverable
            .clone()
            .unwrap_or_else(|| defaults.recoverable.clone()),
        // The override group replaced the default one, so default extras are gone.
        extra: overrides.extra.clone(),
    }
}

fn repair_password_validator(
    overrides: &PasswordValidatorOverride,
    defaults: &PasswordValidatorConfig,
) -> PasswordValidatorConfig {
    PasswordValidatorConfig {
        regex: overrides
            .regex
            .clone()
            .unwrap_or_else(|| defaults.regex.clone()),
        help_text: overrides
            .help_text
            .clone()
            .unwrap_or_else(|| defaults.help_text.clone()),
        extra: overrides.extra.clone(),
    }
}

/// Every panel known to the defaults is a required entry.
fn repair_panel_permissions(
    overrides: &BTreeMap<String, String>,
    defaults: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut panels = overrides.clone();
    for (panel, perms) in defaults {
        panels
            .entry(panel.clone())
            .or_insert_with(|| perms.clone());
    }
    panels
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};

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
            settings: Map::new(),
        }
    }

    #[test]
    fn partial_exceptions_are_repaired_from_defaults() {
        let defaults = scenario_defaults();
        let overrides = ConfigOverride::builder()
            .exceptions(ExceptionsOverride {
                unauthorized: Some(strings(&["X2"])),
                ..ExceptionsOverride::default()
            })
            .build();

        let resolved = merge(&defaults, &overrides);
        assert_eq!(
            resolved.exceptions,
            ExceptionsConfig {
                unauthorized: strings(&["X2"]),
                not_found: strings(&["Y"]),
                recoverable: strings(&["Z"]),
                extra: BTreeMap::new(),
            }
        );
        assert_eq!(resolved.password_validator, defaults.password_validator);
        assert_eq!(resolved.panel_permissions, defaults.panel_permissions);
    }

    #[test]
    fn password_validator_fills_missing_help_text() {
        let defaults = scenario_defaults();
        let overrides = ConfigOverride::builder()
            .password_validator(PasswordValidatorOverride {
                regex: Some("^.{8,}$".to_string()),
                ..PasswordValidatorOverride::default()
            })
            .build();

        let resolved = merge(&defaults, &overrides);
        assert_eq!(resolved.password_validator.regex, "^.{8,}$");
        assert_eq!(resolved.password_validator.help_text, "H");
    }

    #[test]
    fn panel_table_keeps_override_entries_and_restores_defaults() {
        let defaults = scenario_defaults();
        let overrides = ConfigOverride::builder()
            .panel_permissions([("admin", "z")])
            .build();

        let resolved = merge(&defaults, &overrides);
        assert_eq!(
            resolved.panel_permissions,
            BTreeMap::from([
                ("admin".to_string(), "z".to_string()),
                ("overview".to_string(), "abc".to_string()),
            ])
        );
    }

    #[test]
    fn overridden_panel_entry_wins() {
        let defaults = scenario_defaults();
        let overrides = ConfigOverride::builder()
            .panel_permissions([("overview", "q")])
            .build();

        let resolved = merge(&defaults, &overrides);
        assert_eq!(
            resolved.panel_permissions.get("overview").map(String::as_str),
            Some("q")
        );
    }

    #[test]
    fn top_level_settings_replace_without_recursing() {
        let mut defaults = scenario_defaults();
        defaults.settings.insert(
            "auto_fade_alerts".to_string(),
            json!({ "delay": 3000, "fade_duration": 1500 }),
        );
        defaults
            .settings
            .insert("ajax_queue_limit".to_string(), json!(10));
        let overrides = ConfigOverride::builder()
            .setting("auto_fade_alerts", json!({ "delay": 10 }))
            .build();

        let resolved = merge(&defaults, &overrides);
        assert_eq!(
            resolved.settings.get("auto_fade_alerts"),
            Some(&json!({ "delay": 10 }))
        );
        assert_eq!(resolved.settings.get("ajax_queue_limit"), Some(&json!(10)));
    }

    #[test]
    fn override_extras_replace_default_extras() {
        let mut defaults = scenario_defaults();
        defaults
            .exceptions
            .extra
            .insert("conflict".to_string(), strings(&["C"]));
        let overrides = ConfigOverride::builder()
            .exceptions(ExceptionsOverride {
                extra: BTreeMap::from([("quota".to_string(), strings(&["Q"]))]),
                ..ExceptionsOverride::default()
            })
            .build();

        let resolved = merge(&defaults, &overrides);
        assert_eq!(resolved.exceptions.category("conflict"), None);
        assert_eq!(
            resolved.exceptions.category("quota"),
            Some(&strings(&["Q"])[..])
        );
        assert_eq!(resolved.exceptions.unauthorized, strings(&["X"]));
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let defaults = scenario_defaults();
        let snapshot = defaults.clone();
        let overrides = ConfigOverride::builder()
            .panel_permissions([("admin", "z")])
            .setting("help_url", json!("https://docs.example.org"))
            .build();

        let _ = merge(&defaults, &overrides);
        assert_eq!(defaults, snapshot);
    }

    #[test]
    fn groups_in_open_settings_are_repaired() {
        let defaults = scenario_defaults();
        let mut overrides = ConfigOverride::default();
        overrides
            .settings
            .insert("exceptions".to_string(), json!({ "unauthorized": ["X2"] }));
        overrides
            .settings
            .insert("panel_permissions".to_string(), json!({ "admin": "z" }));

        let resolved = merge(&defaults, &overrides);
        assert_eq!(resolved.exceptions.unauthorized, strings(&["X2"]));
        assert_eq!(resolved.exceptions.not_found, strings(&["Y"]));
        assert_eq!(resolved.exceptions.recoverable, strings(&["Z"]));
        assert_eq!(
            resolved.panel_permissions.get("overview").map(String::as_str),
            Some("abc")
        );
        assert_eq!(
            resolved.panel_permissions.get("admin").map(String::as_str),
            Some("z")
        );
        assert!(resolved.settings.is_empty());
    }

    #[test]
    fn malformed_group_in_settings_keeps_defaults() {
        let defaults = scenario_defaults();
        let mut overrides = ConfigOverride::default();
        overrides
            .settings
            .insert("password_validator".to_string(), json!(["R2"]));

        let resolved = merge(&defaults, &overrides);
        assert_eq!(resolved.password_validator, defaults.password_validator);
        assert!(!resolved.settings.contains_key("password_validator"));
    }
}
