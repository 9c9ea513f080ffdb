//! Schema validation helpers for dashboard override layers.

use crate::ConfigError;
use crate::model::{EXCEPTIONS_KEY, PANEL_PERMISSIONS_KEY, PASSWORD_VALIDATOR_KEY};
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};

/// Well-known keys whose type is checked; anything else passes through.
const KNOWN_KEYS: &[&str] = &[
    "dashboards",
    "default_dashboard",
    "user_home",
    "ajax_queue_limit",
    "ajax_poll_interval",
    "auto_fade_alerts",
    "help_url",
    "modal_backdrop",
    "password_autocomplete",
    "angular_modules",
    "js_files",
    "js_spec_files",
    "external_templates",
    "neutron_disabled",
    "create_instance_flavor_sort",
    "create_instance_flavor_group_order",
    EXCEPTIONS_KEY,
    PASSWORD_VALIDATOR_KEY,
    PANEL_PERMISSIONS_KEY,
];

/// Validate a single override layer against the schema.
pub(super) fn validate_override_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;

    for key in map.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            debug!("passing through unrecognised key (layer={layer}, key={key})");
        }
    }

    for key in ["dashboards", "angular_modules", "js_files", "js_spec_files", "external_templates"] {
        if let Some(value) = map.get(key) {
            validate_string_array(value, layer, key)?;
        }
    }
    for key in ["default_dashboard", "user_home", "help_url"] {
        if let Some(value) = map.get(key) {
            expect_optional_string(value, layer, key)?;
        }
    }
    for key in ["modal_backdrop", "password_autocomplete"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, key)?;
        }
    }
    for key in ["ajax_queue_limit", "ajax_poll_interval"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, key)?;
        }
    }
    if let Some(value) = map.get("neutron_disabled") {
        expect_bool(value, layer, "neutron_disabled")?;
    }
    if let Some(value) = map.get("auto_fade_alerts") {
        validate_auto_fade_alerts(value, layer, "auto_fade_alerts")?;
    }
    if let Some(value) = map.get("create_instance_flavor_sort") {
        validate_flavor_sort(value, layer, "create_instance_flavor_sort")?;
    }
    if let Some(value) = map.get("create_instance_flavor_group_order") {
        validate_string_array(value, layer, "create_instance_flavor_group_order")?;
    }
    if let Some(value) = non_null(map, EXCEPTIONS_KEY) {
        validate_exceptions(value, layer, EXCEPTIONS_KEY)?;
    }
    if let Some(value) = non_null(map, PASSWORD_VALIDATOR_KEY) {
        validate_password_validator(value, layer, PASSWORD_VALIDATOR_KEY)?;
    }
    if let Some(value) = non_null(map, PANEL_PERMISSIONS_KEY) {
        validate_panel_permissions(value, layer, PANEL_PERMISSIONS_KEY)?;
    }

    Ok(())
}

/// A null group counts as "not overridden".
fn non_null<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

/// Validate the "exceptions" block: every category is a list of identifiers.
fn validate_exceptions(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    for (category, entries) in map {
        validate_string_array(entries, layer, &join_path(path, category))?;
    }
    Ok(())
}

/// Validate the "password_validator" block.
fn validate_password_validator(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    if let Some(value) = map.get("regex") {
        let regex_path = join_path(path, "regex");
        expect_string(value, layer, &regex_path)?;
        if let Some(pattern) = value.as_str() {
            Regex::new(pattern).map_err(|err| {
                invalid_field(layer, &regex_path, &format!("invalid regex: {err}"))
            })?;
        }
    }
    if let Some(value) = map.get("help_text") {
        expect_string(value, layer, &join_path(path, "help_text"))?;
    }
    Ok(())
}

/// Validate the "panel_permissions" block: panel name to permission string.
fn validate_panel_permissions(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    for (panel, perms) in map {
        expect_string(perms, layer, &join_path(path, panel))?;
    }
    Ok(())
}

/// Validate the "auto_fade_alerts" block.
fn validate_auto_fade_alerts(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["delay", "fade_duration", "types"], layer, path)?;
    for key in ["delay", "fade_duration"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("types") {
        validate_string_array(value, layer, &join_path(path, "types"))?;
    }
    Ok(())
}

/// Validate the "create_instance_flavor_sort" block.
fn validate_flavor_sort(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["key", "reverse"], layer, path)?;
    if let Some(value) = map.get("key") {
        expect_string(value, layer, &join_path(path, "key"))?;
    }
    if let Some(value) = map.get("reverse") {
        expect_bool(value, layer, &join_path(path, "reverse"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON string or null.
fn expect_optional_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_null() || value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string or null"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a non-negative JSON integer or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = match value {
        Value::Array(arr) => arr,
        _ => return Err(invalid_field(layer, path, "expected array")),
    };
    for (idx, entry) in arr.iter().enumerate() {
        if entry.as_str().is_none() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
