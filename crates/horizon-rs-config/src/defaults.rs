//! Built-in dashboard defaults.

use crate::model::{ExceptionsConfig, HorizonConfig, PasswordValidatorConfig};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Default landing page for authenticated users.
const DEFAULT_USER_HOME: &str = "/";
/// Maximum concurrent AJAX requests issued by the UI.
const DEFAULT_AJAX_QUEUE_LIMIT: u64 = 10;
/// Poll interval for row updates in milliseconds.
const DEFAULT_AJAX_POLL_INTERVAL: u64 = 2500;

/// Permission strings for the panels shipped with the dashboard.
const DEFAULT_PANEL_PERMISSIONS: &[(&str, &str)] = &[
    ("overview", "m"),
    ("instances", "mc"),
    ("volumes", "mv"),
    ("network_topology", "mn"),
    ("flavors", "a"),
    ("hypervisors", "a"),
];

/// Build the default configuration.
///
/// Every recognised top-level key has a value here; override resolution
/// treats this as the complete baseline.
pub fn default_config() -> HorizonConfig {
    HorizonConfig {
        exceptions: ExceptionsConfig::default(),
        password_validator: PasswordValidatorConfig::default(),
        panel_permissions: DEFAULT_PANEL_PERMISSIONS
            .iter()
            .map(|(panel, perms)| (panel.to_string(), perms.to_string()))
            .collect::<BTreeMap<_, _>>(),
        settings: default_settings(),
    }
}

fn default_settings() -> Map<String, Value> {
    let value = json!({
        "dashboards": [],
        "default_dashboard": null,
        "user_home": DEFAULT_USER_HOME,
        "ajax_queue_limit": DEFAULT_AJAX_QUEUE_LIMIT,
        "ajax_poll_interval": DEFAULT_AJAX_POLL_INTERVAL,
        "auto_fade_alerts": {
            "delay": 3000,
            "fade_duration": 1500,
            "types": []
        },
        "help_url": null,
        "modal_backdrop": "static",
        "password_autocomplete": "off",
        "angular_modules": [],
        "js_files": [],
        "js_spec_files": [],
        "external_templates": [],
        "neutron_disabled": false,
        "create_instance_flavor_sort": {
            "key": "ram",
            "reverse": false
        },
        "create_instance_flavor_group_order": []
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
