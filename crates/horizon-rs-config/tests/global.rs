//! Tests for the process-wide settings instance.

use horizon_rs_config::{ConfigOverride, ExceptionsOverride, HORIZON_CONFIG};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

/// The global resolves once, ignores later overrides, and re-resolves after reset.
///
/// Kept as the only test in this binary that touches the global.
#[test]
fn global_settings_lifecycle() {
    HORIZON_CONFIG.reset();
    HORIZON_CONFIG.configure(
        ConfigOverride::builder()
            .exceptions(ExceptionsOverride {
                recoverable: Some(vec!["cinder.OverLimit".to_string()]),
                ..ExceptionsOverride::default()
            })
            .setting("ajax_poll_interval", json!(5000))
            .build(),
    );

    assert_eq!(HORIZON_CONFIG.get("ajax_poll_interval", Value::Null), json!(5000));
    assert_eq!(HORIZON_CONFIG.get("ajax_queue_limit", Value::Null), json!(10));
    assert_eq!(
        HORIZON_CONFIG.get("exceptions", Value::Null),
        json!({ "unauthorized": [], "not_found": [], "recoverable": ["cinder.OverLimit"] })
    );
    assert_eq!(HORIZON_CONFIG.panel_permissions("nonexistent-panel"), vec!['!']);

    HORIZON_CONFIG.configure(ConfigOverride::default());
    assert_eq!(HORIZON_CONFIG.get("ajax_poll_interval", Value::Null), json!(5000));

    HORIZON_CONFIG.reset();
    assert_eq!(HORIZON_CONFIG.get("ajax_poll_interval", Value::Null), json!(2500));
}
