//! Tests for backend error handling against resolved exception categories.

use horizon_rs_config::{ConfigOverride, ExceptionsOverride, LazySettings};
use horizon_rs_dashboard::exceptions::{self, ErrorCategory};
use horizon_rs_dashboard::{ApiError, DashboardError, MessageLevel, Request, User};
use horizon_rs_test_utils::scenario_defaults;
use pretty_assertions::assert_eq;

fn request(overrides: ConfigOverride) -> Request {
    let settings = LazySettings::with_overrides(scenario_defaults(), overrides);
    Request::with_settings("tenant-1", User::new("demo", "m"), &settings)
}

/// Categories left out of a partial override keep their default identifiers.
#[test]
fn repaired_categories_still_classify() {
    let overrides = ConfigOverride::builder()
        .exceptions(ExceptionsOverride {
            unauthorized: Some(vec!["X2".to_string()]),
            ..ExceptionsOverride::default()
        })
        .build();
    let mut request = request(overrides);

    let category = exceptions::handle(&mut request, ApiError::new("Y", "gone"), "Missing.")
        .expect("handled");
    assert_eq!(category, ErrorCategory::NotFound);

    let category = exceptions::handle(&mut request, ApiError::new("Z", "busy"), "Try again.")
        .expect("handled");
    assert_eq!(category, ErrorCategory::Recoverable);
    assert_eq!(
        request.messages.texts(MessageLevel::Error),
        vec!["Missing.", "Try again."]
    );
}

/// The override's identifier replaces the default one for its category.
#[test]
fn overridden_category_replaces_default_identifiers() {
    let overrides = ConfigOverride::builder()
        .exceptions(ExceptionsOverride {
            unauthorized: Some(vec!["X2".to_string()]),
            ..ExceptionsOverride::default()
        })
        .build();
    let mut request = request(overrides);

    let err = exceptions::handle(&mut request, ApiError::new("X2", "expired"), "Log in again.")
        .unwrap_err();
    assert!(matches!(err, DashboardError::NotAuthorized(message) if message == "expired"));
    assert_eq!(
        request.messages.texts(MessageLevel::Error),
        vec!["Unauthorized: Log in again."]
    );

    let err = exceptions::handle(&mut request, ApiError::new("X", "old"), "ignored").unwrap_err();
    assert!(matches!(err, DashboardError::Api(api) if api.kind == "X"));
    assert_eq!(request.messages.len(), 1);
}
