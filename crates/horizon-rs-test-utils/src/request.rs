use horizon_rs_config::{
    ConfigOverride, ExceptionsConfig, HorizonConfig, LazySettings, PasswordValidatorConfig,
    default_config,
};
use horizon_rs_dashboard::{Request, User};
use std::collections::BTreeMap;

/// Build a request whose settings are the defaults plus `overrides`.
pub fn request_with(overrides: ConfigOverride, user: User) -> Request {
    let settings = LazySettings::with_overrides(default_config(), overrides);
    Request::with_settings("tenant-1", user, &settings)
}

/// Small, fully populated defaults with recognisable values.
pub fn scenario_defaults() -> HorizonConfig {
    HorizonConfig {
        exceptions: ExceptionsConfig {
            unauthorized: vec!["X".to_string()],
            not_found: vec!["Y".to_string()],
            recoverable: vec!["Z".to_string()],
            extra: BTreeMap::new(),
        },
        password_validator: PasswordValidatorConfig {
            regex: "R".to_string(),
            help_text: "H".to_string(),
            extra: Default::default(),
        },
        panel_permissions: BTreeMap::from([("overview".to_string(), "abc".to_string())]),
        settings: Default::default(),
    }
}
