//! Configuration schema for the dashboard.
//!
//! Three groups get typed treatment because their sub-keys are repaired
//! individually during resolution: `exceptions`, `password_validator` and
//! `panel_permissions`. Every other top-level key lives in the open
//! `settings` map and is replaced wholesale by an override.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top-level key of the exception category group.
pub const EXCEPTIONS_KEY: &str = "exceptions";
/// Top-level key of the password validator group.
pub const PASSWORD_VALIDATOR_KEY: &str = "password_validator";
/// Top-level key of the panel permission table.
pub const PANEL_PERMISSIONS_KEY: &str = "panel_permissions";

/// Exception categories that must always be present after resolution.
pub const EXCEPTION_CATEGORIES: [&str; 3] = ["unauthorized", "not_found", "recoverable"];

/// Dashboard configuration, used both for the defaults and the resolved result.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HorizonConfig {
    #[serde(default)]
    pub exceptions: ExceptionsConfig,
    #[serde(default)]
    pub password_validator: PasswordValidatorConfig,
    #[serde(default)]
    pub panel_permissions: BTreeMap<String, String>,
    /// Remaining top-level keys.
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// Backend error identifiers grouped by how the dashboard reacts to them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ExceptionsConfig {
    #[serde(default)]
    pub unauthorized: Vec<String>,
    #[serde(default)]
    pub not_found: Vec<String>,
    #[serde(default)]
    pub recoverable: Vec<String>,
    /// Additional categories carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Vec<String>>,
}

impl ExceptionsConfig {
    /// Look up the identifiers registered under a category name.
    pub fn category(&self, name: &str) -> Option<&[String]> {
        match name {
            "unauthorized" => Some(&self.unauthorized),
            "not_found" => Some(&self.not_found),
            "recoverable" => Some(&self.recoverable),
            other => self.extra.get(other).map(Vec::as_slice),
        }
    }
}

/// Password policy applied by password form fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PasswordValidatorConfig {
    #[serde(default = "default_password_regex")]
    pub regex: String,
    #[serde(default = "default_password_help_text")]
    pub help_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PasswordValidatorConfig {
    fn default() -> Self {
        Self {
            regex: default_password_regex(),
            help_text: default_password_help_text(),
            extra: Map::new(),
        }
    }
}

/// Default password pattern (accept anything).
pub(crate) fn default_password_regex() -> String {
    ".*".to_string()
}

/// Default error text shown when a password is rejected.
pub(crate) fn default_password_help_text() -> String {
    "Password is not accepted".to_string()
}

/// Deployment overrides layered on top of the defaults.
///
/// A group set here replaces the default group as a whole; required sub-keys
/// it leaves out are filled back in from the defaults during resolution.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<ExceptionsOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_validator: Option<PasswordValidatorOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_permissions: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl ConfigOverride {
    /// Start building an override programmatically.
    pub fn builder() -> ConfigOverrideBuilder {
        ConfigOverrideBuilder::default()
    }

    /// True when the override changes nothing.
    pub fn is_empty(&self) -> bool {
        self.exceptions.is_none()
            && self.password_validator.is_none()
            && self.panel_permissions.is_none()
            && self.settings.is_empty()
    }

    /// Number of top-level keys the override sets.
    pub fn key_count(&self) -> usize {
        usize::from(self.exceptions.is_some())
            + usize::from(self.password_validator.is_some())
            + usize::from(self.panel_permissions.is_some())
            + self.settings.len()
    }
}

/// Partial exception category group.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ExceptionsOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unauthorized: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_found: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recoverable: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Vec<String>>,
}

/// Partial password validator group.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PasswordValidatorOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Builder for assembling a `ConfigOverride` in code.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrideBuilder {
    config: ConfigOverride,
}

impl ConfigOverrideBuilder {
    /// Replace the exception category group.
    pub fn exceptions(mut self, exceptions: ExceptionsOverride) -> Self {
        self.config.exceptions = Some(exceptions);
        self
    }

    /// Replace the password validator group.
    pub fn password_validator(mut self, validator: PasswordValidatorOverride) -> Self {
        self.config.password_validator = Some(validator);
        self
    }

    /// Replace the panel permission table.
    pub fn panel_permissions<I, K, V>(mut self, panels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config.panel_permissions = Some(
            panels
                .into_iter()
                .map(|(panel, perms)| (panel.into(), perms.into()))
                .collect(),
        );
        self
    }

    /// Set a top-level key.
    ///
    /// The three repaired groups are decoded into their typed slots so they
    /// go through sub-key repair like any other group override. A group value
    /// that does not decode is dropped with a warning.
    pub fn setting(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        match key.as_str() {
            EXCEPTIONS_KEY => {
                if let Some(group) = decode_group(&key, &value) {
                    self.config.exceptions = Some(group);
                }
            }
            PASSWORD_VALIDATOR_KEY => {
                if let Some(group) = decode_group(&key, &value) {
                    self.config.password_validator = Some(group);
                }
            }
            PANEL_PERMISSIONS_KEY => {
                if let Some(group) = decode_group(&key, &value) {
                    self.config.panel_permissions = Some(group);
                }
            }
            _ => {
                self.config.settings.insert(key, value);
            }
        }
        self
    }

    /// Finalize and return the built `ConfigOverride`.
    pub fn build(self) -> ConfigOverride {
        self.config
    }
}

/// Whether a top-level key names one of the repaired groups.
pub(crate) fn is_group_key(key: &str) -> bool {
    matches!(
        key,
        EXCEPTIONS_KEY | PASSWORD_VALIDATOR_KEY | PANEL_PERMISSIONS_KEY
    )
}

/// Decode a group override from a raw value, `None` when it is malformed.
pub(crate) fn decode_group<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(group) => Some(group),
        Err(err) => {
            warn!("ignoring malformed group override (key={key}): {err}");
            None
        }
    }
}
