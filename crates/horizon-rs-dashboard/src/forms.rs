//! Form helpers: inline warnings, API errors and field validation.

use crate::error::DashboardError;
use horizon_rs_config::{PasswordValidatorConfig, ResolvedConfig};
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;

/// Warnings and errors attached to a self-handling form.
///
/// Warnings never block submission; errors do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormMessages {
    warnings: Vec<String>,
    non_field_errors: Vec<String>,
    field_errors: BTreeMap<String, Vec<String>>,
}

impl FormMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a warning rendered above the form fields.
    pub fn set_warning(&mut self, text: impl Into<String>) {
        self.warnings.push(text.into());
    }

    /// Attach an error raised by the backend while handling the form.
    pub fn api_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!("form api error recorded: {text}");
        self.non_field_errors.push(text);
    }

    /// Attach an error to a single field.
    pub fn add_field_error(&mut self, field: impl Into<String>, text: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(text.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn non_field_errors(&self) -> &[String] {
        &self.non_field_errors
    }

    pub fn field_errors(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when no errors of any kind are attached.
    pub fn is_valid(&self) -> bool {
        self.non_field_errors.is_empty() && self.field_errors.values().all(Vec::is_empty)
    }

    /// Clean a field value, recording any error under `field`.
    pub fn clean_field(&mut self, field: &str, constraints: &CharField, value: &str) -> Option<String> {
        match constraints.clean(value) {
            Ok(cleaned) => Some(cleaned),
            Err(message) => {
                self.add_field_error(field, message);
                None
            }
        }
    }
}

/// Text input with length and presence constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharField {
    pub max_length: Option<usize>,
    pub required: bool,
}

impl Default for CharField {
    fn default() -> Self {
        Self {
            max_length: None,
            required: true,
        }
    }
}

impl CharField {
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::default()
        }
    }

    /// Trim and validate a submitted value.
    pub fn clean(&self, value: &str) -> Result<String, String> {
        let value = value.trim();
        if value.is_empty() {
            if self.required {
                return Err("This field is required.".to_string());
            }
            return Ok(String::new());
        }
        if let Some(max_length) = self.max_length {
            let length = value.chars().count();
            if length > max_length {
                return Err(format!(
                    "Ensure this value has at most {max_length} characters (it has {length})."
                ));
            }
        }
        Ok(value.to_string())
    }
}

/// Password policy compiled from the resolved settings.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    regex: Regex,
    help_text: String,
}

impl PasswordValidator {
    pub fn new(config: &PasswordValidatorConfig) -> Result<Self, DashboardError> {
        let regex =
            Regex::new(&config.regex).map_err(|err| DashboardError::Regex(err.to_string()))?;
        Ok(Self {
            regex,
            help_text: config.help_text.clone(),
        })
    }

    /// Build the validator from `password_validator` in the resolved config.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, DashboardError> {
        Self::new(&config.config().password_validator)
    }

    /// Accept the password when the pattern matches anywhere in it.
    pub fn validate(&self, password: &str) -> Result<(), String> {
        if self.regex.is_match(password) {
            Ok(())
        } else {
            Err(self.help_text.clone())
        }
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }
}
