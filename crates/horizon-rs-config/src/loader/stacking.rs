//! Stacking override files on top of each other.
//!
//! Between files, groups and nested objects combine key by key with the upper
//! file winning. This is separate from the shallow default/override merge in
//! `crate::merge`.

use crate::model::{ExceptionsOverride, PasswordValidatorOverride};
use crate::ConfigOverride;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

impl ConfigOverride {
    /// Lay `upper` over this override.
    pub(super) fn stack(&mut self, upper: ConfigOverride) {
        self.exceptions = match (self.exceptions.take(), upper.exceptions) {
            (Some(lower), Some(upper)) => Some(stack_exceptions(lower, upper)),
            (lower, upper) => upper.or(lower),
        };
        self.password_validator = match (self.password_validator.take(), upper.password_validator)
        {
            (Some(lower), Some(upper)) => Some(stack_password_validator(lower, upper)),
            (lower, upper) => upper.or(lower),
        };
        self.panel_permissions = match (self.panel_permissions.take(), upper.panel_permissions) {
            (Some(mut lower), Some(upper)) => {
                lower.extend(upper);
                Some(lower)
            }
            (lower, upper) => upper.or(lower),
        };
        stack_map(&mut self.settings, upper.settings);
    }
}

fn stack_exceptions(lower: ExceptionsOverride, upper: ExceptionsOverride) -> ExceptionsOverride {
    let mut extra: BTreeMap<String, Vec<String>> = lower.extra;
    extra.extend(upper.extra);
    ExceptionsOverride {
        unauthorized: upper.unauthorized.or(lower.unauthorized),
        not_found: upper.not_found.or(lower.not_found),
        recoverable: upper.recoverable.or(lower.recoverable),
        extra,
    }
}

fn stack_password_validator(
    lower: PasswordValidatorOverride,
    upper: PasswordValidatorOverride,
) -> PasswordValidatorOverride {
    let mut extra = lower.extra;
    stack_map(&mut extra, upper.extra);
    PasswordValidatorOverride {
        regex: upper.regex.or(lower.regex),
        help_text: upper.help_text.or(lower.help_text),
        extra,
    }
}

fn stack_map(lower: &mut Map<String, Value>, upper: Map<String, Value>) {
    for (key, value) in upper {
        match lower.get_mut(&key) {
            Some(existing) => stack_value(existing, value),
            None => {
                lower.insert(key, value);
            }
        }
    }
}

/// Objects combine recursively; anything else is replaced.
fn stack_value(lower: &mut Value, upper: Value) {
    match (lower, upper) {
        (Value::Object(lower), Value::Object(upper)) => stack_map(lower, upper),
        (slot, upper) => *slot = upper,
    }
}
