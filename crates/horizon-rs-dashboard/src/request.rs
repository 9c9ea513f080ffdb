//! Per-request context handed to dashboard helpers.

use horizon_rs_config::{HORIZON_CONFIG, LazySettings, ResolvedConfig};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Capability characters granted to the user, matched against panel
    /// permission strings.
    pub capabilities: BTreeSet<char>,
}

impl User {
    /// Create a user with the given capability characters.
    pub fn new(id: impl Into<String>, capabilities: &str) -> Self {
        Self {
            id: id.into(),
            capabilities: capabilities.chars().collect(),
        }
    }
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message queued for display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// Messages queued during a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    items: Vec<Message>,
}

impl Messages {
    pub fn add(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.items.push(Message {
            level,
            text: text.into(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.add(MessageLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.add(MessageLevel::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.add(MessageLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.add(MessageLevel::Error, text);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.items.iter()
    }

    /// Texts of all messages at a level, in insertion order.
    pub fn texts(&self, level: MessageLevel) -> Vec<&str> {
        self.items
            .iter()
            .filter(|message| message.level == level)
            .map(|message| message.text.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Request context: tenant, user, settings snapshot and queued messages.
#[derive(Debug, Clone)]
pub struct Request {
    pub tenant_id: String,
    pub user: User,
    config: Arc<ResolvedConfig>,
    pub messages: Messages,
}

impl Request {
    /// Create a request against the process-wide settings.
    pub fn new(tenant_id: impl Into<String>, user: User) -> Self {
        Self::with_settings(tenant_id, user, &HORIZON_CONFIG)
    }

    /// Create a request against a specific settings holder.
    pub fn with_settings(tenant_id: impl Into<String>, user: User, settings: &LazySettings) -> Self {
        Self::with_config(tenant_id, user, settings.resolved())
    }

    /// Create a request against an already resolved config.
    pub fn with_config(
        tenant_id: impl Into<String>,
        user: User,
        config: Arc<ResolvedConfig>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user,
            config,
            messages: Messages::default(),
        }
    }

    /// Settings snapshot taken when the request was created.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_filter_by_level() {
        let mut messages = Messages::default();
        messages.warning("careful");
        messages.error("broken");
        messages.error("still broken");
        assert_eq!(messages.len(), 3);
        assert_eq!(messages.texts(MessageLevel::Error), vec!["broken", "still broken"]);
        assert_eq!(messages.texts(MessageLevel::Info), Vec::<&str>::new());
    }

    #[test]
    fn user_capabilities_from_string() {
        let user = User::new("demo", "mcm");
        assert_eq!(user.capabilities, BTreeSet::from(['c', 'm']));
    }
}
