//! Panel registration and permission checks.

use crate::request::User;
use horizon_rs_config::{NO_ACCESS_PERMISSION, ResolvedConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::BTreeMap;

const NETWORK_TOPOLOGY_PANEL: &str = "network_topology";
const PROJECT_DASHBOARD: &str = "project";
const NEUTRON_DISABLED_KEY: &str = "neutron_disabled";

/// Plugin-style registration that adds or removes a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRegistration {
    pub panel: String,
    pub dashboard: String,
    pub group: String,
    pub remove: bool,
}

/// Remove the network topology panel when the network service is disabled.
pub fn network_topology_panel(config: &ResolvedConfig) -> Option<PanelRegistration> {
    let disabled = config.get(NEUTRON_DISABLED_KEY, Value::Bool(false));
    if disabled.as_bool() != Some(true) {
        return None;
    }
    Some(PanelRegistration {
        panel: NETWORK_TOPOLOGY_PANEL.to_string(),
        dashboard: PROJECT_DASHBOARD.to_string(),
        group: PROJECT_DASHBOARD.to_string(),
        remove: true,
    })
}

/// Where a registered panel lives.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PanelPlacement {
    dashboard: String,
    group: String,
}

/// Registered panels keyed by name.
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    panels: BTreeMap<String, PanelPlacement>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a panel.
    pub fn apply(&mut self, registration: PanelRegistration) {
        if registration.remove {
            let removed = self.panels.remove(&registration.panel).is_some();
            info!(
                "panel removed (panel={}, dashboard={}, was_registered={})",
                registration.panel, registration.dashboard, removed
            );
            return;
        }
        debug!(
            "panel registered (panel={}, dashboard={}, group={})",
            registration.panel, registration.dashboard, registration.group
        );
        self.panels.insert(
            registration.panel,
            PanelPlacement {
                dashboard: registration.dashboard,
                group: registration.group,
            },
        );
    }

    pub fn contains(&self, panel: &str) -> bool {
        self.panels.contains_key(panel)
    }

    /// Panel names registered on a dashboard, sorted.
    pub fn panels(&self, dashboard: &str) -> Vec<&str> {
        self.panels
            .iter()
            .filter(|(_, placement)| placement.dashboard == dashboard)
            .map(|(panel, _)| panel.as_str())
            .collect()
    }

    /// Group a panel is listed under, if registered.
    pub fn group(&self, panel: &str) -> Option<&str> {
        self.panels
            .get(panel)
            .map(|placement| placement.group.as_str())
    }

    /// Whether the user may open a registered panel.
    ///
    /// Every permission character must be among the user's capabilities.
    /// `!` is never granted, so panels without a permission entry deny.
    pub fn can_access(&self, panel: &str, user: &User, config: &ResolvedConfig) -> bool {
        if !self.contains(panel) {
            return false;
        }
        config
            .panel_permissions(panel)
            .iter()
            .all(|perm| *perm != NO_ACCESS_PERMISSION && user.capabilities.contains(perm))
    }

    /// Panels on a dashboard the user may open.
    pub fn visible_panels(&self, dashboard: &str, user: &User, config: &ResolvedConfig) -> Vec<&str> {
        self.panels(dashboard)
            .into_iter()
            .filter(|panel| self.can_access(panel, user, config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_rs_config::{ConfigOverride, LazySettings, default_config};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registration(panel: &str, remove: bool) -> PanelRegistration {
        PanelRegistration {
            panel: panel.to_string(),
            dashboard: "project".to_string(),
            group: "compute".to_string(),
            remove,
        }
    }

    fn registry() -> PanelRegistry {
        let mut registry = PanelRegistry::new();
        for panel in ["overview", "instances", "network_topology", "reports"] {
            registry.apply(registration(panel, false));
        }
        registry
    }

    #[test]
    fn topology_panel_removed_only_when_neutron_disabled() {
        let settings = LazySettings::new(default_config());
        assert_eq!(network_topology_panel(&settings.resolved()), None);

        let overrides = ConfigOverride::builder()
            .setting("neutron_disabled", json!(true))
            .build();
        let settings = LazySettings::with_overrides(default_config(), overrides);
        let removal = network_topology_panel(&settings.resolved()).expect("removal");
        assert!(removal.remove);

        let mut registry = registry();
        registry.apply(removal);
        assert!(!registry.contains("network_topology"));
        assert_eq!(registry.panels("project"), vec!["instances", "overview", "reports"]);
    }

    #[test]
    fn access_requires_every_permission_character() {
        let settings = LazySettings::new(default_config());
        let config = settings.resolved();
        let registry = registry();

        let member = User::new("member", "m");
        assert!(registry.can_access("overview", &member, &config));
        assert!(!registry.can_access("instances", &member, &config));

        let operator = User::new("operator", "mcn");
        assert_eq!(
            registry.visible_panels("project", &operator, &config),
            vec!["instances", "network_topology", "overview"]
        );
    }

    #[test]
    fn unknown_or_unregistered_panels_deny() {
        let settings = LazySettings::new(default_config());
        let config = settings.resolved();
        let registry = registry();
        let everyone = User::new("root", "!abcdefghijklmnopqrstuvwxyz");

        assert!(!registry.can_access("reports", &everyone, &config));
        assert!(!registry.can_access("flavors", &everyone, &config));
        assert_eq!(registry.group("overview"), Some("compute"));
    }
}
