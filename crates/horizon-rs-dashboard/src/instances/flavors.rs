//! Flavor listing, extra spec caching, sorting and grouping.

use super::{Choice, choice};
use crate::api::{ComputeApi, Flavor};
use crate::error::DashboardError;
use crate::exceptions;
use crate::request::Request;
use horizon_rs_config::ResolvedConfig;
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Extra spec naming the group a flavor is listed under.
pub const FLAVOR_GROUP_SPEC: &str = "flavor_class:name";
/// How long fetched extra specs stay cached.
pub const EXTRA_SPECS_CACHE_TTL: Duration = Duration::from_secs(3600);

const FLAVOR_SORT_KEY: &str = "create_instance_flavor_sort";
const FLAVOR_GROUP_ORDER_KEY: &str = "create_instance_flavor_group_order";

/// Flavor attribute used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlavorSortKey {
    Id,
    Name,
    #[default]
    Ram,
    Vcpus,
    Disk,
    Ephemeral,
    Swap,
}

impl FromStr for FlavorSortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "ram" => Ok(Self::Ram),
            "vcpus" => Ok(Self::Vcpus),
            "disk" => Ok(Self::Disk),
            "ephemeral" => Ok(Self::Ephemeral),
            "swap" => Ok(Self::Swap),
            other => Err(format!("unknown flavor sort key: {other}")),
        }
    }
}

impl FlavorSortKey {
    fn compare(self, left: &Flavor, right: &Flavor) -> Ordering {
        match self {
            Self::Id => left.id.cmp(&right.id),
            Self::Name => left.name.cmp(&right.name),
            Self::Ram => left.ram.cmp(&right.ram),
            Self::Vcpus => left.vcpus.cmp(&right.vcpus),
            Self::Disk => left.disk.cmp(&right.disk),
            Self::Ephemeral => left.ephemeral.cmp(&right.ephemeral),
            Self::Swap => left.swap.cmp(&right.swap),
        }
    }
}

/// Configured flavor ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorSort {
    #[serde(default = "default_sort_key")]
    pub key: String,
    #[serde(default)]
    pub reverse: bool,
}

impl Default for FlavorSort {
    fn default() -> Self {
        Self {
            key: default_sort_key(),
            reverse: false,
        }
    }
}

fn default_sort_key() -> String {
    "ram".to_string()
}

impl FlavorSort {
    /// Parsed sort key; unknown keys fall back to `ram` with a warning.
    pub fn sort_key(&self) -> FlavorSortKey {
        match self.key.parse() {
            Ok(key) => key,
            Err(_) => {
                warn!(
                    "could not find flavor sort key (key={}); using ram instead",
                    self.key
                );
                FlavorSortKey::Ram
            }
        }
    }
}

/// Instance launch settings read from the resolved config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceSettings {
    pub flavor_sort: FlavorSort,
    /// Group names listed first, in this order.
    pub flavor_group_order: Vec<String>,
}

impl InstanceSettings {
    /// Read the flavor settings, using defaults for missing or malformed values.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            flavor_sort: decode_or_default(config, FLAVOR_SORT_KEY),
            flavor_group_order: decode_or_default(config, FLAVOR_GROUP_ORDER_KEY),
        }
    }
}

fn decode_or_default<T>(config: &ResolvedConfig, key: &str) -> T
where
    T: Default + serde::de::DeserializeOwned,
{
    match config.get(key, Value::Null) {
        Value::Null => T::default(),
        value => serde_json::from_value(value).unwrap_or_else(|err| {
            warn!("ignoring malformed setting (key={key}): {err}");
            T::default()
        }),
    }
}

/// One entry of a grouped flavor select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlavorChoice {
    /// Ungrouped flavor at the top level.
    Flavor(Choice),
    /// Named group of flavors.
    Group { name: String, flavors: Vec<Choice> },
}

/// Time-bounded cache of flavor extra specs.
#[derive(Debug)]
pub struct ExtraSpecsCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, BTreeMap<String, String>)>>,
}

impl Default for ExtraSpecsCache {
    fn default() -> Self {
        Self::new(EXTRA_SPECS_CACHE_TTL)
    }
}

impl ExtraSpecsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache key for a flavor.
    pub fn key(flavor_id: &str) -> String {
        format!("horizon__nova__extra_specs__{flavor_id}")
    }

    pub fn get(&self, flavor_id: &str) -> Option<BTreeMap<String, String>> {
        let key = Self::key(flavor_id);
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some((stored, specs)) if stored.elapsed() < self.ttl => Some(specs.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, flavor_id: &str, specs: BTreeMap<String, String>) {
        self.entries
            .lock()
            .insert(Self::key(flavor_id), (Instant::now(), specs));
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// List flavors, or an empty list after a handled backend error.
pub async fn flavor_list(
    request: &mut Request,
    api: &dyn ComputeApi,
) -> Result<Vec<Flavor>, DashboardError> {
    match api.flavor_list().await {
        Ok(flavors) => Ok(flavors),
        Err(err) => {
            exceptions::handle(request, err, "Unable to retrieve instance flavors.")?;
            Ok(Vec::new())
        }
    }
}

/// Extra specs for a flavor, served from `cache` when fresh.
pub async fn flavor_extra_specs(
    request: &mut Request,
    api: &dyn ComputeApi,
    cache: &ExtraSpecsCache,
    flavor_id: &str,
) -> Result<BTreeMap<String, String>, DashboardError> {
    if let Some(specs) = cache.get(flavor_id) {
        debug!("extra specs cache hit (flavor={flavor_id})");
        return Ok(specs);
    }
    match api.flavor_get_extras(flavor_id).await {
        Ok(specs) => {
            cache.set(flavor_id, specs.clone());
            Ok(specs)
        }
        Err(err) => {
            exceptions::handle(request, err, "Unable to retrieve instance flavor specs.")?;
            Ok(BTreeMap::new())
        }
    }
}

/// Sort flavors by the configured key into `(id, name)` choices.
///
/// Flavors comparing equal keep their input order, also when reversed.
pub fn sort_flavor_list(flavors: &[Flavor], sort: &FlavorSort) -> Vec<Choice> {
    let key = sort.sort_key();
    let mut sorted: Vec<&Flavor> = flavors.iter().collect();
    sorted.sort_by(|left, right| {
        if sort.reverse {
            key.compare(right, left)
        } else {
            key.compare(left, right)
        }
    });
    sorted
        .into_iter()
        .map(|flavor| choice(flavor.id.as_str(), flavor.name.as_str()))
        .collect()
}

/// Group flavors by their `flavor_class:name` extra spec.
///
/// Groups named in `flavor_group_order` come first in that order. Ungrouped
/// flavors follow at the top level, then the remaining groups by name.
pub fn group_flavors(
    flavors: &[Flavor],
    extra_specs: &HashMap<String, BTreeMap<String, String>>,
    settings: &InstanceSettings,
) -> Vec<FlavorChoice> {
    let mut ungrouped = Vec::new();
    let mut groups: BTreeMap<&str, Vec<Flavor>> = BTreeMap::new();
    for flavor in flavors {
        let group = extra_specs
            .get(&flavor.id)
            .and_then(|specs| specs.get(FLAVOR_GROUP_SPEC));
        match group {
            Some(name) => groups.entry(name.as_str()).or_default().push(flavor.clone()),
            None => ungrouped.push(flavor.clone()),
        }
    }

    let mut choices = Vec::new();
    for name in &settings.flavor_group_order {
        if let Some(members) = groups.remove(name.as_str()) {
            choices.push(FlavorChoice::Group {
                name: name.clone(),
                flavors: sort_flavor_list(&members, &settings.flavor_sort),
            });
        }
    }
    choices.extend(
        sort_flavor_list(&ungrouped, &settings.flavor_sort)
            .into_iter()
            .map(FlavorChoice::Flavor),
    );
    for (name, members) in groups {
        choices.push(FlavorChoice::Group {
            name: name.to_string(),
            flavors: sort_flavor_list(&members, &settings.flavor_sort),
        });
    }
    choices
}

/// Flavor select choices for the launch form.
pub async fn flavor_choices(
    request: &mut Request,
    api: &dyn ComputeApi,
    cache: &ExtraSpecsCache,
) -> Result<Vec<FlavorChoice>, DashboardError> {
    let flavors = flavor_list(request, api).await?;
    let mut extra_specs = HashMap::with_capacity(flavors.len());
    for flavor in &flavors {
        let specs = flavor_extra_specs(request, api, cache, &flavor.id).await?;
        extra_specs.insert(flavor.id.clone(), specs);
    }
    let settings = InstanceSettings::from_config(request.config());
    Ok(group_flavors(&flavors, &extra_specs, &settings))
}
