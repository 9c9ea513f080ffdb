//! Instance launch helpers: backend lists turned into form choices.

mod fields;
mod flavors;

pub use fields::{availability_zone_list, keypair_field_data, network_field_data};
pub use flavors::{
    EXTRA_SPECS_CACHE_TTL, ExtraSpecsCache, FLAVOR_GROUP_SPEC, FlavorChoice, FlavorSort,
    FlavorSortKey, InstanceSettings, flavor_choices, flavor_extra_specs, flavor_list,
    group_flavors, sort_flavor_list,
};

/// `(value, label)` pair rendered as a select option.
pub type Choice = (String, String);

/// Build a choice from anything string-like.
pub(crate) fn choice(value: impl Into<String>, label: impl Into<String>) -> Choice {
    (value.into(), label.into())
}
