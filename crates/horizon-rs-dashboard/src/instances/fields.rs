//! Choice lists for key pair, network and availability zone fields.

use super::{Choice, choice};
use crate::api::{ComputeApi, NetworkApi};
use crate::error::DashboardError;
use crate::exceptions;
use crate::request::Request;

/// Key pair choices as `(name, name)`.
pub async fn keypair_field_data(
    request: &mut Request,
    api: &dyn ComputeApi,
    include_empty_option: bool,
) -> Result<Vec<Choice>, DashboardError> {
    let keypairs = match api.keypair_list().await {
        Ok(keypairs) => keypairs,
        Err(err) => {
            exceptions::handle(request, err, "Unable to retrieve key pairs.")?;
            Vec::new()
        }
    };
    let choices: Vec<Choice> = keypairs
        .iter()
        .map(|keypair| choice(keypair.name.as_str(), keypair.name.as_str()))
        .collect();

    Ok(with_empty_option(
        choices,
        include_empty_option,
        "Select a key pair",
        "No key pairs available",
    ))
}

/// Network choices as `(id, name or id)`, sorted by label.
///
/// Networks without subnets cannot take a port and are left out.
pub async fn network_field_data(
    request: &mut Request,
    api: &dyn NetworkApi,
    include_empty_option: bool,
) -> Result<Vec<Choice>, DashboardError> {
    if !api.is_service_enabled().await {
        return Ok(Vec::new());
    }
    let tenant_id = request.tenant_id.clone();
    let networks = match api.network_list_for_tenant(&tenant_id).await {
        Ok(networks) => networks,
        Err(err) => {
            let message = format!("Failed to get network list {err}");
            exceptions::handle(request, err, &message)?;
            Vec::new()
        }
    };
    let mut choices: Vec<Choice> = networks
        .iter()
        .filter(|network| !network.subnets.is_empty())
        .map(|network| choice(network.id.as_str(), network.name_or_id()))
        .collect();
    choices.sort_by(|left, right| left.1.cmp(&right.1));

    Ok(with_empty_option(
        choices,
        include_empty_option,
        "Select Network",
        "No networks available",
    ))
}

/// Available zones as `(name, name)`, sorted.
///
/// More than one zone gets an "any zone" entry in front; no zones yields a
/// single placeholder.
pub async fn availability_zone_list(
    request: &mut Request,
    api: &dyn ComputeApi,
) -> Result<Vec<Choice>, DashboardError> {
    let zones = match api.availability_zone_list().await {
        Ok(zones) => zones,
        Err(err) => {
            exceptions::handle(request, err, "Unable to retrieve availability zones.")?;
            Vec::new()
        }
    };
    let mut choices: Vec<Choice> = zones
        .iter()
        .filter(|zone| zone.available)
        .map(|zone| choice(zone.name.as_str(), zone.name.as_str()))
        .collect();
    choices.sort();

    match choices.len() {
        0 => Ok(vec![choice("", "No availability zones found")]),
        1 => Ok(choices),
        _ => {
            choices.insert(0, choice("", "Any Availability Zone"));
            Ok(choices)
        }
    }
}

fn with_empty_option(
    mut choices: Vec<Choice>,
    include_empty_option: bool,
    select_label: &str,
    empty_label: &str,
) -> Vec<Choice> {
    if !include_empty_option {
        return choices;
    }
    if choices.is_empty() {
        return vec![choice("", empty_label)];
    }
    choices.insert(0, choice("", select_label));
    choices
}
