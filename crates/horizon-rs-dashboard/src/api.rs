//! Backend resource models and service interfaces.
//!
//! The dashboard never talks to the cloud services directly; the embedding
//! application supplies implementations of these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure reported by a backend service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// Identifier matched against the configured exception categories,
    /// e.g. `nova.NotFound`.
    pub kind: String,
    /// Backend-provided description.
    pub message: String,
}

impl ApiError {
    /// Build an error from a kind identifier and message.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Compute flavor (instance size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    /// Memory in MB.
    pub ram: u64,
    pub vcpus: u32,
    /// Root disk in GB.
    pub disk: u64,
    #[serde(default)]
    pub ephemeral: u64,
    #[serde(default)]
    pub swap: u64,
}

/// SSH key pair registered with the compute service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypair {
    pub name: String,
    #[serde(default)]
    pub fingerprint: String,
}

/// Availability zone as reported by the compute service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityZone {
    pub name: String,
    pub available: bool,
}

/// Tenant network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub subnets: Vec<String>,
}

impl Network {
    /// Display name, falling back to the id for unnamed networks.
    pub fn name_or_id(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Limit and usage of a single quota; a negative limit means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaUsage {
    pub limit: i64,
    pub in_use: i64,
}

/// Per-volume-type quota usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeTypeQuota {
    pub gigabytes: QuotaUsage,
    #[serde(default)]
    pub volumes: QuotaUsage,
    #[serde(default)]
    pub snapshots: QuotaUsage,
}

/// Compute service operations used by the instance launch helpers.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// List flavors visible to the tenant.
    async fn flavor_list(&self) -> Result<Vec<Flavor>, ApiError>;

    /// Raw extra specs for a flavor.
    async fn flavor_get_extras(&self, flavor_id: &str)
    -> Result<BTreeMap<String, String>, ApiError>;

    /// List the user's key pairs.
    async fn keypair_list(&self) -> Result<Vec<Keypair>, ApiError>;

    /// List availability zones.
    async fn availability_zone_list(&self) -> Result<Vec<AvailabilityZone>, ApiError>;
}

/// Network service operations.
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Whether the network service is deployed.
    async fn is_service_enabled(&self) -> bool;

    /// Networks owned by or shared with a tenant.
    async fn network_list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Network>, ApiError>;
}

/// Block storage service operations.
#[async_trait]
pub trait VolumeApi: Send + Sync {
    /// Whether the volume service is deployed.
    async fn is_service_enabled(&self) -> bool;

    /// Quota usage keyed by volume type name.
    async fn tenant_volume_type_quota_get(
        &self,
        tenant_id: &str,
    ) -> Result<BTreeMap<String, VolumeTypeQuota>, ApiError>;
}
