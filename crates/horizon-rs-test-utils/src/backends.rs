use async_trait::async_trait;
use horizon_rs_dashboard::ApiError;
use horizon_rs_dashboard::api::{
    AvailabilityZone, ComputeApi, Flavor, Keypair, Network, NetworkApi, VolumeApi,
    VolumeTypeQuota,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

/// In-memory compute service; set `error` to make every call fail.
#[derive(Default)]
pub struct StubCompute {
    pub flavors: Vec<Flavor>,
    pub extra_specs: HashMap<String, BTreeMap<String, String>>,
    pub keypairs: Vec<Keypair>,
    pub zones: Vec<AvailabilityZone>,
    pub error: Option<ApiError>,
    extra_spec_calls: Mutex<Vec<String>>,
}

impl StubCompute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Flavor ids passed to `flavor_get_extras`, in call order.
    pub fn extra_spec_calls(&self) -> Vec<String> {
        self.extra_spec_calls.lock().clone()
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ComputeApi for StubCompute {
    async fn flavor_list(&self) -> Result<Vec<Flavor>, ApiError> {
        self.check()?;
        Ok(self.flavors.clone())
    }

    async fn flavor_get_extras(
        &self,
        flavor_id: &str,
    ) -> Result<BTreeMap<String, String>, ApiError> {
        self.extra_spec_calls.lock().push(flavor_id.to_string());
        self.check()?;
        Ok(self.extra_specs.get(flavor_id).cloned().unwrap_or_default())
    }

    async fn keypair_list(&self) -> Result<Vec<Keypair>, ApiError> {
        self.check()?;
        Ok(self.keypairs.clone())
    }

    async fn availability_zone_list(&self) -> Result<Vec<AvailabilityZone>, ApiError> {
        self.check()?;
        Ok(self.zones.clone())
    }
}

/// In-memory network service.
pub struct StubNetwork {
    pub enabled: bool,
    pub networks: Vec<Network>,
    pub error: Option<ApiError>,
}

impl Default for StubNetwork {
    fn default() -> Self {
        Self {
            enabled: true,
            networks: Vec::new(),
            error: None,
        }
    }
}

#[async_trait]
impl NetworkApi for StubNetwork {
    async fn is_service_enabled(&self) -> bool {
        self.enabled
    }

    async fn network_list_for_tenant(&self, _tenant_id: &str) -> Result<Vec<Network>, ApiError> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.networks.clone()),
        }
    }
}

/// In-memory volume service.
pub struct StubVolume {
    pub enabled: bool,
    pub quotas: BTreeMap<String, VolumeTypeQuota>,
    pub error: Option<ApiError>,
}

impl Default for StubVolume {
    fn default() -> Self {
        Self {
            enabled: true,
            quotas: BTreeMap::new(),
            error: None,
        }
    }
}

#[async_trait]
impl VolumeApi for StubVolume {
    async fn is_service_enabled(&self) -> bool {
        self.enabled
    }

    async fn tenant_volume_type_quota_get(
        &self,
        _tenant_id: &str,
    ) -> Result<BTreeMap<String, VolumeTypeQuota>, ApiError> {
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.quotas.clone()),
        }
    }
}
