//! Volume overview: per-type storage quota summary.

use crate::api::{VolumeApi, VolumeTypeQuota};
use crate::error::DashboardError;
use crate::exceptions;
use crate::request::Request;
use log::debug;
use std::collections::BTreeMap;

/// Volume types worth showing, sorted by name.
///
/// A type is kept when it has a positive gigabyte limit or any usage.
pub fn quotas_per_type(
    quotas: &BTreeMap<String, VolumeTypeQuota>,
) -> Vec<(String, VolumeTypeQuota)> {
    quotas
        .iter()
        .filter(|(_, quota)| quota.gigabytes.limit > 0 || quota.gigabytes.in_use > 0)
        .map(|(name, quota)| (name.clone(), *quota))
        .collect()
}

/// Quota summary for the volume index page.
///
/// `None` when the volume service is disabled, reports no quotas, or fails
/// with a handled error.
pub async fn volume_quota_summary(
    request: &mut Request,
    api: &dyn VolumeApi,
) -> Result<Option<Vec<(String, VolumeTypeQuota)>>, DashboardError> {
    if !api.is_service_enabled().await {
        debug!("volume service disabled; skipping quota summary");
        return Ok(None);
    }
    let tenant_id = request.tenant_id.clone();
    match api.tenant_volume_type_quota_get(&tenant_id).await {
        Ok(quotas) if quotas.is_empty() => Ok(None),
        Ok(quotas) => Ok(Some(quotas_per_type(&quotas))),
        Err(err) => {
            exceptions::handle(
                request,
                err,
                "Unable to retrieve volume storage usage information.",
            )?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::QuotaUsage;
    use pretty_assertions::assert_eq;

    fn quota(limit: i64, in_use: i64) -> VolumeTypeQuota {
        VolumeTypeQuota {
            gigabytes: QuotaUsage { limit, in_use },
            ..VolumeTypeQuota::default()
        }
    }

    #[test]
    fn unused_and_unlimited_types_are_hidden() {
        let quotas = BTreeMap::from([
            ("ssd".to_string(), quota(100, 0)),
            ("archive".to_string(), quota(-1, 0)),
            ("legacy".to_string(), quota(0, 12)),
            ("empty".to_string(), quota(0, 0)),
        ]);
        assert_eq!(
            quotas_per_type(&quotas),
            vec![
                ("legacy".to_string(), quota(0, 12)),
                ("ssd".to_string(), quota(100, 0)),
            ]
        );
    }
}
