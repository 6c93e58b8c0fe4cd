use std::sync::Arc;

use pkg_cluster::ClusterQuotas;
use pkg_types::error::QuotaError;
use pkg_types::organization::Organization;
use pkg_types::quota::{QuotaMap, QuotaSnapshot};

use crate::quantity;
use crate::usage;

/// Reads the live quota state for an organization's namespace and derives
/// the utilization view served by the GET endpoints.
///
/// Reads have no side effects and are safe under unbounded concurrency. A
/// read that races an in-flight quota update may observe the record store
/// and the cluster briefly disagreeing; that window is eventually
/// consistent and closes when the update reaches a terminal state.
#[derive(Clone)]
pub struct QuotaSnapshotReader {
    cluster: Arc<dyn ClusterQuotas>,
    warn_threshold: f64,
}

impl QuotaSnapshotReader {
    pub fn new(cluster: Arc<dyn ClusterQuotas>, warn_threshold: f64) -> Self {
        Self {
            cluster,
            warn_threshold,
        }
    }

    /// Fetch `{quota, used}` for the organization's namespace and compute
    /// percentages, warnings, and the remaining-headroom map.
    pub async fn snapshot(&self, organization: &Organization) -> Result<QuotaSnapshot, QuotaError> {
        let usage = self
            .cluster
            .get_quota_usage(&organization.namespace)
            .await
            .map_err(|e| QuotaError::ClusterRead(e.to_string()))?;

        let report = usage::report(&usage.quota, &usage.used, self.warn_threshold);
        let available = available(&usage.quota, &usage.used);

        Ok(QuotaSnapshot {
            organization: organization.clone(),
            quota: usage.quota,
            used: usage.used,
            available,
            percent_used: report.percent_used,
            warnings: report.warnings,
            is_near_limit: report.is_near_limit,
        })
    }
}

/// Remaining headroom per resource, rendered in the limit's unit family.
/// Over-consumed resources report zero remaining, and a resource whose
/// quantities cannot be parsed is omitted (it is already surfaced as a
/// report warning).
fn available(quota: &QuotaMap, used: &QuotaMap) -> QuotaMap {
    let mut out = QuotaMap::new();
    for (resource, limit) in quota {
        let dimension = quantity::classify(resource);
        let used_raw = used.get(resource).map(String::as_str).unwrap_or("0");
        let (Ok(limit_normalized), Ok(used_normalized)) = (
            quantity::parse(dimension, limit),
            quantity::parse(dimension, used_raw),
        ) else {
            continue;
        };
        let remaining = (limit_normalized - used_normalized).max(0.0);
        out.insert(resource.clone(), quantity::render(dimension, remaining));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use pkg_types::organization::Plan;
    use pkg_types::quota::NamespaceQuotaUsage;

    struct FixedCluster {
        usage: NamespaceQuotaUsage,
    }

    #[async_trait]
    impl ClusterQuotas for FixedCluster {
        async fn get_quota_usage(&self, _namespace: &str) -> anyhow::Result<NamespaceQuotaUsage> {
            Ok(self.usage.clone())
        }

        async fn apply_plan(
            &self,
            _namespace: &str,
            _plan: Plan,
            _org_id: &str,
        ) -> anyhow::Result<()> {
            unreachable!("snapshot reads never apply");
        }

        async fn apply_custom(
            &self,
            _namespace: &str,
            _spec: &QuotaMap,
            _org_id: &str,
        ) -> anyhow::Result<()> {
            unreachable!("snapshot reads never apply");
        }
    }

    fn map(pairs: &[(&str, &str)]) -> QuotaMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn make_org() -> Organization {
        Organization {
            id: "org-1".to_string(),
            name: "acme".to_string(),
            namespace: "org-acme".to_string(),
            plan: Plan::Pro,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn snapshot_combines_report_and_headroom() {
        let cluster = Arc::new(FixedCluster {
            usage: NamespaceQuotaUsage {
                quota: map(&[("cpu", "2"), ("memory", "4Gi"), ("count/pods", "10")]),
                used: map(&[("cpu", "500m"), ("memory", "1Gi"), ("count/pods", "9")]),
            },
        });
        let reader = QuotaSnapshotReader::new(cluster, 80.0);

        let snap = reader.snapshot(&make_org()).await.unwrap();
        assert_eq!(snap.percent_used["cpu"], 25.0);
        assert_eq!(snap.percent_used["memory"], 25.0);
        assert_eq!(snap.percent_used["count/pods"], 90.0);
        assert_eq!(snap.available["cpu"], "1500m");
        assert_eq!(snap.available["memory"], "3Gi");
        assert_eq!(snap.available["count/pods"], "1");
        assert_eq!(snap.warnings, vec!["count/pods: 90.0% used"]);
        assert!(snap.is_near_limit);
    }

    #[tokio::test]
    async fn namespace_without_quota_yields_empty_snapshot() {
        let cluster = Arc::new(FixedCluster {
            usage: NamespaceQuotaUsage::default(),
        });
        let reader = QuotaSnapshotReader::new(cluster, 80.0);

        let snap = reader.snapshot(&make_org()).await.unwrap();
        assert!(snap.quota.is_empty());
        assert!(snap.percent_used.is_empty());
        assert!(!snap.is_near_limit);
    }

    #[tokio::test]
    async fn overconsumed_resource_has_zero_headroom() {
        let cluster = Arc::new(FixedCluster {
            usage: NamespaceQuotaUsage {
                quota: map(&[("count/pods", "10")]),
                used: map(&[("count/pods", "12")]),
            },
        });
        let reader = QuotaSnapshotReader::new(cluster, 80.0);

        let snap = reader.snapshot(&make_org()).await.unwrap();
        assert_eq!(snap.available["count/pods"], "0");
        assert_eq!(snap.percent_used["count/pods"], 100.0);
    }
}
