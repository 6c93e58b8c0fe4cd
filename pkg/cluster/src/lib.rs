pub mod client;

use async_trait::async_trait;
use pkg_types::organization::Plan;
use pkg_types::quota::{NamespaceQuotaUsage, QuotaMap};

/// Namespace-scoped ResourceQuota reader/writer.
///
/// Injected into the snapshot reader and the reconciler so tests can
/// substitute a fake without any process-level client state.
#[async_trait]
pub trait ClusterQuotas: Send + Sync {
    /// Read the current `{quota, used}` maps for a namespace. A namespace
    /// with no managed quota object yields empty maps.
    async fn get_quota_usage(&self, namespace: &str) -> anyhow::Result<NamespaceQuotaUsage>;

    /// Apply the preset ResourceQuota for a named plan to a namespace.
    async fn apply_plan(&self, namespace: &str, plan: Plan, org_id: &str) -> anyhow::Result<()>;

    /// Apply an arbitrary quota spec to a namespace. The spec must already
    /// have passed structural validation; it is applied whole or not at all.
    async fn apply_custom(
        &self,
        namespace: &str,
        spec: &QuotaMap,
        org_id: &str,
    ) -> anyhow::Result<()>;
}
