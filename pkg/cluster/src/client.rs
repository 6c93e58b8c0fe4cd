use anyhow::Context;
use async_trait::async_trait;
use pkg_constants::quota::{MANAGED_BY_LABEL, MANAGED_BY_VALUE, MANAGED_QUOTA_NAME, ORG_ID_LABEL};
use pkg_types::organization::Plan;
use pkg_types::quota::{NamespaceQuotaUsage, QuotaMap};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::ClusterQuotas;

/// ResourceQuota client for a Kubernetes API server.
///
/// quotad manages exactly one quota object per organization namespace
/// (named [`MANAGED_QUOTA_NAME`]); everything this client does is scoped to
/// that object. All requests carry a bearer token and are bounded by the
/// client-wide timeout, so a hung API server surfaces as an apply failure
/// rather than a stuck reconcile.
pub struct HttpClusterClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

/// Wire shape of the parts of a ResourceQuota object we read.
#[derive(Debug, Default, Deserialize)]
struct QuotaObject {
    #[serde(default)]
    status: QuotaStatus,
}

#[derive(Debug, Default, Deserialize)]
struct QuotaStatus {
    #[serde(default)]
    hard: QuotaMap,
    #[serde(default)]
    used: QuotaMap,
}

impl HttpClusterClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Kubernetes HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn collection_url(&self, namespace: &str) -> String {
        format!("{}/api/v1/namespaces/{}/resourcequotas", self.base_url, namespace)
    }

    fn object_url(&self, namespace: &str) -> String {
        format!("{}/{}", self.collection_url(namespace), MANAGED_QUOTA_NAME)
    }

    fn labels(org_id: &str) -> serde_json::Value {
        serde_json::json!({
            ORG_ID_LABEL: org_id,
            MANAGED_BY_LABEL: MANAGED_BY_VALUE,
        })
    }

    /// Write `hard` as the managed quota object's limits. Merge-patches the
    /// existing object; creates it on first apply.
    async fn apply_hard_limits(
        &self,
        namespace: &str,
        hard: &QuotaMap,
        org_id: &str,
    ) -> anyhow::Result<()> {
        let patch = serde_json::json!({
            "metadata": { "labels": Self::labels(org_id) },
            "spec": { "hard": hard },
        });
        let resp = self
            .http
            .patch(self.object_url(namespace))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/merge-patch+json")
            .json(&patch)
            .send()
            .await
            .with_context(|| format!("failed to patch ResourceQuota in {}", namespace))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("No managed quota in {} yet, creating", namespace);
            return self.create_quota(namespace, hard, org_id).await;
        }
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("cluster returned {} patching quota in {}: {}", status, namespace, body);
        }
        info!(
            "Applied quota to namespace {} ({} resources)",
            namespace,
            hard.len()
        );
        Ok(())
    }

    async fn create_quota(
        &self,
        namespace: &str,
        hard: &QuotaMap,
        org_id: &str,
    ) -> anyhow::Result<()> {
        let manifest = serde_json::json!({
            "apiVersion": "v1",
            "kind": "ResourceQuota",
            "metadata": {
                "name": MANAGED_QUOTA_NAME,
                "namespace": namespace,
                "labels": Self::labels(org_id),
            },
            "spec": { "hard": hard },
        });
        let resp = self
            .http
            .post(self.collection_url(namespace))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&manifest)
            .send()
            .await
            .with_context(|| format!("failed to create ResourceQuota in {}", namespace))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("cluster returned {} creating quota in {}: {}", status, namespace, body);
        }
        info!("Created managed quota in namespace {}", namespace);
        Ok(())
    }
}

#[async_trait]
impl ClusterQuotas for HttpClusterClient {
    async fn get_quota_usage(&self, namespace: &str) -> anyhow::Result<NamespaceQuotaUsage> {
        let resp = self
            .http
            .get(self.object_url(namespace))
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .with_context(|| format!("failed to read ResourceQuota in {}", namespace))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("No managed quota in namespace {}", namespace);
            return Ok(NamespaceQuotaUsage::default());
        }
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("cluster returned {} reading quota in {}: {}", status, namespace, body);
        }
        let object: QuotaObject = resp
            .json()
            .await
            .with_context(|| format!("failed to decode ResourceQuota in {}", namespace))?;
        Ok(NamespaceQuotaUsage {
            quota: object.status.hard,
            used: object.status.used,
        })
    }

    async fn apply_plan(&self, namespace: &str, plan: Plan, org_id: &str) -> anyhow::Result<()> {
        let hard = plan
            .preset()
            .ok_or_else(|| anyhow::anyhow!("plan '{}' has no preset quota bundle", plan))?;
        self.apply_hard_limits(namespace, &hard, org_id).await
    }

    async fn apply_custom(
        &self,
        namespace: &str,
        spec: &QuotaMap,
        org_id: &str,
    ) -> anyhow::Result<()> {
        self.apply_hard_limits(namespace, spec, org_id).await
    }
}
