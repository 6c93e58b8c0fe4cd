use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::organization::Organization;

/// Resource name → quantity string. Used both for limits ("quota") and for
/// current consumption ("used"). Values stay strings all the way to the
/// boundary; normalization happens only inside a calculation.
pub type QuotaMap = BTreeMap<String, String>;

/// Live quota state for one namespace, as read from the cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceQuotaUsage {
    #[serde(default)]
    pub quota: QuotaMap,
    #[serde(default)]
    pub used: QuotaMap,
}

/// Per-resource utilization derived from a quota/usage pair.
/// Computed fresh on every read, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationReport {
    pub percent_used: BTreeMap<String, f64>,
    pub warnings: Vec<String>,
    pub is_near_limit: bool,
}

/// Full quota view for one organization — the `data` payload of the
/// GET/PUT quota endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaSnapshot {
    pub organization: Organization,
    pub quota: QuotaMap,
    pub used: QuotaMap,
    pub available: QuotaMap,
    pub percent_used: BTreeMap<String, f64>,
    pub warnings: Vec<String>,
    pub is_near_limit: bool,
}

/// Body of a PUT quota request. Exactly one of `plan` / `quotas` must be
/// present; supplying neither or both is a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotaUpdateRequest {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub quotas: Option<QuotaMap>,
}

/// Body of a POST organization provisioning request. The plan is not part
/// of the request: every organization starts on `free`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionRequest {
    pub name: String,
    pub namespace: String,
}
