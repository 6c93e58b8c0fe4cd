use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quota::QuotaMap;

/// Quota plan assigned to an organization.
///
/// `Custom` is an output state only: it is what an organization ends up on
/// after a custom quota spec is applied, never an accepted request value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
    Custom,
}

impl Plan {
    /// Parse a plan name from a change request. The named set is closed:
    /// anything outside `free`/`pro`/`enterprise` is rejected, including
    /// the literal `custom`.
    pub fn from_request(name: &str) -> Option<Plan> {
        match name {
            "free" => Some(Plan::Free),
            "pro" => Some(Plan::Pro),
            "enterprise" => Some(Plan::Enterprise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
            Plan::Custom => "custom",
        }
    }

    /// The canonical quota bundle for a named plan. `Custom` has no preset:
    /// its limits are whatever spec the caller supplied at apply time.
    pub fn preset(&self) -> Option<QuotaMap> {
        let (cpu, memory, pods) = match self {
            Plan::Free => ("2", "4Gi", "10"),
            Plan::Pro => ("8", "16Gi", "50"),
            Plan::Enterprise => ("32", "64Gi", "200"),
            Plan::Custom => return None,
        };
        Some(QuotaMap::from([
            ("cpu".to_string(), cpu.to_string()),
            ("memory".to_string(), memory.to_string()),
            ("count/pods".to_string(), pods.to_string()),
        ]))
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An organization on the platform. Each organization owns exactly one
/// Kubernetes namespace; `plan` always reflects the last quota state that
/// was successfully applied to that namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_plans_parse() {
        assert_eq!(Plan::from_request("free"), Some(Plan::Free));
        assert_eq!(Plan::from_request("pro"), Some(Plan::Pro));
        assert_eq!(Plan::from_request("enterprise"), Some(Plan::Enterprise));
    }

    #[test]
    fn custom_is_not_a_valid_request_plan() {
        assert_eq!(Plan::from_request("custom"), None);
        assert_eq!(Plan::from_request("gold"), None);
        assert_eq!(Plan::from_request(""), None);
        assert_eq!(Plan::from_request("Free"), None);
    }

    #[test]
    fn presets_cover_every_named_plan() {
        for plan in [Plan::Free, Plan::Pro, Plan::Enterprise] {
            let preset = plan.preset().unwrap();
            assert!(preset.contains_key("cpu"));
            assert!(preset.contains_key("memory"));
            assert!(preset.contains_key("count/pods"));
        }
        assert!(Plan::Custom.preset().is_none());
    }

    #[test]
    fn plan_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Plan::Enterprise).unwrap(), "\"enterprise\"");
        let back: Plan = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(back, Plan::Custom);
    }
}
