use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pkg_cluster::ClusterQuotas;
use pkg_quota::snapshot::QuotaSnapshotReader;
use pkg_state::OrganizationRecords;
use pkg_types::error::QuotaError;
use pkg_types::organization::{Organization, Plan};
use pkg_types::quota::{QuotaMap, QuotaSnapshot, QuotaUpdateRequest};
use pkg_types::validate::validate_custom_spec;
use tracing::{error, info, warn};

/// A validated quota change: either a named plan or a custom spec.
/// Built from the raw request body before any side effect happens.
#[derive(Debug, Clone)]
enum QuotaChange {
    Plan(Plan),
    Custom(QuotaMap),
}

impl QuotaChange {
    fn validate(request: QuotaUpdateRequest) -> Result<QuotaChange, QuotaError> {
        match (request.plan, request.quotas) {
            (Some(_), Some(_)) => Err(QuotaError::validation(
                "supply either 'plan' or 'quotas', not both",
            )),
            (None, None) => Err(QuotaError::validation("supply one of 'plan' or 'quotas'")),
            (Some(name), None) => Plan::from_request(&name)
                .map(QuotaChange::Plan)
                .ok_or_else(|| QuotaError::validation(format!("unknown plan '{}'", name))),
            (None, Some(spec)) => {
                let outcome = validate_custom_spec(&spec);
                if outcome.valid {
                    Ok(QuotaChange::Custom(spec))
                } else {
                    Err(QuotaError::Validation(outcome.errors))
                }
            }
        }
    }

    /// The plan value the organization record ends up on if this change
    /// is applied successfully.
    fn target_plan(&self) -> Plan {
        match self {
            QuotaChange::Plan(plan) => *plan,
            QuotaChange::Custom(_) => Plan::Custom,
        }
    }
}

/// Outcome of the cluster-apply step. A timeout is an ordinary failure:
/// it triggers compensation exactly like a rejected apply.
enum ApplyOutcome {
    Applied,
    Failed(String),
}

/// Orchestrates a quota change across the record store and the cluster:
///
/// validate → persist plan → apply ResourceQuota → (on apply failure)
/// compensate by restoring the pre-operation plan.
///
/// The store write deliberately precedes the cluster apply. Store-side
/// drift (plan updated, cluster still on the old quota) is detectable and
/// repairable by a later reconcile; the reverse order would leave the
/// cluster changed with no record of why while the caller sees a failure.
///
/// At most one update is in flight per organization: a per-org async lock
/// is held from the store write through the apply (and through any
/// compensation), so a rollback can never clobber a concurrent update's
/// committed result. Reads take no lock.
pub struct QuotaReconciler {
    orgs: Arc<dyn OrganizationRecords>,
    cluster: Arc<dyn ClusterQuotas>,
    reader: QuotaSnapshotReader,
    apply_timeout: Duration,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl QuotaReconciler {
    pub fn new(
        orgs: Arc<dyn OrganizationRecords>,
        cluster: Arc<dyn ClusterQuotas>,
        reader: QuotaSnapshotReader,
        apply_timeout: Duration,
    ) -> Self {
        Self {
            orgs,
            cluster,
            reader,
            apply_timeout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Change an organization's quota to a named plan or a custom spec.
    /// On success, returns a snapshot re-read from the cluster — the
    /// cluster is the source of truth for what was actually applied.
    pub async fn update_quota(
        &self,
        org_id: &str,
        request: QuotaUpdateRequest,
    ) -> Result<QuotaSnapshot, QuotaError> {
        let change = QuotaChange::validate(request)?;

        let lock = self.org_lock(org_id);
        let _guard = lock.lock().await;

        let org = self
            .orgs
            .find(org_id)
            .await
            .map_err(|e| QuotaError::Store(e.to_string()))?
            .ok_or_else(|| QuotaError::NotFound(format!("organization {}", org_id)))?;
        let previous = org.plan;
        let target = change.target_plan();

        self.orgs
            .update_plan(org_id, target)
            .await
            .map_err(|e| QuotaError::Store(e.to_string()))?;

        match self.apply(&org, &change).await {
            ApplyOutcome::Applied => {
                info!(
                    "Quota update committed for {} ({} -> {})",
                    org_id, previous, target
                );
            }
            ApplyOutcome::Failed(apply_error) => {
                warn!(
                    "Cluster apply failed for {}, reverting plan to {}: {}",
                    org_id, previous, apply_error
                );
                return Err(self.compensate(org_id, target, previous, apply_error).await);
            }
        }

        let refreshed = self
            .orgs
            .find(org_id)
            .await
            .map_err(|e| QuotaError::Store(e.to_string()))?
            .ok_or_else(|| QuotaError::NotFound(format!("organization {}", org_id)))?;
        self.reader.snapshot(&refreshed).await
    }

    async fn apply(&self, org: &Organization, change: &QuotaChange) -> ApplyOutcome {
        let call = async {
            match change {
                QuotaChange::Plan(plan) => {
                    self.cluster
                        .apply_plan(&org.namespace, *plan, &org.id)
                        .await
                }
                QuotaChange::Custom(spec) => {
                    self.cluster
                        .apply_custom(&org.namespace, spec, &org.id)
                        .await
                }
            }
        };
        match tokio::time::timeout(self.apply_timeout, call).await {
            Ok(Ok(())) => ApplyOutcome::Applied,
            Ok(Err(e)) => ApplyOutcome::Failed(e.to_string()),
            Err(_) => ApplyOutcome::Failed(format!(
                "apply timed out after {}s",
                self.apply_timeout.as_secs()
            )),
        }
    }

    /// Restore the pre-operation plan after a failed apply. A failed
    /// restore leaves the store and the cluster unreconciled, which is a
    /// distinct, more severe outcome than the apply failure itself.
    async fn compensate(
        &self,
        org_id: &str,
        attempted: Plan,
        previous: Plan,
        apply_error: String,
    ) -> QuotaError {
        match self.orgs.update_plan(org_id, previous).await {
            Ok(()) => {
                info!("Rolled back plan for {} to {}", org_id, previous);
                QuotaError::ClusterApply(apply_error)
            }
            Err(revert) => {
                let err = QuotaError::Compensation {
                    attempted,
                    previous,
                    apply_error,
                    revert_error: revert.to_string(),
                };
                error!("Manual reconciliation required for {}: {}", org_id, err);
                err
            }
        }
    }

    fn org_lock(&self, org_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(org_id.to_string()).or_default().clone()
    }
}
