use crate::organization::Plan;
use thiserror::Error;

/// Error taxonomy for the quota engine.
///
/// Validation, authorization, and not-found errors are resolved before any
/// side effect occurs. Only `ClusterApply` has a recovery path (the
/// compensating store write); `Compensation` means that recovery itself
/// failed and the record store and cluster are unreconciled.
#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("permission denied")]
    Authorization,

    #[error("{0} not found")]
    NotFound(String),

    #[error("failed to read quota state from cluster: {0}")]
    ClusterRead(String),

    #[error("cluster apply failed: {0}")]
    ClusterApply(String),

    #[error(
        "compensation failed: plan left as '{attempted}' but cluster apply did not succeed \
         (wanted rollback to '{previous}'): apply: {apply_error}; revert: {revert_error}"
    )]
    Compensation {
        attempted: Plan,
        previous: Plan,
        apply_error: String,
        revert_error: String,
    },

    #[error("malformed quantity '{0}'")]
    MalformedQuantity(String),

    #[error("record store error: {0}")]
    Store(String),
}

impl QuotaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        QuotaError::Validation(vec![msg.into()])
    }
}
