//! Resource quota constants.

/// Name of the single ResourceQuota object quotad manages in each
/// organization namespace.
pub const MANAGED_QUOTA_NAME: &str = "org-quota";

/// Label recording which organization a managed ResourceQuota belongs to.
pub const ORG_ID_LABEL: &str = "quotad.io/organization-id";

/// Label marking a ResourceQuota as managed by quotad.
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Value for [`MANAGED_BY_LABEL`].
pub const MANAGED_BY_VALUE: &str = "quotad";

/// Utilization percentage at which a resource is reported as near its limit.
pub const DEFAULT_WARN_THRESHOLD_PERCENT: f64 = 80.0;

/// How long a cluster-side quota apply may run before it is treated as failed.
pub const DEFAULT_APPLY_TIMEOUT_SECS: u64 = 10;

/// Resource keys a custom quota spec must always carry.
pub const REQUIRED_CUSTOM_RESOURCES: [&str; 2] = ["cpu", "memory"];
