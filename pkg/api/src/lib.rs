pub mod auth;
pub mod handlers;
pub mod request_id;
pub mod response;
pub mod server;

use std::sync::Arc;

use pkg_quota::snapshot::QuotaSnapshotReader;
use pkg_reconciler::QuotaReconciler;
use pkg_state::OrganizationRecords;

/// Shared application state injected into all Axum handlers.
///
/// Collaborators are held behind trait objects so tests (and alternative
/// deployments) can swap the record store or the cluster client without
/// any process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub orgs: Arc<dyn OrganizationRecords>,
    pub reader: QuotaSnapshotReader,
    pub reconciler: Arc<QuotaReconciler>,
    pub admin_token: String,
}
