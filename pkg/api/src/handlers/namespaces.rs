use axum::{
    Json,
    extract::{Path as AxumPath, State},
};
use pkg_types::error::QuotaError;
use pkg_types::organization::Organization;
use pkg_types::quota::{QuotaSnapshot, QuotaUpdateRequest};

use crate::AppState;
use crate::response::{ApiError, ApiSuccess};

/// GET /api/v1/namespaces/{ns}/quota — same snapshot as the
/// organization-scoped route, addressed by the owned namespace.
/// Both route families call the one engine; only the lookup differs.
pub async fn get_quota(
    State(state): State<AppState>,
    AxumPath(namespace): AxumPath<String>,
) -> Result<ApiSuccess<QuotaSnapshot>, ApiError> {
    let org = find_org_by_namespace(&state, &namespace).await?;
    let snapshot = state.reader.snapshot(&org).await?;
    Ok(ApiSuccess::new(snapshot))
}

/// PUT /api/v1/namespaces/{ns}/quota — same update as the
/// organization-scoped route, addressed by the owned namespace.
pub async fn update_quota(
    State(state): State<AppState>,
    AxumPath(namespace): AxumPath<String>,
    Json(request): Json<QuotaUpdateRequest>,
) -> Result<ApiSuccess<QuotaSnapshot>, ApiError> {
    let org = find_org_by_namespace(&state, &namespace).await?;
    let snapshot = state.reconciler.update_quota(&org.id, request).await?;
    Ok(ApiSuccess::new(snapshot))
}

async fn find_org_by_namespace(
    state: &AppState,
    namespace: &str,
) -> Result<Organization, ApiError> {
    state
        .orgs
        .find_by_namespace(namespace)
        .await
        .map_err(|e| QuotaError::Store(e.to_string()))?
        .ok_or_else(|| QuotaError::NotFound(format!("namespace {}", namespace)).into())
}
