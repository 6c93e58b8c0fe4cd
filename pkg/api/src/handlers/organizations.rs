use axum::{
    Json,
    extract::{Path as AxumPath, State},
};
use chrono::Utc;
use pkg_types::error::QuotaError;
use pkg_types::organization::{Organization, Plan};
use pkg_types::quota::{ProvisionRequest, QuotaSnapshot, QuotaUpdateRequest};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::response::{ApiError, ApiSuccess};

/// POST /api/v1/organizations — provision an organization.
/// Every organization starts on the free plan; the quota itself reaches
/// the cluster on the first quota update.
pub async fn provision_organization(
    State(state): State<AppState>,
    Json(req): Json<ProvisionRequest>,
) -> Result<ApiSuccess<Organization>, ApiError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push("name must not be empty".to_string());
    }
    if req.namespace.trim().is_empty() {
        errors.push("namespace must not be empty".to_string());
    }
    if !errors.is_empty() {
        return Err(QuotaError::Validation(errors).into());
    }

    let org = Organization {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        namespace: req.namespace,
        plan: Plan::Free,
        created_at: Utc::now(),
    };
    state
        .orgs
        .create(&org)
        .await
        .map_err(|e| QuotaError::Store(e.to_string()))?;
    info!("Provisioned organization {} ({})", org.name, org.id);
    Ok(ApiSuccess::new(org))
}

/// GET /api/v1/organizations — list all organizations.
pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<Organization>>, ApiError> {
    let orgs = state
        .orgs
        .list()
        .await
        .map_err(|e| QuotaError::Store(e.to_string()))?;
    Ok(ApiSuccess::new(orgs))
}

/// GET /api/v1/organizations/{id} — fetch one organization record.
pub async fn get_organization(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<ApiSuccess<Organization>, ApiError> {
    let org = find_org(&state, &id).await?;
    Ok(ApiSuccess::new(org))
}

/// GET /api/v1/organizations/{id}/quota — live quota snapshot.
pub async fn get_quota(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<ApiSuccess<QuotaSnapshot>, ApiError> {
    let org = find_org(&state, &id).await?;
    let snapshot = state.reader.snapshot(&org).await?;
    Ok(ApiSuccess::new(snapshot))
}

/// PUT /api/v1/organizations/{id}/quota — change plan or custom quotas.
pub async fn update_quota(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(request): Json<QuotaUpdateRequest>,
) -> Result<ApiSuccess<QuotaSnapshot>, ApiError> {
    let snapshot = state.reconciler.update_quota(&id, request).await?;
    Ok(ApiSuccess::new(snapshot))
}

pub(crate) async fn find_org(state: &AppState, id: &str) -> Result<Organization, ApiError> {
    state
        .orgs
        .find(id)
        .await
        .map_err(|e| QuotaError::Store(e.to_string()))?
        .ok_or_else(|| QuotaError::NotFound(format!("organization {}", id)).into())
}
