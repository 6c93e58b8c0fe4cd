use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pkg_types::error::QuotaError;
use serde::Serialize;

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Error envelope wrapping the quota error taxonomy.
///
/// Validation errors are 400 with per-field details; authorization is 403;
/// unknown organizations/namespaces are 404; everything that went wrong
/// talking to the cluster or the record store is 500, with the upstream
/// message in `details`. A failed compensation additionally flags the
/// response as requiring manual reconciliation.
#[derive(Debug)]
pub struct ApiError(pub QuotaError);

impl From<QuotaError> for ApiError {
    fn from(err: QuotaError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, details) = match &self.0 {
            QuotaError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, serde_json::json!(errors))
            }
            QuotaError::MalformedQuantity(raw) => (StatusCode::BAD_REQUEST, serde_json::json!(raw)),
            QuotaError::Authorization => {
                (StatusCode::FORBIDDEN, serde_json::json!("permission denied"))
            }
            QuotaError::NotFound(what) => (StatusCode::NOT_FOUND, serde_json::json!(what)),
            QuotaError::ClusterRead(msg)
            | QuotaError::ClusterApply(msg)
            | QuotaError::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!(msg)),
            QuotaError::Compensation { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!(self.0.to_string()),
            ),
        };

        let mut body = serde_json::json!({
            "success": false,
            "error": self.0.to_string(),
            "details": details,
        });
        if matches!(self.0, QuotaError::Compensation { .. }) {
            body["requiresManualReconciliation"] = serde_json::json!(true);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::organization::Plan;

    fn status_of(err: QuotaError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_http_statuses() {
        assert_eq!(
            status_of(QuotaError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(QuotaError::Authorization), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(QuotaError::NotFound("organization x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(QuotaError::ClusterApply("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(QuotaError::Compensation {
                attempted: Plan::Custom,
                previous: Plan::Pro,
                apply_error: "boom".into(),
                revert_error: "down".into(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
