use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::AppState;

/// Information about the authenticated entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: String,
}

/// Middleware: authenticates the request using a Bearer token.
/// Currently we validate against the configured admin token. In a full
/// deployment this would look up per-user API tokens in the record store.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req.headers().get(header::AUTHORIZATION);

    let token = match auth_header {
        Some(value) => {
            let value_str = value.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;
            if !value_str.starts_with("Bearer ") {
                return Err(StatusCode::UNAUTHORIZED);
            }
            value_str.trim_start_matches("Bearer ").to_string()
        }
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    if token == state.admin_token {
        let user = AuthUser {
            name: "admin".to_string(),
        };
        req.extensions_mut().insert(user);
        Ok(next.run(req).await)
    } else {
        warn!("Invalid Bearer token provided");
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// The action a request performs on quota state.
fn action_from_method(method: &axum::http::Method) -> &'static str {
    match *method {
        axum::http::Method::GET => "read",
        axum::http::Method::POST => "provision",
        axum::http::Method::PUT | axum::http::Method::PATCH => "update",
        _ => "",
    }
}

/// Middleware: checks whether the authenticated user may perform the
/// requested action. Quota reads and writes are admin-only; anything an
/// unprivileged identity attempts is denied before a handler runs.
pub async fn permission_middleware(
    State(_state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let action = action_from_method(req.method());
    debug!(
        "Permission check: user={} action={} path={}",
        user.name,
        action,
        req.uri().path()
    );

    if user.name == "admin" {
        return Ok(next.run(req).await);
    }

    warn!(
        "Permission denied: user={} action={} path={}",
        user.name,
        action,
        req.uri().path()
    );
    Err(StatusCode::FORBIDDEN)
}
