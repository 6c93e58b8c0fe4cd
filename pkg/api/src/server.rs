use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use crate::AppState;
use crate::auth::{auth_middleware, permission_middleware};
use crate::handlers::{namespaces, organizations};
use crate::request_id::request_id_middleware;
use pkg_cluster::client::HttpClusterClient;
use pkg_quota::snapshot::QuotaSnapshotReader;
use pkg_reconciler::QuotaReconciler;
use pkg_state::{OrgStore, OrganizationRecords};

/// Server configuration passed from the binary's CLI.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_dir: String,
    pub admin_token: String,
    pub kube_api_url: String,
    pub kube_token: String,
    pub apply_timeout: Duration,
    pub warn_threshold: f64,
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize collaborators: the record store, the cluster client, and
    // the engine pieces wired on top of them.
    let store = OrgStore::open(&config.data_dir).await?;
    let cluster = Arc::new(HttpClusterClient::new(
        &config.kube_api_url,
        &config.kube_token,
        config.apply_timeout,
    )?);
    let orgs: Arc<dyn OrganizationRecords> = Arc::new(store);
    let reader = QuotaSnapshotReader::new(cluster.clone(), config.warn_threshold);
    let reconciler = Arc::new(QuotaReconciler::new(
        orgs.clone(),
        cluster,
        reader.clone(),
        config.apply_timeout,
    ));

    let state = AppState {
        orgs,
        reader,
        reconciler,
        admin_token: config.admin_token,
    };

    // Protected API routes
    let api_routes = Router::new()
        .route(
            "/api/v1/organizations",
            post(organizations::provision_organization).get(organizations::list_organizations),
        )
        .route(
            "/api/v1/organizations/{id}",
            get(organizations::get_organization),
        )
        .route(
            "/api/v1/organizations/{id}/quota",
            get(organizations::get_quota).put(organizations::update_quota),
        )
        // Namespace-scoped aliases of the same engine
        .route(
            "/api/v1/namespaces/{ns}/quota",
            put(namespaces::update_quota).get(namespaces::get_quota),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            permission_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .merge(api_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state);

    info!("Starting quotad API server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
