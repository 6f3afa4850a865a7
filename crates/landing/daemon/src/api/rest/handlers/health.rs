//! Health handler

use crate::api::rest::state::AppState;
use crate::storage::StorageHealth;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub storage: StorageStatus,
    pub mail_transport: String,
}

#[derive(Debug, Serialize)]
pub struct StorageStatus {
    pub backend: String,
    pub reachable: bool,
}

/// Health check endpoint; `degraded` while storage is unreachable
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let storage = state.storage();
    let reachable = match storage.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage ping failed");
            false
        }
    };

    Json(HealthCheckResponse {
        status: if reachable { "healthy" } else { "degraded" }.to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        storage: StorageStatus {
            backend: storage.backend().to_string(),
            reachable,
        },
        mail_transport: state.service.notifier().transport_name().to_string(),
    })
}
