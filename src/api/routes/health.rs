//! Root banner and health check

use crate::api::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: &'static str,
    pub status: &'static str,
    pub documentation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub backend: &'static str,
}

pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Heart Attack Prediction API",
        status: "running",
        documentation: "See README.md for the endpoint reference",
    })
}

/// Pings the store; 503 when it does not answer
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let backend = state.store.backend_name();
    match state.store.test_connection().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "healthy",
                database: "connected",
                backend,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unhealthy",
                    database: "disconnected",
                    backend,
                }),
            )
        }
    }
}
