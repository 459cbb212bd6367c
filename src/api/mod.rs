//! REST API over the record store
//!
//! - [`routes`] - Handlers for the three entities, the latest-entry read and health
//! - [`error`] - Error to status mapping with `{"detail": ...}` bodies
//! - [`responses`] - Bodies returned by create, update and delete
//!
//! The store is built once by the caller and shared through [`AppState`].
//! [`serve`] closes it after the server has drained.

pub mod error;
pub mod responses;
pub mod routes;

use crate::adapters::store::RecordStore;
use crate::config::ServerConfig;
use crate::domain::{HeartwatchError, Result};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

/// Builds the application router
pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let api = Router::new()
        .nest("/patients", routes::patients::router())
        .nest("/medical-records", routes::medical_records::router())
        .nest("/heart-attack-tests", routes::heart_attack_tests::router())
        .route("/latest-entry", get(routes::latest_entry::get_latest_entry));

    let app = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Serves the API until `shutdown` flips to `true`, then closes the store
///
/// # Errors
///
/// Returns an error if the address can't be bound or the server fails.
pub async fn serve(
    server: &ServerConfig,
    store: Arc<dyn RecordStore>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| HeartwatchError::Io(format!("Failed to bind {address}: {e}")))?;

    tracing::info!(
        address = %address,
        backend = store.backend_name(),
        "Heartwatch API listening"
    );

    let app = router(AppState::new(Arc::clone(&store)), server.cors_permissive);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("Shutdown requested, draining connections");
        })
        .await
        .map_err(|e| HeartwatchError::Io(format!("Server error: {e}")));

    store.close().await;
    tracing::info!("Record store closed");
    served
}
