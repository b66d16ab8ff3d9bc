pub mod handlers;

use crate::model::ModelState;
use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Everything a request handler needs. Built once in `main`, read-only afterwards.
pub struct ModelServer {
    pub model: ModelState,
    /// Append internal error detail to client-facing messages
    pub expose_error_details: bool,
}

impl ModelServer {
    pub fn new(model: ModelState, expose_error_details: bool) -> Self {
        Self {
            model,
            expose_error_details,
        }
    }

    pub async fn run(self: Arc<Self>, port: u16) -> Result<()> {
        let app = self.create_router();
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

        info!("Model server listening on port {}", port);
        axum::serve(listener, app)
            .with_graceful_shutdown(common::shutdown_signal())
            .await
            .map_err(Into::into)
    }

    pub fn create_router(self: Arc<Self>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/predict", post(handlers::predict))
            .layer(cors)
            .with_state(self)
    }
}
