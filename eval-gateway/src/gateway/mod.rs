pub mod client;
pub mod handlers;

pub use client::{HttpInferenceClient, InferenceClient};

use crate::error::EvaluateError;
use crate::labels::LabelTable;
use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use common::api::{CustomerProfile, EvaluationResult};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use validator::Validate;

/// Customer-facing evaluation service. Built once at startup and shared by every request.
pub struct EvalGateway<C> {
    pub inference: C,
    pub labels: LabelTable,
    /// Append internal error detail to client-facing messages
    pub expose_error_details: bool,
}

impl<C: InferenceClient> EvalGateway<C> {
    pub fn new(inference: C, labels: LabelTable, expose_error_details: bool) -> Self {
        Self {
            inference,
            labels,
            expose_error_details,
        }
    }

    /// Validate the profile, ask the model server for its cluster and attach the label.
    /// Every call goes to the model server, even for a profile seen before.
    pub async fn evaluate(&self, profile: CustomerProfile) -> Result<EvaluationResult, EvaluateError> {
        profile
            .validate()
            .map_err(|e| EvaluateError::Validation(e.to_string()))?;

        let features = profile.features();
        let cluster = self.inference.predict(&features).await?;
        let label = self.labels.label(cluster).to_string();

        Ok(EvaluationResult {
            name: profile.name,
            cluster,
            label,
        })
    }

    pub async fn run(self: Arc<Self>, port: u16) -> Result<()> {
        let app = self.create_router();
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

        info!("Evaluation gateway listening on port {}", port);
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
            .route("/avaliar", post(handlers::evaluate::<C>))
            .layer(cors)
            .with_state(self)
    }
}
