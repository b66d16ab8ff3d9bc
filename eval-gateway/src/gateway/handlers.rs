use crate::error::EvaluateError;
use crate::gateway::{EvalGateway, InferenceClient};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use common::api::{CustomerProfile, GatewayHealth};
use std::sync::Arc;
use tracing::info;

pub async fn health() -> Json<GatewayHealth> {
    Json(GatewayHealth {
        status: "client_evaluation_service funcionando".to_string(),
    })
}

/// `POST /avaliar`
pub async fn evaluate<C: InferenceClient>(
    State(gateway): State<Arc<EvalGateway<C>>>,
    payload: Result<Json<CustomerProfile>, JsonRejection>,
) -> Response {
    let profile = match payload {
        Ok(Json(profile)) => profile,
        Err(rejection) => {
            return EvaluateError::Validation(rejection.body_text())
                .into_response_with(gateway.expose_error_details)
        }
    };

    info!("Starting evaluation for customer: {}", profile.name);
    match gateway.evaluate(profile).await {
        Ok(result) => {
            info!("Result for {}: cluster {}", result.name, result.cluster);
            Json(result).into_response()
        }
        Err(e) => e.into_response_with(gateway.expose_error_details),
    }
}
