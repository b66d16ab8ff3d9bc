use crate::model::PredictError;
use crate::server::ModelServer;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::api::{
    ClusterId, ErrorBody, FeatureVector, ModelHealth, PredictRequest, PredictResponse, API_VERSION,
    API_VERSION_HEADER,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::Validate;

pub async fn health(State(server): State<Arc<ModelServer>>) -> Response {
    if server.model.is_loaded() {
        Json(ModelHealth {
            status: "ml_model_service funcionando".to_string(),
            model_loaded: true,
        })
        .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody::new("Modelo de ML não carregado.")),
        )
            .into_response()
    }
}

pub async fn predict(
    State(server): State<Arc<ModelServer>>,
    headers: HeaderMap,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    match run_predict(&server, &headers, payload) {
        Ok(cluster) => Json(PredictResponse { cluster }).into_response(),
        Err(e) => error_response(e, server.expose_error_details),
    }
}

fn run_predict(
    server: &ModelServer,
    headers: &HeaderMap,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<ClusterId, PredictError> {
    // requests without the header are accepted for plain HTTP clients
    if let Some(version) = headers.get(API_VERSION_HEADER) {
        let version = version.to_str().unwrap_or_default();
        if version != API_VERSION {
            return Err(PredictError::UnsupportedVersion(version.to_string()));
        }
    }

    let Json(request) = payload.map_err(|rejection| PredictError::Validation(rejection.body_text()))?;
    request
        .validate()
        .map_err(|e| PredictError::Validation(e.to_string()))?;

    let features = FeatureVector::from(request);
    debug!("Predicting cluster for {:?}", features.as_array());
    let cluster = server.model.predict(&features)?;
    info!("Predicted cluster {}", cluster);
    Ok(cluster)
}

fn error_response(err: PredictError, expose_details: bool) -> Response {
    let (status, message) = match &err {
        PredictError::ModelUnavailable => {
            warn!("Prediction requested but the model is not loaded");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Modelo de ML não está disponível para predição.",
            )
        }
        PredictError::Inference(detail) => {
            error!("Model prediction failed: {}", detail);
            (StatusCode::INTERNAL_SERVER_ERROR, "Erro na predição do modelo.")
        }
        // Input problems belong to the caller, so their text is always returned.
        PredictError::Validation(detail) => {
            debug!("Rejected prediction request: {}", detail);
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody::new(err.to_string())))
                .into_response();
        }
        PredictError::UnsupportedVersion(version) => {
            warn!("Rejected request with api version {:?}", version);
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string())))
                .into_response();
        }
    };

    let detail = if expose_details {
        format!("{} {}", message, err)
    } else {
        message.to_string()
    };
    (status, Json(ErrorBody::new(detail))).into_response()
}
