use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::api::ErrorBody;
use thiserror::Error;
use tracing::{debug, error};

/// Ways an evaluation can fail. An unknown cluster id is not one of them.
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("dados do cliente inválidos: {0}")]
    Validation(String),

    #[error("inference service unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("inference service returned status {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("unexpected error: {0}")]
    Internal(String),
}

impl EvaluateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EvaluateError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable text shown to the caller. Internal detail goes to the log instead.
    pub fn client_message(&self) -> String {
        match self {
            EvaluateError::Validation(_) => self.to_string(),
            EvaluateError::UpstreamUnreachable(_) => {
                "Não foi possível conectar ao serviço de avaliação de ML.".to_string()
            }
            EvaluateError::UpstreamError { .. } => "Erro no serviço de avaliação de ML.".to_string(),
            EvaluateError::Internal(_) => {
                "Ocorreu um erro inesperado durante a análise.".to_string()
            }
        }
    }

    fn log(&self) {
        match self {
            EvaluateError::Validation(detail) => debug!("Rejected customer data: {}", detail),
            EvaluateError::UpstreamUnreachable(detail) => {
                error!("Error communicating with the inference service: {}", detail)
            }
            EvaluateError::UpstreamError { status, body } => {
                error!("Inference service error: {} - {}", status, body)
            }
            EvaluateError::Internal(detail) => error!("Unexpected error during evaluation: {}", detail),
        }
    }

    /// Log the failure and build the `{detail}` response. With `expose_details` the internal
    /// error text is appended for diagnostics.
    pub fn into_response_with(self, expose_details: bool) -> Response {
        self.log();
        let mut detail = self.client_message();
        if expose_details && !matches!(self, EvaluateError::Validation(_)) {
            detail = format!("{} Erro: {}", detail, self);
        }
        (self.status_code(), Json(ErrorBody::new(detail))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            EvaluateError::Validation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            EvaluateError::UpstreamUnreachable("refused".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            EvaluateError::UpstreamError {
                status: 503,
                body: String::new()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            EvaluateError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message_hides_internal_detail() {
        let err = EvaluateError::UpstreamUnreachable("tcp connect error: 10.0.0.7:8001".into());
        assert!(!err.client_message().contains("10.0.0.7"));

        let err = EvaluateError::UpstreamError {
            status: 500,
            body: "Traceback ...".into(),
        };
        assert!(!err.client_message().contains("Traceback"));
    }
}
