use crate::error::EvaluateError;
use anyhow::Result;
use common::api::{
    ClusterId, FeatureVector, PredictRequest, PredictResponse, API_VERSION, API_VERSION_HEADER,
};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// The model server's prediction operation, as seen from the gateway.
pub trait InferenceClient: Send + Sync + 'static {
    fn predict(
        &self,
        features: &FeatureVector,
    ) -> impl Future<Output = Result<ClusterId, EvaluateError>> + Send;
}

/// Calls `POST {base_url}/predict` on the model server. One attempt per call, no retry.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
}

impl HttpInferenceClient {
    /// `timeout` bounds the whole call; `None` waits as long as the server takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl InferenceClient for HttpInferenceClient {
    fn predict(
        &self,
        features: &FeatureVector,
    ) -> impl Future<Output = Result<ClusterId, EvaluateError>> + Send {
        let url = format!("{}/predict", self.base_url);
        let body = PredictRequest::from(*features);
        async move {
            debug!("POST {}", url);
            // connect failures and timeouts both mean the service could not be reached
            let response = self
                .client
                .post(&url)
                .header(API_VERSION_HEADER, API_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| EvaluateError::UpstreamUnreachable(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EvaluateError::UpstreamError {
                    status: status.as_u16(),
                    body,
                });
            }

            let prediction: PredictResponse = response.json().await.map_err(|e| {
                EvaluateError::Internal(format!("invalid prediction from inference service: {}", e))
            })?;
            Ok(prediction.cluster)
        }
    }
}
