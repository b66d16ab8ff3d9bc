//! Version 1 of the request/response types shared by the gateway and the model server.
//!
//! The model was trained on five columns in a fixed order. [`FeatureVector`] is the only
//! place that order is written down; every conversion goes through it.

use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

pub const FEATURE_COUNT: usize = 5;

/// Column order the clustering model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "balance",
    "purchases",
    "cash_advance",
    "credit_limit",
    "payments",
];

pub type ClusterId = i64;

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    let mut err = ValidationError::new("finite");
    err.message = Some("deve ser um número finito".into());
    Err(err)
}

/// Form fields from the front end may arrive as `"1000"` instead of `1000`.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("número inválido: {:?}", text))),
    }
}

/// Customer data as posted to the gateway's `/avaliar` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerProfile {
    pub name: String,
    #[serde(deserialize_with = "number_or_string")]
    #[validate(custom(function = "validate_finite"))]
    pub balance: f64,
    #[serde(deserialize_with = "number_or_string")]
    #[validate(custom(function = "validate_finite"))]
    pub purchases: f64,
    #[serde(deserialize_with = "number_or_string")]
    #[validate(custom(function = "validate_finite"))]
    pub cash_advance: f64,
    #[serde(deserialize_with = "number_or_string")]
    #[validate(custom(function = "validate_finite"))]
    pub credit_limit: f64,
    #[serde(deserialize_with = "number_or_string")]
    #[validate(custom(function = "validate_finite"))]
    pub payments: f64,
}

impl CustomerProfile {
    pub fn features(&self) -> FeatureVector {
        FeatureVector::new([
            self.balance,
            self.purchases,
            self.cash_advance,
            self.credit_limit,
            self.payments,
        ])
    }
}

/// Ordered model input. See [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// Body of `POST /predict` on the model server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(custom(function = "validate_finite"))]
    pub balance: f64,
    #[validate(custom(function = "validate_finite"))]
    pub purchases: f64,
    #[validate(custom(function = "validate_finite"))]
    pub cash_advance: f64,
    #[validate(custom(function = "validate_finite"))]
    pub credit_limit: f64,
    #[validate(custom(function = "validate_finite"))]
    pub payments: f64,
}

impl From<FeatureVector> for PredictRequest {
    fn from(features: FeatureVector) -> Self {
        let [balance, purchases, cash_advance, credit_limit, payments] = features.0;
        Self {
            balance,
            purchases,
            cash_advance,
            credit_limit,
            payments,
        }
    }
}

impl From<PredictRequest> for FeatureVector {
    fn from(req: PredictRequest) -> Self {
        FeatureVector::new([
            req.balance,
            req.purchases,
            req.cash_advance,
            req.credit_limit,
            req.payments,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub cluster: ClusterId,
}

/// Final answer of the gateway. Field names on the wire are the ones the front end reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "nome")]
    pub name: String,
    pub cluster: ClusterId,
    #[serde(rename = "resposta")]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayHealth {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHealth {
    pub status: String,
    pub model_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ana() -> CustomerProfile {
        CustomerProfile {
            name: "Ana".to_string(),
            balance: 1000.0,
            purchases: 500.0,
            cash_advance: 0.0,
            credit_limit: 3000.0,
            payments: 200.0,
        }
    }

    #[test]
    fn test_features_keep_trained_order() {
        let profile = CustomerProfile {
            name: "x".to_string(),
            balance: 1.5,
            purchases: 2.25,
            cash_advance: 3.125,
            credit_limit: 4.0625,
            payments: 5.03125,
        };
        assert_eq!(
            profile.features().as_array(),
            &[1.5, 2.25, 3.125, 4.0625, 5.03125]
        );
    }

    #[test]
    fn test_predict_request_matches_feature_order() {
        let features = ana().features();
        let req = PredictRequest::from(features);
        let value = serde_json::to_value(req).unwrap();
        for (name, expected) in FEATURE_NAMES.iter().zip(features.as_array()) {
            assert_eq!(value[*name].as_f64(), Some(*expected), "field {}", name);
        }
        assert_eq!(FeatureVector::from(req), features);
    }

    #[test]
    fn test_feature_values_survive_json_exactly() {
        // values whose shortest decimal form needs exact parsing to come back bit for bit
        let awkward = [
            1.0715660391465826e-75,
            -1.81996730402717e-179,
            -1.603964615428183e143,
            0.1 + 0.2,
            f64::MIN_POSITIVE,
            f64::MAX,
        ];
        for window in awkward.windows(FEATURE_COUNT) {
            let features = FeatureVector::new(window.try_into().unwrap());
            let text = serde_json::to_string(&PredictRequest::from(features)).unwrap();
            let back: PredictRequest = serde_json::from_str(&text).unwrap();
            let received = FeatureVector::from(back);
            for (sent, got) in features.as_array().iter().zip(received.as_array()) {
                assert_eq!(sent.to_bits(), got.to_bits(), "{} came back as {}", sent, got);
            }
        }
    }

    #[test]
    fn test_profile_accepts_numeric_strings() {
        let body = json!({
            "name": "Ana", "balance": "1000", "purchases": " 500.5 ",
            "cash_advance": 0, "credit_limit": 3000.0, "payments": "2e2"
        });
        let profile: CustomerProfile = serde_json::from_value(body).unwrap();
        assert_eq!(
            profile.features().as_array(),
            &[1000.0, 500.5, 0.0, 3000.0, 200.0]
        );

        let body = json!({
            "name": "Ana", "balance": "1000", "purchases": 1.0,
            "cash_advance": 0, "credit_limit": 1.0, "payments": "NaN"
        });
        let profile: CustomerProfile = serde_json::from_value(body).unwrap();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_profile_requires_numeric_fields() {
        let missing = json!({"name": "Ana", "balance": 1.0});
        assert!(serde_json::from_value::<CustomerProfile>(missing).is_err());

        let wrong_type = json!({
            "name": "Ana", "balance": "a lot", "purchases": 1.0,
            "cash_advance": 0.0, "credit_limit": 1.0, "payments": 1.0
        });
        assert!(serde_json::from_value::<CustomerProfile>(wrong_type).is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(ana().validate().is_ok());

        let mut profile = ana();
        profile.payments = f64::NAN;
        assert!(profile.validate().is_err());

        let req = PredictRequest {
            balance: f64::INFINITY,
            ..PredictRequest::from(ana().features())
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_evaluation_result_wire_names() {
        let result = EvaluationResult {
            name: "Ana".to_string(),
            cluster: 4,
            label: "texto".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"nome": "Ana", "cluster": 4, "resposta": "texto"})
        );
    }
}
