pub mod kmeans;

pub use kmeans::KMeansModel;

use anyhow::Result;
use common::api::{ClusterId, FeatureVector, FEATURE_COUNT};
use ndarray::{Array1, Array2, ArrayView2};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// A fitted clustering estimator: one cluster index per input row.
pub trait ClusterModel: Send + Sync {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<usize>>;
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("modelo de clusterização não carregado")]
    ModelUnavailable,
    #[error("falha na inferência do modelo: {0}")]
    Inference(String),
    #[error("requisição de predição inválida: {0}")]
    Validation(String),
    #[error("versão de API não suportada: {0}")]
    UnsupportedVersion(String),
}

/// Outcome of the one load attempt made at startup. Never changes afterwards.
pub enum ModelState {
    Loaded(Arc<dyn ClusterModel>),
    Failed { reason: String },
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Loaded(_) => f.write_str("Loaded"),
            ModelState::Failed { reason } => f.debug_struct("Failed").field("reason", reason).finish(),
        }
    }
}

impl ModelState {
    /// Load the model file at `path`. A failure is recorded, not returned, so the process can
    /// keep serving health checks.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match KMeansModel::from_file(path) {
            Ok(model) => {
                info!(
                    "Clustering model loaded from {:?}: {} clusters",
                    path,
                    model.n_clusters()
                );
                ModelState::Loaded(Arc::new(model))
            }
            Err(e) => {
                error!("Failed to load clustering model from {:?}: {:#}", path, e);
                ModelState::Failed {
                    reason: format!("{e:#}"),
                }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<ClusterId, PredictError> {
        let model = match self {
            ModelState::Loaded(model) => model,
            ModelState::Failed { .. } => return Err(PredictError::ModelUnavailable),
        };

        let rows = Array2::from_shape_vec((1, FEATURE_COUNT), features.to_vec())
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let labels = model
            .predict(rows.view())
            .map_err(|e| PredictError::Inference(format!("{e:#}")))?;

        let label = labels
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("model returned no prediction".to_string()))?;
        ClusterId::try_from(label).map_err(|_| {
            PredictError::Inference(format!("cluster index {} does not fit an integer id", label))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records the rows it is called with and answers with a fixed label.
    struct Recording {
        label: usize,
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<Vec<f64>>>,
    }

    impl ClusterModel for Recording {
        fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .extend(rows.outer_iter().map(|r| r.to_vec()));
            Ok(Array1::from_elem(rows.nrows(), self.label))
        }
    }

    struct Broken;

    impl ClusterModel for Broken {
        fn predict(&self, _rows: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
            bail!("estimator exploded")
        }
    }

    struct Empty;

    impl ClusterModel for Empty {
        fn predict(&self, _rows: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
            Ok(Array1::from(Vec::new()))
        }
    }

    fn features() -> FeatureVector {
        FeatureVector::new([1000.0, 500.0, 0.0, 3000.0, 200.0])
    }

    #[test]
    fn test_predict_builds_single_ordered_row() {
        let model = Arc::new(Recording {
            label: 4,
            calls: AtomicUsize::new(0),
            seen: Default::default(),
        });
        let state = ModelState::Loaded(model.clone());

        assert_eq!(state.predict(&features()).unwrap(), 4);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *model.seen.lock().unwrap(),
            vec![vec![1000.0, 500.0, 0.0, 3000.0, 200.0]]
        );
    }

    #[test]
    fn test_failed_state_never_reaches_model() {
        let state = ModelState::Failed {
            reason: "missing file".to_string(),
        };
        assert!(!state.is_loaded());
        assert!(matches!(
            state.predict(&features()),
            Err(PredictError::ModelUnavailable)
        ));
    }

    #[test]
    fn test_model_errors_become_inference_errors() {
        let state = ModelState::Loaded(Arc::new(Broken));
        match state.predict(&features()) {
            Err(PredictError::Inference(msg)) => assert!(msg.contains("estimator exploded")),
            other => panic!("unexpected result: {:?}", other),
        }

        let state = ModelState::Loaded(Arc::new(Empty));
        assert!(matches!(
            state.predict(&features()),
            Err(PredictError::Inference(_))
        ));
    }

    #[test]
    fn test_load_missing_file_marks_failed() {
        let state = ModelState::load("/nonexistent/credit_card_clusters.json");
        match state {
            ModelState::Failed { reason } => assert!(reason.contains("Failed to read model file")),
            ModelState::Loaded(_) => panic!("model should not load"),
        }
    }

    #[test]
    fn test_load_shipped_model() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/models/credit_card_clusters.json");
        let state = ModelState::load(path);
        assert!(state.is_loaded());
        let first = state.predict(&features()).unwrap();
        assert!((0..5).contains(&first));
        assert_eq!(state.predict(&features()).unwrap(), first);
    }
}
