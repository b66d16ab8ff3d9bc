//! Nearest-centroid predictor for a k-means model fitted elsewhere.
//!
//! The model file is JSON with one centroid per cluster and, when the model was fitted on
//! standardised data, the scaler that was used:
//!
//! ```json
//! { "centroids": [[...], ...], "scaler": { "mean": [...], "scale": [...] } }
//! ```

use super::ClusterModel;
use anyhow::{bail, Context, Result};
use common::api::FEATURE_COUNT;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ModelFile {
    centroids: Vec<Vec<f64>>,
    #[serde(default)]
    scaler: Option<ScalerFile>,
}

#[derive(Debug, Deserialize)]
struct ScalerFile {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Per-column `(x - mean) / scale`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Array1<f64>, scale: Array1<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            bail!(
                "scaler mean has {} columns but scale has {}",
                mean.len(),
                scale.len()
            );
        }
        if mean.iter().any(|v| !v.is_finite()) {
            bail!("scaler mean contains non-finite values");
        }
        if scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
            bail!("scaler scale must be finite and non-zero");
        }
        Ok(Self { mean, scale })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, rows: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = rows.to_owned();
        for mut row in out.rows_mut() {
            row -= &self.mean;
            row /= &self.scale;
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct KMeansModel {
    /// One row per cluster, in the same space as the (scaled) input
    centroids: Array2<f64>,
    scaler: Option<StandardScaler>,
}

impl KMeansModel {
    pub fn from_parts(centroids: Array2<f64>, scaler: Option<StandardScaler>) -> Result<Self> {
        if centroids.nrows() == 0 || centroids.ncols() == 0 {
            bail!("model has no centroids");
        }
        if centroids.iter().any(|v| !v.is_finite()) {
            bail!("centroids contain non-finite values");
        }
        if let Some(scaler) = &scaler {
            if scaler.n_features() != centroids.ncols() {
                bail!(
                    "scaler has {} columns but centroids have {}",
                    scaler.n_features(),
                    centroids.ncols()
                );
            }
        }
        Ok(Self { centroids, scaler })
    }

    /// Load a model file. The centroids must have exactly [`FEATURE_COUNT`] columns.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file: {:?}", path))?;
        let file: ModelFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model file: {:?}", path))?;

        let n_clusters = file.centroids.len();
        if let Some((idx, row)) = file
            .centroids
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != FEATURE_COUNT)
        {
            bail!(
                "centroid {} has {} values, expected {}",
                idx,
                row.len(),
                FEATURE_COUNT
            );
        }
        let flat: Vec<f64> = file.centroids.into_iter().flatten().collect();
        let centroids = Array2::from_shape_vec((n_clusters, FEATURE_COUNT), flat)?;

        let scaler = file
            .scaler
            .map(|s| StandardScaler::new(Array1::from(s.mean), Array1::from(s.scale)))
            .transpose()?;

        Self::from_parts(centroids, scaler)
    }

    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.centroids.ncols()
    }

    // Ties go to the lowest cluster index.
    fn nearest(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut closest = 0;
        let mut min_distance = f64::INFINITY;
        for (idx, centroid) in self.centroids.outer_iter().enumerate() {
            let distance: f64 = row
                .iter()
                .zip(centroid.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            if distance < min_distance {
                min_distance = distance;
                closest = idx;
            }
        }
        closest
    }
}

impl ClusterModel for KMeansModel {
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        if rows.ncols() != self.n_features() {
            bail!(
                "expected {} features per row, got {}",
                self.n_features(),
                rows.ncols()
            );
        }
        if rows.iter().any(|v| !v.is_finite()) {
            bail!("input contains non-finite values");
        }

        let labels = match &self.scaler {
            Some(scaler) => {
                let scaled = scaler.transform(rows);
                scaled.outer_iter().map(|row| self.nearest(row)).collect()
            }
            None => rows.outer_iter().map(|row| self.nearest(row)).collect(),
        };
        Ok(labels)
    }
}
