use anyhow::{Context, Result};
use common::api::ClusterId;
use std::collections::HashMap;

/// Text returned for a cluster id the table does not know.
pub const UNKNOWN_CLUSTER: &str = "Cluster desconhecido.";

/// Cluster id to customer-facing description. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: HashMap<ClusterId, String>,
}

impl LabelTable {
    pub fn load() -> Result<Self> {
        let raw = include_str!("labels.json");
        let labels: HashMap<ClusterId, String> =
            serde_json::from_str(raw).context("Failed to parse embedded cluster labels")?;
        Ok(Self { labels })
    }

    /// Never fails: an unknown id is a data anomaly, not a request error.
    pub fn label(&self, cluster: ClusterId) -> &str {
        self.labels
            .get(&cluster)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CLUSTER)
    }
}
