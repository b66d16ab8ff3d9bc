use anyhow::{Context, Result};
use clap::Parser;
use common::config::load_toml;
use serde::Deserialize;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Credit-card clustering model server")]
pub struct Args {
    /// TOML file whose values replace the command-line ones.
    #[arg(short('f'), long)]
    pub config: Option<String>,

    #[arg(short, long, default_value_t = 8001, env = "MODEL_SERVER_PORT")]
    pub port: u16,

    /// Fitted clustering model (centroids JSON).
    #[arg(long, default_value = "models/credit_card_clusters.json", env = "MODEL_PATH")]
    pub model_path: String,

    /// Append internal error detail to error responses. Diagnostics only.
    #[arg(long)]
    pub expose_error_details: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    port: Option<u16>,
    model_path: Option<String>,
    expose_error_details: Option<bool>,
}

impl Args {
    pub fn load_config(&self) -> Result<Args> {
        let Some(config_path) = &self.config else {
            return Ok(self.clone());
        };

        let file: FileConfig = load_toml(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path))?;
        info!("Loaded model server config from {}", config_path);

        Ok(Args {
            config: Some(config_path.clone()),
            port: file.port.unwrap_or(self.port),
            model_path: file.model_path.unwrap_or_else(|| self.model_path.clone()),
            expose_error_details: file
                .expose_error_details
                .unwrap_or(self.expose_error_details),
        })
    }
}
