use anyhow::{Context, Result};
use clap::Parser;
use common::config::load_toml;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Credit-card customer evaluation gateway")]
pub struct Args {
    /// TOML file whose values replace the command-line ones.
    #[arg(short('f'), long)]
    pub config: Option<String>,

    #[arg(short, long, default_value_t = 8000, env = "GATEWAY_PORT")]
    pub port: u16,

    /// Base URL of the model server.
    #[arg(long, default_value = "http://127.0.0.1:8001", env = "INFERENCE_URL")]
    pub inference_url: String,

    /// Give up on the model server after this many seconds. Unset waits indefinitely.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Append internal error detail to error responses. Diagnostics only.
    #[arg(long)]
    pub expose_error_details: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    port: Option<u16>,
    inference_url: Option<String>,
    upstream_timeout_secs: Option<u64>,
    expose_error_details: Option<bool>,
}

impl Args {
    pub fn load_config(&self) -> Result<Args> {
        let Some(config_path) = &self.config else {
            return Ok(self.clone());
        };

        let file: FileConfig = load_toml(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path))?;
        info!("Loaded gateway config from {}", config_path);

        Ok(Args {
            config: Some(config_path.clone()),
            port: file.port.unwrap_or(self.port),
            inference_url: file
                .inference_url
                .unwrap_or_else(|| self.inference_url.clone()),
            upstream_timeout_secs: file.upstream_timeout_secs.or(self.upstream_timeout_secs),
            expose_error_details: file
                .expose_error_details
                .unwrap_or(self.expose_error_details),
        })
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}
