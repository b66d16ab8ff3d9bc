use anyhow::Result;
use clap::Parser;
use eval_gateway::util::cmd::Args;
use eval_gateway::{EvalGateway, HttpInferenceClient, LabelTable};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    common::init_logging();

    let args = Args::parse().load_config()?;

    let labels = LabelTable::load()?;
    let inference = HttpInferenceClient::new(&args.inference_url, args.upstream_timeout())?;
    info!(
        "Forwarding predictions to {} (timeout: {:?})",
        inference.base_url(),
        args.upstream_timeout()
    );

    let gateway = Arc::new(EvalGateway::new(inference, labels, args.expose_error_details));
    gateway.run(args.port).await?;
    info!("Evaluation gateway stopped");
    Ok(())
}
