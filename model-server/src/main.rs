use anyhow::Result;
use clap::Parser;
use model_server::model::ModelState;
use model_server::server::ModelServer;
use model_server::util::cmd::Args;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    common::init_logging();

    let args = Args::parse().load_config()?;

    // the single load attempt; a failure leaves the server up but unavailable
    let model = ModelState::load(&args.model_path);
    let server = Arc::new(ModelServer::new(model, args.expose_error_details));

    server.run(args.port).await?;
    info!("Model server stopped");
    Ok(())
}
