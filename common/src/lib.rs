pub mod api;
pub mod config;

use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    // DEBUG for debug builds, INFO for release builds; RUST_LOG wins when set
    #[cfg(not(debug_assertions))]
    let default_level = Level::INFO;
    #[cfg(debug_assertions)]
    let default_level = Level::DEBUG;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!cfg!(windows))
        .with_target(false)
        .with_thread_ids(cfg!(debug_assertions))
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .compact()
        .init();

    debug!("Logging initialized");
}

/// Resolves once the process is asked to stop (SIGTERM/SIGINT, or ctrl-c off unix).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                }
            }
            _ => {
                tracing::warn!("Failed to install unix signal listeners, falling back to ctrl-c");
                wait_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_ctrl_c().await;
}

async fn wait_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {}", e);
        // never resolve, otherwise the server would stop right away
        std::future::pending::<()>().await;
    }
    info!("Received ctrl-c, shutting down gracefully...");
}
