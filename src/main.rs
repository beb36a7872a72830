use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bge_reranker_server::cli::Cli;
use bge_reranker_server::{serve, shutdown_signal, Container, ContainerConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, takes precedence over --log-level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cli.worker_threads())
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    info!(
        "Starting BGE Reranker API Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let container = Arc::new(Container::new(ContainerConfig {
        model: cli.model_config(),
        mock_model: cli.mock_model,
    }));

    // The model is loaded before the listener exists, so no request can race it.
    if container.load_model().await {
        info!("Model ready: {}", container.model_config().model_name);
    } else {
        warn!("Serving in degraded mode; /health reports the model as unloaded");
    }

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", cli.host, cli.port))?;

    serve(listener, container, shutdown_signal()).await?;

    Ok(())
}
