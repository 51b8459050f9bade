//! Headless search host for stdin/stdout JSON communication.
//!
//! Reads `CommandEnvelope` messages as newline-delimited JSON from stdin,
//! drives a search controller against the configured service, and writes
//! `ResponseEnvelope` and `EventEnvelope` messages to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.
//!
//! Usage: `sift-host [--config <path>]`

use anyhow::Context;
use sift::host::run_stdio_bridge;
use sift::{SearchClient, SearchController, SiftConfig};
use std::path::PathBuf;

fn config_path_from_args() -> anyhow::Result<PathBuf> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args.next().context("--config requires a path")?;
                path = Some(PathBuf::from(value));
            }
            other => anyhow::bail!("unknown argument `{other}` (usage: sift-host [--config <path>])"),
        }
    }
    Ok(path.unwrap_or_else(SiftConfig::default_config_path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_path_from_args()?;
    let config = SiftConfig::load_or_default(&path)
        .and_then(SiftConfig::with_env_overrides)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config.validate()?;

    // Initialise tracing to stderr only (stdout is reserved for the JSON
    // protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .init();

    tracing::info!(
        base_url = %config.client.base_url,
        config = %path.display(),
        "sift-host starting"
    );

    let client = SearchClient::new(config.client.clone())?;
    let controller = SearchController::new(client, config.controller);

    run_stdio_bridge(controller).await.map_err(|e| {
        tracing::error!(error = %e, "sift-host exited with error");
        anyhow::anyhow!("sift-host failed: {e}")
    })?;

    tracing::info!("sift-host shut down cleanly");
    Ok(())
}
