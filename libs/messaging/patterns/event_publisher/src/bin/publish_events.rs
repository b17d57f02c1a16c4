//! Publish a file of events to the configured endpoint
//!
//! Usage:
//!   publish-events --input prices.json --event-type FxSpotPriceChanged
//!   publish-events --config config/publisher.toml --input prices.json \
//!       --event-type FxSpotPriceChanged --topic fx-prices
//!
//! The input file holds a JSON array; each element becomes one event. The
//! endpoint and key come from the config file when both are set, otherwise
//! from `VV_EVENT_ENDPOINT` and `VV_EVENT_KEY`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use event_publisher::{
    EnvSecretProvider, EventPublisher, PublishError, SecretProvider, StaticSecretProvider,
};
use publisher_config::{load_config, PublisherConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "publish-events")]
#[command(about = "Publish domain events in batches")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment overlay (config/environments/<name>.toml)
    #[arg(short, long)]
    environment: Option<String>,

    /// JSON file containing an array of event payloads
    #[arg(short, long)]
    input: PathBuf,

    /// Event type name, e.g. FxSpotPriceChanged
    #[arg(short = 't', long)]
    event_type: String,

    /// Explicit topic; derived from the event type when omitted
    #[arg(long)]
    topic: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), args.environment.as_deref())
        .context("Failed to load publisher configuration")?;

    init_logging(&args, &config);
    info!(config = ?config, "Loaded publisher configuration");

    let payloads = read_payloads(&args.input)?;
    info!(
        count = payloads.len(),
        input = %args.input.display(),
        "Read event payloads"
    );

    let secrets: Box<dyn SecretProvider> = match (&config.endpoint, &config.key) {
        (Some(endpoint), Some(key)) => Box::new(StaticSecretProvider::new(endpoint, key)),
        _ => Box::new(EnvSecretProvider),
    };
    let publisher = EventPublisher::from_secrets(secrets.as_ref(), &config)
        .await
        .context("Failed to create event publisher")?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received shutdown signal, cancelling publish");
            signal_token.cancel();
        }
    });

    match publisher
        .publish_many(&payloads, &args.event_type, args.topic.as_deref(), &cancel)
        .await
    {
        Ok(outcome) => {
            info!(
                sent = outcome.sent,
                batches = outcome.batches,
                "All events published"
            );
            Ok(())
        }
        Err(PublishError::Cancelled) => {
            warn!("Publish cancelled before completion");
            bail!("publish cancelled")
        }
        Err(e) => {
            error!(error = %e, "Publish failed");
            Err(e.into())
        }
    }
}

fn read_payloads(path: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} must contain a JSON array of events", path.display()))
}

fn init_logging(args: &Args, config: &PublisherConfig) {
    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if args.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
