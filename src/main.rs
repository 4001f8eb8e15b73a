//! Replay Analytics - Main Entry Point
//!
//! Runs a JSON-lines replay stream through the engine and writes the
//! derived events as JSON lines.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use replay_analytics::config::load_config;
use replay_analytics::{
    create_event_channel_with_size, drain_events, JsonLinesSink, ReplayAdapter, RequestContext,
    ResourceOwner,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines replay stream (header line followed by frames)
    #[arg(short, long)]
    input: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Match id; generated when omitted
    #[arg(long)]
    match_id: Option<Uuid>,

    /// Tenant the derived events are attributed to
    #[arg(long, env = "APP_TENANT_ID", default_value_t = Uuid::nil())]
    tenant_id: Uuid,

    /// Client the derived events are attributed to
    #[arg(long, env = "APP_CLIENT_ID", default_value_t = Uuid::nil())]
    client_id: Uuid,

    /// Output file for derived events; stdout when omitted
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(Some(args.config.as_str()))?;

    // Initialize logging
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Replay Analytics");
    info!("Configuration file: {}", args.config);

    let match_id = args.match_id.unwrap_or_else(Uuid::new_v4);
    let request = RequestContext::new(ResourceOwner::new(args.tenant_id, args.client_id));

    let input = File::open(&args.input).with_context(|| format!("opening {}", args.input))?;
    let writer: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let (tx, rx) = create_event_channel_with_size(config.pipeline.channel_size);

    // Consumer runs on its own task; the adapter closes the queue when done
    let consumer = tokio::spawn(async move {
        let mut sink = JsonLinesSink::new(writer);
        drain_events(rx, &mut sink).await
    });

    let adapter = ReplayAdapter::new(config);
    let parsed = adapter
        .parse_reader(&request, match_id, BufReader::new(input), tx)
        .await;

    let written = consumer.await.context("consumer task panicked")??;

    match parsed {
        Ok(summary) => {
            info!(
                "Match {} done: {} rounds, {} events decoded, {} written",
                summary.match_id, summary.rounds, summary.events_decoded, written
            );
            Ok(())
        }
        Err(e) => {
            error!("Replay processing failed after {} events: {}", written, e);
            Err(e.into())
        }
    }
}
