//! EmotiBot Relay Server
//!
//! Run with: cargo run --bin emotibot-relay
//!
//! # Configuration
//!
//! Loaded from `--config`, else the first of
//! `~/.config/emotibot-relay/config.toml`, `/etc/emotibot-relay/config.toml`,
//! `./config.toml`. Environment variables override the file:
//! - `EMOTIBOT_HOST`, `EMOTIBOT_PORT`
//! - `EMOTIBOT_DEFAULT_MOOD`
//! - `EMOTIBOT_HEARTBEAT_SECS`
//! - `EMOTIBOT_LOG_LEVEL`, `EMOTIBOT_LOG_FORMAT`
//! - `RUST_LOG`: takes precedence over the configured level
//!
//! A config file that exists but is invalid stops startup.

use anyhow::Context;
use clap::Parser;
use emotibot_relay::api::{serve, AppState};
use emotibot_relay::config::{generate_default_config, Config, LoggingConfig};
use emotibot_relay::store::MoodStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "emotibot-relay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mood relay service with HTTP and SSE support")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    // Tracing is configured from the file, so load errors are returned
    // rather than logged
    let (mut config, source) = match &args.config {
        Some(path) => {
            let config = Config::load_with_env(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?;
            (config, Some(path.clone()))
        }
        None => Config::load_first(&Config::default_paths())?,
    };

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    init_tracing(&config.logging);

    tracing::info!("Starting EmotiBot relay v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("No config file found, using defaults with environment overrides"),
    }

    let store = Arc::new(MoodStore::new(config.store.clone())?);
    tracing::info!(
        default_mood = %store.config().default_mood,
        channel_capacity = store.config().channel_capacity,
        max_subscribers = store.config().max_subscribers,
        heartbeat_secs = config.stream.heartbeat_interval_secs,
        "Relay configured"
    );
    let state = AppState::with_heartbeat(store, config.stream.heartbeat_interval());

    serve(state, &config.server).await?;

    tracing::info!("EmotiBot relay stopped");
    Ok(())
}

/// Initialize tracing from the logging config
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("emotibot_relay={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
