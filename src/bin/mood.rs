//! EmotiBot Relay CLI
//!
//! Command-line client for a running relay:
//! - Set the mood
//! - Get the current mood
//! - Stream mood changes

use chrono::Local;
use clap::{Parser, Subcommand};
use emotibot_relay::client::{ClientError, MoodClient, StreamMessage, DEFAULT_BASE_URL};
use emotibot_relay::store::Mood;

#[derive(Parser)]
#[command(name = "mood")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "EmotiBot relay CLI tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the EmotiBot relay
    #[arg(short = 'u', long = "url", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set the current mood
    Set {
        /// The mood value to set
        mood: String,
    },

    /// Get the current mood
    Get {
        /// Output raw JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Stream mood updates in real time
    Stream,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = tokio::select! {
        result = run(&cli) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopped");
            return;
        }
    };

    if let Err(e) = result {
        println!("{}", error_message(&e, &cli.base_url));
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), ClientError> {
    let client = MoodClient::new(&cli.base_url)?;

    match &cli.command {
        Commands::Set { mood } => {
            let mood = client.set_mood(mood).await?;
            println!("Mood set to: {}", mood.value);
        }

        Commands::Get { json } => {
            if *json {
                let raw = client.get_mood_raw().await?;
                let pretty = serde_json::to_string_pretty(&raw)
                    .map_err(|e| ClientError::Decode(e.to_string()))?;
                println!("{}", pretty);
            } else {
                let mood = client.get_mood().await?;
                println!("{}", mood.value);
            }
        }

        Commands::Stream => {
            println!(
                "Streaming from {}/mood/stream... (Ctrl+C to stop)",
                client.base_url()
            );

            let mut stream = client.stream().await?;
            while let Some(message) = stream.next_message().await {
                match message {
                    Ok(StreamMessage::Mood(mood)) => println!("{}", format_mood_line(&mood)),
                    Ok(StreamMessage::KeepAlive) => {}
                    Ok(StreamMessage::ServerError(error)) => println!("Server error: {}", error),
                    Err(ClientError::Decode(e)) => {
                        println!("Warning: Could not parse SSE data: {}", e)
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(())
}

/// `HH:MM:SS > value` in local time, or the bare value without a timestamp
fn format_mood_line(mood: &Mood) -> String {
    match mood.set_at() {
        Some(at) => format!(
            "{} > {}",
            at.with_timezone(&Local).format("%H:%M:%S"),
            mood.value
        ),
        None => mood.value.clone(),
    }
}

/// User-facing error line, printed to stdout
fn error_message(error: &ClientError, base_url: &str) -> String {
    match error {
        ClientError::Connect => format!("Error: Could not connect to {}", base_url),
        ClientError::Status(status) => format!("Error: HTTP {}", status),
        other => format!("Error: {}", other),
    }
}
