//! Snake Store command-line front end
//!
//! Thin client of the store: one store call per invocation, JSON on stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::error;
use serde_json::json;

use snake_store::{ScoreSubmission, SpeedSubmission, StateStore, StoreConfig, StoreError};

#[derive(Debug, Parser)]
#[command(name = "snake-store", about = "Snake game speed setting and leaderboard")]
struct Cli {
    /// State file (defaults to $SNAKE_STORE_PATH, then ./snake_config.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show speed and leaderboard
    Show {
        /// Print the raw stored state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a score
    Record {
        score: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Set the game speed (1-10, other values are ignored)
    Speed { speed: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(StoreError::Validation(v)) = e.downcast_ref::<StoreError>() {
                println!("{}", json!({ "success": false, "error": v.to_string() }));
            }
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Default level `info` (`debug` with -v); RUST_LOG overrides
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = StoreConfig::resolve(cli.state.as_deref());
    let store = StateStore::new(config);

    match cli.command {
        Command::Show { json } => {
            let state = store.get_state();
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("Speed: {}", state.speed);
                if state.highscores.is_empty() {
                    println!("No high scores yet");
                }
                for (rank, row) in state.highscores.display_rows().iter().enumerate() {
                    println!(
                        "{:>2}. {:>8}  {:<16} {}",
                        rank + 1,
                        row.score,
                        row.name,
                        row.timestamp
                    );
                }
            }
        }
        Command::Record { score, name } => {
            let request = ScoreSubmission::from_text(&score, name.as_deref());
            let highscores = store
                .submit_score(&request)
                .with_context(|| format!("recording score {score:?}"))?;
            println!("{}", json!({ "success": true, "highscores": highscores }));
        }
        Command::Speed { speed } => {
            let request = match speed.trim().parse::<i64>() {
                Ok(level) => SpeedSubmission::new(level),
                Err(_) => SpeedSubmission::new(speed.as_str()),
            };
            let success = store
                .submit_speed(&request)
                .with_context(|| format!("setting speed {speed:?}"))?;
            println!("{}", json!({ "success": success }));
        }
    }
    Ok(())
}
