//! Brickles score client binary.
//!
//! Composition root for the submission pipeline: loads configuration from the
//! environment, assembles the prover, wallet, and ledger components via
//! [`client_bootstrap::PipelineBuilder`], and exposes them as subcommands.

mod commands;

use anyhow::Result;
use clap::Parser;

use client_bootstrap::{PipelineBuilder, PipelineConfig};
use commands::{Leaderboard, MyScore, Submit};

/// Verifiable score submission for Brickles.
#[derive(Parser)]
#[command(name = "brickles")]
#[command(about = "Submit and browse verified Brickles scores", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Show the current top-ranked scores
    Leaderboard(Leaderboard),

    /// Show the connected account's verified score
    MyScore(MyScore),

    /// Prove a finished session and submit it for on-chain verification
    Submit(Submit),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = PipelineConfig::from_env()?;
    let setup = PipelineBuilder::new(config).build()?;

    match cli.command {
        Command::Leaderboard(cmd) => cmd.execute(&setup).await,
        Command::MyScore(cmd) => cmd.execute(&setup).await,
        Command::Submit(cmd) => cmd.execute(&setup).await,
    }
}
