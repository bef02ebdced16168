//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use client_bootstrap::PipelineSetup;
use game_core::SessionResult;
use runtime::{SubmissionState, format_time_elapsed};

/// Show the current top-ranked scores.
#[derive(Parser)]
pub struct Leaderboard;

impl Leaderboard {
    pub async fn execute(&self, setup: &PipelineSetup) -> Result<()> {
        // A failed read degrades the display, it is not a command failure.
        let scores = match setup.leaderboard.refresh().await {
            Ok(scores) => scores,
            Err(err) => {
                tracing::warn!("leaderboard unavailable: {err}");
                println!("Leaderboard unavailable, try again later.");
                return Ok(());
            }
        };

        if scores.is_empty() {
            println!("No verified scores yet.");
            return Ok(());
        }

        println!("{:<5} {:<44} {:>8} {:>10}", "Rank", "Player", "Blocks", "Time (s)");
        for (rank, score) in scores.iter().enumerate() {
            println!(
                "{:<5} {:<44} {:>8} {:>10}",
                rank + 1,
                score.player.to_string(),
                score.blocks_destroyed,
                format_time_elapsed(score.time_elapsed),
            );
        }
        Ok(())
    }
}

/// Show the connected account's verified score.
#[derive(Parser)]
pub struct MyScore;

impl MyScore {
    pub async fn execute(&self, setup: &PipelineSetup) -> Result<()> {
        let Some(player) = setup.wallet.account().await else {
            println!("No wallet connected.");
            return Ok(());
        };

        match setup.leaderboard.refresh_player(player).await {
            Ok(Some(score)) => {
                println!(
                    "{player}: {} blocks in {} s",
                    score.blocks_destroyed,
                    format_time_elapsed(score.time_elapsed),
                );
            }
            Ok(None) => println!("{player} has no verified score yet."),
            Err(err) => {
                tracing::warn!("score lookup failed: {err}");
                println!("Score unavailable, try again later.");
            }
        }
        Ok(())
    }
}

/// Prove a finished session and submit it for on-chain verification.
#[derive(Parser)]
pub struct Submit {
    /// Path to a finalized session replay (JSON)
    pub replay: PathBuf,
}

impl Submit {
    pub async fn execute(&self, setup: &PipelineSetup) -> Result<()> {
        let raw = std::fs::read_to_string(&self.replay)
            .with_context(|| format!("cannot read replay file {}", self.replay.display()))?;
        let session: SessionResult = serde_json::from_str(&raw)
            .with_context(|| format!("invalid session replay in {}", self.replay.display()))?;

        println!(
            "Submitting session: {} actions, {} blocks, {} s",
            session.action_log.len(),
            session.blocks_destroyed,
            format_time_elapsed(session.time_elapsed_ms),
        );

        // Stream in-flight phases while the submission runs. Terminal states
        // are reported from the submit result below.
        let mut states = setup.machine.subscribe();
        let progress = tokio::spawn(async move {
            while states.changed().await.is_ok() {
                let state = states.borrow_and_update().clone();
                match state {
                    SubmissionState::AwaitingProof => println!("Requesting proof..."),
                    SubmissionState::AwaitingRelay => println!("Dispatching verification call..."),
                    _ => break,
                }
            }
        });

        let outcome = setup.machine.submit(session).await;
        progress.abort();

        let tx_hash = outcome.map_err(|err| anyhow::anyhow!("submission failed: {err}"))?;
        println!("Confirmed: {tx_hash}");

        // Show the refreshed standings after confirmation.
        Leaderboard.execute(setup).await
    }
}
