//! Leaderboard reads and score presentation helpers.

use std::sync::Arc;

use chain_core::{Address, LedgerError, LedgerReader, ScoreRecord};

/// How many ranked entries the display shows.
pub const TOP_SCORES: usize = 10;

/// Pulls ranked scores from the ledger for display.
///
/// The ledger maintains the canonical ordering (blocks destroyed descending,
/// elapsed time ascending as tie-break), so reads pass it through untouched
/// apart from truncating to the display size. Fewer than [`TOP_SCORES`]
/// entries, or none at all, is a normal early-deployment state.
#[derive(Clone)]
pub struct LeaderboardSync {
    ledger: Arc<dyn LedgerReader>,
}

impl LeaderboardSync {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    /// Fetch the current top-ranked scores.
    pub async fn refresh(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        let mut scores = self.ledger.top_scores().await?;
        scores.truncate(TOP_SCORES);
        tracing::debug!(count = scores.len(), "leaderboard refreshed");
        Ok(scores)
    }

    /// Fetch one player's verified record, if they have one.
    pub async fn refresh_player(
        &self,
        player: Address,
    ) -> Result<Option<ScoreRecord>, LedgerError> {
        self.ledger.player_score(player).await
    }
}

/// Render elapsed time in thousandths as a fixed-point seconds string.
///
/// `950` renders as `"0.950"` and `12345` as `"12.345"`; the fractional part
/// is always exactly three digits.
pub fn format_time_elapsed(units: u64) -> String {
    format!("{}.{:03}", units / 1000, units % 1000)
}
