//! In-memory wallet and ledger doubles for testing without a network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::traits::{DispatchError, LedgerError, LedgerReader, WalletProvider};
use crate::types::{
    Address, ContractCall, ScoreRecord, SubmissionCapabilities, TxHash, WalletCapabilities,
};

/// Default test account.
pub const TEST_PLAYER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// Scripted wallet provider.
///
/// Records every submitted batch for assertions. Optionally writes a verified
/// score through to a [`MockLedger`] on successful dispatch, standing in for
/// the ledger contract's state update.
pub struct MockWallet {
    account: Option<Address>,
    chain_id: u64,
    capabilities: WalletCapabilities,
    fail_with: Option<String>,
    ledger_effect: Option<(Arc<MockLedger>, ScoreRecord)>,
    sent: Mutex<Vec<(Vec<ContractCall>, SubmissionCapabilities)>>,
    tx_counter: Mutex<u64>,
}

impl MockWallet {
    /// Wallet with a connected account on the given chain.
    pub fn connected(chain_id: u64) -> Self {
        Self {
            account: Some(TEST_PLAYER.parse().expect("valid test address")),
            chain_id,
            capabilities: WalletCapabilities::new(),
            fail_with: None,
            ledger_effect: None,
            sent: Mutex::new(Vec::new()),
            tx_counter: Mutex::new(0),
        }
    }

    /// Wallet with no connected account.
    pub fn disconnected(chain_id: u64) -> Self {
        Self {
            account: None,
            ..Self::connected(chain_id)
        }
    }

    /// Advertise paymaster support for the wallet's own chain.
    pub fn with_paymaster_support(mut self) -> Self {
        self.capabilities.set_paymaster(self.chain_id, true);
        self
    }

    /// Script every `send_calls` to fail with the given relay message.
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// On successful dispatch, record `score` in `ledger` the way the
    /// contract would after verifying the proof.
    pub fn with_ledger_effect(mut self, ledger: Arc<MockLedger>, score: ScoreRecord) -> Self {
        self.ledger_effect = Some((ledger, score));
        self
    }

    /// Batches submitted so far, with the capabilities they carried.
    pub fn sent_calls(&self) -> Vec<(Vec<ContractCall>, SubmissionCapabilities)> {
        self.sent.lock().unwrap().clone()
    }

    fn next_tx_hash(&self) -> TxHash {
        let mut counter = self.tx_counter.lock().unwrap();
        *counter += 1;
        TxHash(format!("0x{:064x}", *counter))
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn account(&self) -> Option<Address> {
        self.account
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn capabilities(&self) -> WalletCapabilities {
        self.capabilities.clone()
    }

    async fn send_calls(
        &self,
        calls: Vec<ContractCall>,
        capabilities: &SubmissionCapabilities,
    ) -> Result<TxHash, DispatchError> {
        if self.account.is_none() {
            return Err(DispatchError::WalletNotConnected);
        }

        self.sent
            .lock()
            .unwrap()
            .push((calls, capabilities.clone()));

        if let Some(message) = &self.fail_with {
            return Err(DispatchError::Relay {
                message: message.clone(),
            });
        }

        if let Some((ledger, score)) = &self.ledger_effect {
            ledger.submit_score(score.clone());
        }

        Ok(self.next_tx_hash())
    }
}

/// In-memory score ledger with the contract's keep-best semantics.
///
/// One record per player; a new submission supersedes the player's previous
/// record only when it outranks it under the canonical ordering. The table is
/// kept ranked so reads mirror the contract's canonical order.
#[derive(Default)]
pub struct MockLedger {
    scores: Mutex<Vec<ScoreRecord>>,
    failing: Mutex<bool>,
}

impl MockLedger {
    pub const TOP_N: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail, to exercise degraded display paths.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Record a verified score, keeping the better record per player.
    pub fn submit_score(&self, record: ScoreRecord) {
        let mut scores = self.scores.lock().unwrap();
        if let Some(existing) = scores.iter_mut().find(|s| s.player == record.player) {
            if record.outranks(existing) {
                *existing = record;
            }
        } else {
            scores.push(record);
        }
        scores.sort_by(|a, b| a.ranking_cmp(b));
    }

    fn check_available(&self) -> Result<(), LedgerError> {
        if *self.failing.lock().unwrap() {
            return Err(LedgerError::Network("mock ledger offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerReader for MockLedger {
    async fn top_scores(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        self.check_available()?;
        let scores = self.scores.lock().unwrap();
        Ok(scores.iter().take(Self::TOP_N).cloned().collect())
    }

    async fn player_score(&self, player: Address) -> Result<Option<ScoreRecord>, LedgerError> {
        self.check_available()?;
        let scores = self.scores.lock().unwrap();
        Ok(scores.iter().find(|s| s.player == player).cloned())
    }
}
