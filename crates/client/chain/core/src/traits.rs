//! Wallet and ledger abstraction traits.

use async_trait::async_trait;

use crate::types::{
    Address, ContractCall, ScoreRecord, SubmissionCapabilities, TxHash, WalletCapabilities,
};

/// Dispatch errors. All variants are terminal for the current submission
/// attempt; a fresh user-initiated submission is the only retry path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("no wallet connected on the target chain")]
    WalletNotConnected,

    #[error("proof data is incomplete and cannot be submitted")]
    InvalidProof,

    #[error("wallet/relay rejected the dispatch: {message}")]
    Relay { message: String },
}

/// Ledger read errors. Reads are side-effect free, so callers degrade to a
/// "no data" display instead of blocking on these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger query failed: {0}")]
    Network(String),

    #[error("ledger returned malformed data: {0}")]
    Decode(String),
}

/// Wallet provider integration.
///
/// Connection state is process-wide and owned exclusively by the provider;
/// the pipeline reads it but never mutates it. Capability discovery is
/// re-queried whenever a dispatch is prepared, so account/chain changes are
/// picked up without explicit invalidation.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Currently connected account, if any.
    async fn account(&self) -> Option<Address>;

    /// Chain the wallet is currently operating on.
    fn chain_id(&self) -> u64;

    /// Fee-sponsorship capabilities advertised by the wallet.
    ///
    /// A wallet that cannot answer the capability query simply advertises
    /// nothing; that degrades dispatch to account-paid gas rather than
    /// failing it.
    async fn capabilities(&self) -> WalletCapabilities;

    /// Submit a batch of contract calls through the wallet/relay.
    ///
    /// Resolves with the transaction hash once the relay has broadcast, or a
    /// [`DispatchError::Relay`] carrying the wallet-supplied message. No
    /// internal retry either way.
    async fn send_calls(
        &self,
        calls: Vec<ContractCall>,
        capabilities: &SubmissionCapabilities,
    ) -> Result<TxHash, DispatchError>;
}

/// Read-only queries against the score ledger contract.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Ranked top scores, in the ledger's canonical order. May hold fewer
    /// than the display limit when the ledger is young or empty.
    async fn top_scores(&self) -> Result<Vec<ScoreRecord>, LedgerError>;

    /// The given player's personal record, if one exists.
    async fn player_score(&self, player: Address) -> Result<Option<ScoreRecord>, LedgerError>;
}
