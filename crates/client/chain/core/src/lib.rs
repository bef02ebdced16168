//! Chain abstraction layer for the Brickles score pipeline.
//!
//! This crate defines what the pipeline needs from a chain, not how a
//! particular transport provides it:
//!
//! - [`WalletProvider`]: connection state, fee-sponsorship capability
//!   discovery, and batched-call submission
//! - [`LedgerReader`]: read-only queries against the score contract
//! - [`GaslessDispatcher`]: capability negotiation plus the single
//!   `verifyProof` invocation per submission
//!
//! The `abi` module carries the ledger contract's call encoding so that both
//! the real JSON-RPC backend and the in-memory mocks agree on the wire shape.
//! Mocks live in [`mock`] and are used by the orchestration layer's tests.

pub mod abi;
pub mod dispatch;
pub mod mock;
pub mod traits;
pub mod types;

pub use dispatch::GaslessDispatcher;
pub use traits::{DispatchError, LedgerError, LedgerReader, WalletProvider};
pub use types::{
    Address, ContractCall, ScoreRecord, SubmissionCapabilities, TxHash, WalletCapabilities,
};
