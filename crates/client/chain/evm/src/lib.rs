//! EVM JSON-RPC backend for the chain abstraction.
//!
//! Implements [`chain_core::WalletProvider`] against an EIP-5792 capable
//! wallet RPC endpoint (`wallet_getCapabilities` / `wallet_sendCalls`) and
//! [`chain_core::LedgerReader`] against the score contract via `eth_call`.
//! All byte arguments cross this boundary hex-encoded with a `0x` prefix.

pub mod config;
pub mod ledger;
pub mod rpc;
pub mod wallet;

pub use config::ChainConfig;
pub use ledger::LedgerContract;
pub use rpc::{RpcClient, RpcError};
pub use wallet::RpcWallet;
