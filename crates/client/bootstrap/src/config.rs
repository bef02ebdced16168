//! Pipeline configuration loaded from the process environment.
use std::env;

use anyhow::Context;
use chain_core::Address;
use chain_evm::config::DEFAULT_CHAIN_ID;

/// Score contract deployed on Base Sepolia.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xB98B07B80A95f27A89e527785069855ad46b6630";

/// Default local proving service endpoint.
pub const DEFAULT_PROVER_URL: &str = "http://localhost:8000";

/// Everything needed to assemble the submission pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub rpc_url: String,
    pub wallet_rpc_url: String,
    pub contract: Address,
    pub chain_id: u64,
    pub paymaster_url: Option<String>,
    pub prover_url: String,
}

impl PipelineConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BRICKLES_RPC_URL` - Node RPC for ledger reads (default: Base Sepolia public RPC)
    /// - `BRICKLES_WALLET_RPC_URL` - Wallet RPC for account and batch calls (default: local)
    /// - `BRICKLES_CONTRACT_ADDRESS` - Deployed score contract (default: Base Sepolia deployment)
    /// - `BRICKLES_CHAIN_ID` - Chain id the wallet must be on (default: 84532)
    /// - `BRICKLES_PAYMASTER_URL` - Fee-sponsorship endpoint (default: none, account pays gas)
    /// - `BRICKLES_PROVER_URL` - Proving service endpoint (default: http://localhost:8000)
    pub fn from_env() -> anyhow::Result<Self> {
        let contract_raw = env::var("BRICKLES_CONTRACT_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_CONTRACT_ADDRESS.to_string());
        let contract = contract_raw
            .parse::<Address>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid BRICKLES_CONTRACT_ADDRESS `{contract_raw}`"))?;

        let chain_id = match env::var("BRICKLES_CHAIN_ID") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid BRICKLES_CHAIN_ID `{raw}`"))?,
            Err(_) => DEFAULT_CHAIN_ID,
        };

        Ok(Self {
            rpc_url: env::var("BRICKLES_RPC_URL")
                .unwrap_or_else(|_| "https://sepolia.base.org".to_string()),
            wallet_rpc_url: env::var("BRICKLES_WALLET_RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8545".to_string()),
            contract,
            chain_id,
            paymaster_url: env::var("BRICKLES_PAYMASTER_URL").ok(),
            prover_url: env::var("BRICKLES_PROVER_URL")
                .unwrap_or_else(|_| DEFAULT_PROVER_URL.to_string()),
        })
    }
}
