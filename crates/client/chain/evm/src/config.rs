//! Chain endpoint and deployment configuration.

use chain_core::Address;

/// Base Sepolia, the chain the score contract is deployed on.
pub const DEFAULT_CHAIN_ID: u64 = 84532;

/// Static configuration for one chain deployment.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Node RPC endpoint for read-only `eth_call` queries.
    pub rpc_url: String,

    /// Wallet RPC endpoint handling account, capability, and batch-call
    /// requests. Distinct from the node endpoint; the wallet owns signing.
    pub wallet_rpc_url: String,

    /// Deployed score contract.
    pub contract: Address,

    /// Chain the wallet is expected to operate on.
    pub chain_id: u64,

    /// Fee-sponsorship service endpoint, if one is configured.
    pub paymaster_url: Option<String>,
}

impl ChainConfig {
    /// `chainId` formatted the way EIP-5792 payloads expect it.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_renders_as_hex_quantity() {
        let config = ChainConfig {
            rpc_url: String::new(),
            wallet_rpc_url: String::new(),
            contract: Address::ZERO,
            chain_id: DEFAULT_CHAIN_ID,
            paymaster_url: None,
        };
        assert_eq!(config.chain_id_hex(), "0x14a34");
    }
}
