//! EIP-5792 wallet provider over JSON-RPC.

use async_trait::async_trait;

use chain_core::{
    Address, ContractCall, DispatchError, SubmissionCapabilities, TxHash, WalletCapabilities,
    WalletProvider,
};

use crate::rpc::RpcClient;

/// Wallet provider speaking `eth_accounts`, `wallet_getCapabilities`, and
/// `wallet_sendCalls` against a wallet RPC endpoint.
///
/// The wallet owns connection state and signing; this type only reads state
/// and forwards batch calls.
pub struct RpcWallet {
    rpc: RpcClient,
    chain_id: u64,
}

impl RpcWallet {
    pub fn new(rpc: RpcClient, chain_id: u64) -> Self {
        Self { rpc, chain_id }
    }
}

/// Parse a `wallet_getCapabilities` response.
///
/// Shape: `{ "0x14a34": { "paymasterService": { "supported": true } }, ... }`
/// keyed by hex chain id. Anything unparseable is treated as "not
/// advertised" for that chain.
fn parse_capabilities(value: &serde_json::Value) -> WalletCapabilities {
    let mut capabilities = WalletCapabilities::new();

    let Some(by_chain) = value.as_object() else {
        return capabilities;
    };
    for (chain_key, entry) in by_chain {
        let Ok(chain_id) = u64::from_str_radix(chain_key.trim_start_matches("0x"), 16) else {
            continue;
        };
        let supported = entry
            .get("paymasterService")
            .and_then(|p| p.get("supported"))
            .and_then(|s| s.as_bool())
            .unwrap_or(false);
        capabilities.set_paymaster(chain_id, supported);
    }

    capabilities
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn account(&self) -> Option<Address> {
        let result = match self.rpc.call("eth_accounts", serde_json::json!([])).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("wallet account query failed: {err}");
                return None;
            }
        };

        result
            .as_array()
            .and_then(|accounts| accounts.first())
            .and_then(|addr| addr.as_str())
            .and_then(|addr| addr.parse().ok())
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn capabilities(&self) -> WalletCapabilities {
        let Some(account) = self.account().await else {
            return WalletCapabilities::new();
        };

        match self
            .rpc
            .call(
                "wallet_getCapabilities",
                serde_json::json!([account.to_string()]),
            )
            .await
        {
            Ok(value) => parse_capabilities(&value),
            Err(err) => {
                // Capability discovery failing is not a dispatch failure;
                // it just means no sponsorship.
                tracing::warn!("capability discovery failed, assuming none: {err}");
                WalletCapabilities::new()
            }
        }
    }

    async fn send_calls(
        &self,
        calls: Vec<ContractCall>,
        capabilities: &SubmissionCapabilities,
    ) -> Result<TxHash, DispatchError> {
        let account = self
            .account()
            .await
            .ok_or(DispatchError::WalletNotConnected)?;

        let calls_json: Vec<serde_json::Value> = calls
            .iter()
            .map(|call| {
                serde_json::json!({
                    "to": call.to.to_string(),
                    "data": format!("0x{}", hex::encode(&call.calldata)),
                })
            })
            .collect();

        let mut request = serde_json::json!({
            "version": "1.0",
            "chainId": format!("0x{:x}", self.chain_id),
            "from": account.to_string(),
            "calls": calls_json,
        });
        if let Some(url) = &capabilities.paymaster_service_url {
            request["capabilities"] = serde_json::json!({
                "paymasterService": { "url": url }
            });
        }

        let result = self
            .rpc
            .call("wallet_sendCalls", serde_json::json!([request]))
            .await
            .map_err(|err| DispatchError::Relay {
                message: err.to_string(),
            })?;

        let bundle_id = result.as_str().ok_or_else(|| DispatchError::Relay {
            message: "wallet returned no call bundle identifier".to_string(),
        })?;

        Ok(TxHash(bundle_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paymaster_capability_per_chain() {
        let value = serde_json::json!({
            "0x14a34": { "paymasterService": { "supported": true } },
            "0x1": { "paymasterService": { "supported": false } },
            "0x2105": { "atomicBatch": { "supported": true } },
        });

        let caps = parse_capabilities(&value);
        assert!(caps.paymaster_supported(84532));
        assert!(!caps.paymaster_supported(1));
        assert!(!caps.paymaster_supported(8453));
    }

    #[test]
    fn malformed_capability_payload_advertises_nothing() {
        let caps = parse_capabilities(&serde_json::json!("not an object"));
        assert!(!caps.paymaster_supported(84532));

        let caps = parse_capabilities(&serde_json::json!({ "garbage": 42 }));
        assert!(!caps.paymaster_supported(84532));
    }
}
