//! Read-only ledger contract queries via `eth_call`.

use async_trait::async_trait;

use chain_core::abi;
use chain_core::{Address, ContractCall, LedgerError, LedgerReader, ScoreRecord};

use crate::rpc::{RpcClient, decode_hex_result};

/// [`LedgerReader`] backed by the deployed score contract.
pub struct LedgerContract {
    rpc: RpcClient,
    contract: Address,
}

impl LedgerContract {
    pub fn new(rpc: RpcClient, contract: Address) -> Self {
        Self { rpc, contract }
    }

    async fn eth_call(&self, call: ContractCall) -> Result<Vec<u8>, LedgerError> {
        let params = serde_json::json!([
            {
                "to": call.to.to_string(),
                "data": format!("0x{}", hex::encode(&call.calldata)),
            },
            "latest"
        ]);

        let result = self
            .rpc
            .call("eth_call", params)
            .await
            .map_err(|err| LedgerError::Network(err.to_string()))?;

        decode_hex_result(&result).map_err(|err| LedgerError::Decode(err.to_string()))
    }
}

#[async_trait]
impl LedgerReader for LedgerContract {
    async fn top_scores(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        let data = self.eth_call(abi::top_scores_call(self.contract)).await?;
        let scores =
            abi::decode_top_scores(&data).map_err(|err| LedgerError::Decode(err.to_string()))?;
        tracing::debug!(count = scores.len(), "fetched ranked scores");
        Ok(scores)
    }

    async fn player_score(&self, player: Address) -> Result<Option<ScoreRecord>, LedgerError> {
        let data = self
            .eth_call(abi::player_score_call(self.contract, player))
            .await?;
        abi::decode_player_score(&data).map_err(|err| LedgerError::Decode(err.to_string()))
    }
}
