//! Sponsored submission of proof-verification calls.

use std::sync::Arc;

use prover_client::ProofData;

use crate::abi;
use crate::traits::{DispatchError, WalletProvider};
use crate::types::{Address, SubmissionCapabilities, TxHash};

/// Dispatches the `verifyProof` call through the wallet, sponsored when the
/// wallet advertises fee-sponsorship support for the active chain.
///
/// Capability negotiation happens on every dispatch so that account, chain,
/// or wallet capability changes are always reflected. A wallet without
/// sponsorship support degrades gracefully: the call is still submitted and
/// the connected account pays gas directly.
pub struct GaslessDispatcher {
    wallet: Arc<dyn WalletProvider>,
    contract: Address,
    paymaster_url: Option<String>,
}

impl GaslessDispatcher {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        contract: Address,
        paymaster_url: Option<String>,
    ) -> Self {
        Self {
            wallet,
            contract,
            paymaster_url,
        }
    }

    /// Derive the sponsorship capabilities for the current wallet state.
    pub async fn negotiate(&self) -> SubmissionCapabilities {
        let chain_id = self.wallet.chain_id();
        let advertised = self.wallet.capabilities().await;

        match (&self.paymaster_url, advertised.paymaster_supported(chain_id)) {
            (Some(url), true) => {
                tracing::debug!(chain_id, "wallet advertises paymaster support");
                SubmissionCapabilities::sponsored(url.clone())
            }
            (Some(_), false) => {
                tracing::warn!(
                    chain_id,
                    "wallet does not advertise sponsorship, submitting with account-paid gas"
                );
                SubmissionCapabilities::default()
            }
            (None, _) => SubmissionCapabilities::default(),
        }
    }

    /// Submit the verification call as a batch of one.
    ///
    /// Terminal either way: success resolves with the transaction hash,
    /// failure with the wallet/relay error. Retrying requires a fresh
    /// user-initiated submission.
    pub async fn dispatch(&self, proof: &ProofData) -> Result<TxHash, DispatchError> {
        if self.wallet.account().await.is_none() {
            return Err(DispatchError::WalletNotConnected);
        }
        if !proof.is_usable() {
            return Err(DispatchError::InvalidProof);
        }

        let capabilities = self.negotiate().await;
        let call = abi::verify_proof_call(self.contract, proof);

        tracing::info!(
            contract = %self.contract,
            sponsored = capabilities.is_sponsored(),
            calldata_len = call.calldata.len(),
            "dispatching verifyProof"
        );

        let tx_hash = self.wallet.send_calls(vec![call], &capabilities).await?;
        tracing::info!(%tx_hash, "relay broadcast verification call");
        Ok(tx_hash)
    }
}
