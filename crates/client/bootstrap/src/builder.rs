//! Assembles the submission pipeline from configuration.
use std::sync::Arc;

use anyhow::Result;

use chain_core::{GaslessDispatcher, LedgerReader, WalletProvider};
use chain_evm::{LedgerContract, RpcClient, RpcWallet};
use prover_client::{HttpProverClient, ProverApi};
use runtime::{LeaderboardSync, SubmissionStateMachine};

use crate::config::PipelineConfig;

/// Builder that wires the prover, wallet, dispatcher, and ledger together.
///
/// Individual components can be swapped before `build`, which front-ends use
/// to inject doubles in place of the network-backed defaults.
pub struct PipelineBuilder {
    config: PipelineConfig,
    prover: Option<Arc<dyn ProverApi>>,
    wallet: Option<Arc<dyn WalletProvider>>,
    ledger: Option<Arc<dyn LedgerReader>>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            prover: None,
            wallet: None,
            ledger: None,
        }
    }

    pub fn prover(mut self, prover: impl ProverApi + 'static) -> Self {
        self.prover = Some(Arc::new(prover));
        self
    }

    pub fn wallet(mut self, wallet: impl WalletProvider + 'static) -> Self {
        self.wallet = Some(Arc::new(wallet));
        self
    }

    pub fn ledger(mut self, ledger: impl LedgerReader + 'static) -> Self {
        self.ledger = Some(Arc::new(ledger));
        self
    }

    pub fn build(self) -> Result<PipelineSetup> {
        let config = self.config;

        let prover: Arc<dyn ProverApi> = self
            .prover
            .unwrap_or_else(|| Arc::new(HttpProverClient::new(config.prover_url.clone())));

        let wallet: Arc<dyn WalletProvider> = self.wallet.unwrap_or_else(|| {
            Arc::new(RpcWallet::new(
                RpcClient::new(config.wallet_rpc_url.clone()),
                config.chain_id,
            ))
        });

        let ledger: Arc<dyn LedgerReader> = self.ledger.unwrap_or_else(|| {
            Arc::new(LedgerContract::new(
                RpcClient::new(config.rpc_url.clone()),
                config.contract,
            ))
        });

        let dispatcher = GaslessDispatcher::new(
            wallet.clone(),
            config.contract,
            config.paymaster_url.clone(),
        );
        let leaderboard = LeaderboardSync::new(ledger);
        let machine = Arc::new(SubmissionStateMachine::new(
            prover,
            wallet.clone(),
            dispatcher,
            leaderboard.clone(),
        ));

        tracing::info!(
            contract = %config.contract,
            chain_id = config.chain_id,
            sponsored = config.paymaster_url.is_some(),
            "pipeline assembled"
        );

        Ok(PipelineSetup {
            config,
            wallet,
            leaderboard,
            machine,
        })
    }
}

/// Fully wired pipeline handed to a front-end.
pub struct PipelineSetup {
    pub config: PipelineConfig,
    pub wallet: Arc<dyn WalletProvider>,
    pub leaderboard: LeaderboardSync,
    pub machine: Arc<SubmissionStateMachine>,
}

#[cfg(test)]
mod tests {
    use chain_core::mock::{MockLedger, MockWallet};

    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig {
            rpc_url: "http://localhost:8545".to_string(),
            wallet_rpc_url: "http://localhost:8545".to_string(),
            contract: crate::config::DEFAULT_CONTRACT_ADDRESS.parse().unwrap(),
            chain_id: 84532,
            paymaster_url: None,
            prover_url: crate::config::DEFAULT_PROVER_URL.to_string(),
        }
    }

    #[test]
    fn builds_with_network_backed_defaults() {
        let setup = PipelineBuilder::new(config()).build().unwrap();
        assert_eq!(setup.config.chain_id, 84532);
    }

    #[tokio::test]
    async fn injected_doubles_replace_the_defaults() {
        let setup = PipelineBuilder::new(config())
            .wallet(MockWallet::disconnected(84532))
            .ledger(MockLedger::new())
            .build()
            .unwrap();

        assert!(setup.wallet.account().await.is_none());
        assert!(setup.leaderboard.refresh().await.unwrap().is_empty());
    }
}
