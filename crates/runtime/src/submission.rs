//! Submission pipeline state machine.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use chain_core::{DispatchError, GaslessDispatcher, TxHash, WalletProvider};
use game_core::SessionResult;
use prover_client::{ProverApi, ProverError};

use crate::leaderboard::LeaderboardSync;

/// Lifecycle of one score submission.
///
/// Transitions only move forward: `Idle -> AwaitingProof -> AwaitingRelay ->
/// Confirmed | Failed`, with any in-flight phase allowed to short-circuit to
/// `Failed`. Terminal states persist until [`SubmissionStateMachine::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    AwaitingProof,
    AwaitingRelay,
    Confirmed { tx_hash: TxHash },
    Failed { notice: String },
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Failed { .. })
    }
}

/// Why a submission did not reach the relay, or was refused outright.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("connect a wallet before submitting a score")]
    WalletNotConnected,

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error(transparent)]
    Proof(#[from] ProverError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Drives a finished session through proof generation and relay dispatch.
///
/// One machine serves one session at a time: a second `submit` while any
/// phase is in flight, or while a terminal state has not been reset, is
/// rejected without touching the prover or the wallet. State changes are
/// published on a watch channel for presentation layers.
pub struct SubmissionStateMachine {
    prover: Arc<dyn ProverApi>,
    wallet: Arc<dyn WalletProvider>,
    dispatcher: GaslessDispatcher,
    leaderboard: LeaderboardSync,
    state: watch::Sender<SubmissionState>,
    in_flight: Mutex<()>,
}

impl SubmissionStateMachine {
    pub fn new(
        prover: Arc<dyn ProverApi>,
        wallet: Arc<dyn WalletProvider>,
        dispatcher: GaslessDispatcher,
        leaderboard: LeaderboardSync,
    ) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            prover,
            wallet,
            dispatcher,
            leaderboard,
            state,
            in_flight: Mutex::new(()),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Submit a finalized session for verification.
    ///
    /// Prechecks happen before any state transition: without a connected
    /// wallet the machine stays `Idle`, and a concurrent submission is
    /// rejected without invoking the prover. Past the prechecks every outcome
    /// is terminal: the returned result mirrors the `Confirmed`/`Failed`
    /// state the machine lands in.
    pub async fn submit(&self, session: SessionResult) -> Result<TxHash, SubmitError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| SubmitError::SubmissionInProgress)?;
        if self.state() != SubmissionState::Idle {
            return Err(SubmitError::SubmissionInProgress);
        }

        if self.wallet.account().await.is_none() {
            tracing::warn!("submission refused, no wallet connected");
            return Err(SubmitError::WalletNotConnected);
        }

        self.state.send_replace(SubmissionState::AwaitingProof);
        let proof = match self.prover.request_proof(&session).await {
            Ok(proof) => proof,
            Err(err) => return Err(self.fail(err.into())),
        };
        if !proof.is_usable() {
            return Err(self.fail(DispatchError::InvalidProof.into()));
        }

        self.state.send_replace(SubmissionState::AwaitingRelay);
        let tx_hash = match self.dispatcher.dispatch(&proof).await {
            Ok(tx_hash) => tx_hash,
            Err(err) => return Err(self.fail(err.into())),
        };

        tracing::info!(%tx_hash, "submission confirmed");
        self.state.send_replace(SubmissionState::Confirmed {
            tx_hash: tx_hash.clone(),
        });

        // Ranking refresh happens strictly after confirmation; a read failure
        // degrades the display but never the submission outcome.
        if let Err(err) = self.leaderboard.refresh().await {
            tracing::warn!("leaderboard refresh after confirmation failed: {err}");
        }

        Ok(tx_hash)
    }

    /// Return a terminal machine to `Idle` for the next session.
    pub fn reset(&self) -> Result<(), SubmitError> {
        match self.state() {
            SubmissionState::AwaitingProof | SubmissionState::AwaitingRelay => {
                Err(SubmitError::SubmissionInProgress)
            }
            _ => {
                self.state.send_replace(SubmissionState::Idle);
                Ok(())
            }
        }
    }

    fn fail(&self, err: SubmitError) -> SubmitError {
        tracing::warn!("submission failed: {err}");
        self.state.send_replace(SubmissionState::Failed {
            notice: err.to_string(),
        });
        err
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use chain_core::mock::{MockLedger, MockWallet, TEST_PLAYER};
    use chain_core::{Address, LedgerReader, ScoreRecord};
    use game_core::{ActionRecorder, Control};
    use prover_client::ProofData;

    use super::*;

    const CHAIN_ID: u64 = 84532;

    enum FakeOutcome {
        Proof(ProofData),
        Unavailable,
        EmptyFields,
    }

    struct FakeProver {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        outcome: FakeOutcome,
    }

    impl FakeProver {
        fn returning(outcome: FakeOutcome) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                outcome,
            }
        }

        fn proving() -> Self {
            Self::returning(FakeOutcome::Proof(ProofData {
                public_values: vec![0xaa; 32],
                proof_bytes: vec![0xbb; 64],
            }))
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::proving()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ProverApi for FakeProver {
        async fn request_proof(
            &self,
            session: &SessionResult,
        ) -> Result<ProofData, ProverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if session.is_empty() {
                return Err(ProverError::EmptySession);
            }
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.outcome {
                FakeOutcome::Proof(proof) => Ok(proof.clone()),
                FakeOutcome::Unavailable => Err(ProverError::Unavailable),
                FakeOutcome::EmptyFields => Ok(ProofData {
                    public_values: Vec::new(),
                    proof_bytes: Vec::new(),
                }),
            }
        }
    }

    fn finished_session() -> SessionResult {
        let mut recorder = ActionRecorder::new();
        recorder.record(Control::Left).unwrap();
        recorder.record(Control::None).unwrap();
        recorder.record(Control::Right).unwrap();
        recorder.finalize(12, 45_210).unwrap()
    }

    fn contract() -> Address {
        "0xb98b07b80a95f27a89e527785069855ad46b6630"
            .parse()
            .unwrap()
    }

    fn machine(
        prover: Arc<FakeProver>,
        wallet: Arc<MockWallet>,
        ledger: Arc<MockLedger>,
        paymaster_url: Option<String>,
    ) -> SubmissionStateMachine {
        let dispatcher = GaslessDispatcher::new(wallet.clone(), contract(), paymaster_url);
        SubmissionStateMachine::new(
            prover,
            wallet,
            dispatcher,
            LeaderboardSync::new(ledger),
        )
    }

    #[tokio::test]
    async fn full_pipeline_confirms_and_refreshes_leaderboard() {
        let ledger = Arc::new(MockLedger::new());
        let verified = ScoreRecord {
            player: TEST_PLAYER.parse().unwrap(),
            timestamp: 1_700_000_000,
            blocks_destroyed: 12,
            time_elapsed: 45_210,
        };
        let wallet = Arc::new(
            MockWallet::connected(CHAIN_ID)
                .with_paymaster_support()
                .with_ledger_effect(ledger.clone(), verified.clone()),
        );
        let prover = Arc::new(FakeProver::proving());
        let machine = machine(
            prover.clone(),
            wallet.clone(),
            ledger.clone(),
            Some("https://paymaster.example".to_string()),
        );

        let tx_hash = machine.submit(finished_session()).await.unwrap();
        assert_eq!(
            machine.state(),
            SubmissionState::Confirmed {
                tx_hash: tx_hash.clone()
            }
        );
        assert_eq!(prover.call_count(), 1);

        let sent = wallet.sent_calls();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.is_sponsored());

        let top = ledger.top_scores().await.unwrap();
        assert_eq!(top, vec![verified]);
    }

    #[tokio::test]
    async fn degraded_wallet_still_confirms_with_account_paid_gas() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(MockWallet::connected(CHAIN_ID));
        let prover = Arc::new(FakeProver::proving());
        let machine = machine(
            prover,
            wallet.clone(),
            ledger,
            Some("https://paymaster.example".to_string()),
        );

        machine.submit(finished_session()).await.unwrap();
        assert!(matches!(
            machine.state(),
            SubmissionState::Confirmed { .. }
        ));
        assert!(!wallet.sent_calls()[0].1.is_sponsored());
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_rejected() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(MockWallet::connected(CHAIN_ID));
        let gate = Arc::new(Notify::new());
        let prover = Arc::new(FakeProver::gated(gate.clone()));
        let machine = Arc::new(machine(prover.clone(), wallet, ledger, None));

        let first = tokio::spawn({
            let machine = machine.clone();
            async move { machine.submit(finished_session()).await }
        });
        // Let the first submission reach the prover and park on the gate.
        while machine.state() != SubmissionState::AwaitingProof {
            tokio::task::yield_now().await;
        }

        let err = machine.submit(finished_session()).await.unwrap_err();
        assert!(matches!(err, SubmitError::SubmissionInProgress));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(prover.call_count(), 1);
    }

    #[tokio::test]
    async fn disconnected_wallet_stays_idle() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(MockWallet::disconnected(CHAIN_ID));
        let prover = Arc::new(FakeProver::proving());
        let machine = machine(prover.clone(), wallet, ledger, None);

        let err = machine.submit(finished_session()).await.unwrap_err();
        assert!(matches!(err, SubmitError::WalletNotConnected));
        assert_eq!(machine.state(), SubmissionState::Idle);
        assert_eq!(prover.call_count(), 0);
    }

    #[tokio::test]
    async fn prover_outage_transitions_to_failed_without_relay_call() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(MockWallet::connected(CHAIN_ID));
        let prover = Arc::new(FakeProver::returning(FakeOutcome::Unavailable));
        let machine = machine(prover, wallet.clone(), ledger, None);

        let err = machine.submit(finished_session()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Proof(ProverError::Unavailable)));
        assert!(matches!(machine.state(), SubmissionState::Failed { .. }));
        assert!(wallet.sent_calls().is_empty());
    }

    #[tokio::test]
    async fn empty_proof_fields_never_reach_the_relay() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(MockWallet::connected(CHAIN_ID));
        let prover = Arc::new(FakeProver::returning(FakeOutcome::EmptyFields));
        let machine = machine(prover, wallet.clone(), ledger, None);

        let err = machine.submit(finished_session()).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Dispatch(DispatchError::InvalidProof)
        ));
        assert!(matches!(machine.state(), SubmissionState::Failed { .. }));
        assert!(wallet.sent_calls().is_empty());
    }

    #[tokio::test]
    async fn relay_rejection_transitions_to_failed_with_notice() {
        let ledger = Arc::new(MockLedger::new());
        let wallet =
            Arc::new(MockWallet::connected(CHAIN_ID).failing_with("user rejected the request"));
        let prover = Arc::new(FakeProver::proving());
        let machine = machine(prover, wallet, ledger, None);

        let err = machine.submit(finished_session()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Dispatch(DispatchError::Relay { .. })));
        match machine.state() {
            SubmissionState::Failed { notice } => {
                assert!(notice.contains("user rejected the request"));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_session_is_rejected_before_any_relay_work() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(MockWallet::connected(CHAIN_ID));
        let prover = Arc::new(FakeProver::proving());
        let machine = machine(prover, wallet.clone(), ledger, None);

        let empty = ActionRecorder::new().finalize(0, 0).unwrap();
        let err = machine.submit(empty).await.unwrap_err();
        assert!(matches!(err, SubmitError::Proof(ProverError::EmptySession)));
        assert!(wallet.sent_calls().is_empty());
    }

    #[tokio::test]
    async fn reset_returns_terminal_machine_to_idle() {
        let ledger = Arc::new(MockLedger::new());
        let wallet = Arc::new(MockWallet::connected(CHAIN_ID));
        let prover = Arc::new(FakeProver::proving());
        let machine = machine(prover.clone(), wallet, ledger, None);

        machine.submit(finished_session()).await.unwrap();
        assert!(machine.state().is_terminal());

        machine.reset().unwrap();
        assert_eq!(machine.state(), SubmissionState::Idle);

        machine.submit(finished_session()).await.unwrap();
        assert_eq!(prover.call_count(), 2);
    }
}
