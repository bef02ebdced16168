//! HTTP client for the proving service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use game_core::{ActionLogEntry, SessionResult};

use crate::types::{ProofData, ProverError};

/// Proof request interface.
///
/// Implemented by [`HttpProverClient`] for the real service and by test fakes
/// in the orchestration layer.
#[async_trait]
pub trait ProverApi: Send + Sync {
    /// Request a proof for a finalized session.
    ///
    /// Proof generation is computationally heavy and may take tens of
    /// seconds; callers await this without blocking the UI thread and observe
    /// progress through the submission state machine instead of this call.
    async fn request_proof(&self, session: &SessionResult) -> Result<ProofData, ProverError>;
}

/// Wire format of a proof request.
#[derive(Debug, Serialize)]
struct ProveRequest<'a> {
    action_log: &'a [ActionLogEntry],
    blocks_destroyed: u64,
    time_elapsed: u64,
}

/// Wire format of a successful proof response.
///
/// Byte fields arrive hex-encoded without a `0x` prefix.
#[derive(Debug, Deserialize)]
struct ProveResponse {
    public_values: String,
    proof: String,
}

impl ProveResponse {
    /// Decode and validate the response into usable proof data.
    fn into_proof_data(self) -> Result<ProofData, ProverError> {
        let public_values = hex::decode(&self.public_values).map_err(|err| {
            tracing::warn!("prover returned malformed public values hex: {err}");
            ProverError::Unavailable
        })?;
        let proof_bytes = hex::decode(&self.proof).map_err(|err| {
            tracing::warn!("prover returned malformed proof hex: {err}");
            ProverError::Unavailable
        })?;

        let proof = ProofData {
            public_values,
            proof_bytes,
        };
        if !proof.is_usable() {
            tracing::warn!("prover returned incomplete proof data");
            return Err(ProverError::Unavailable);
        }

        Ok(proof)
    }
}

/// Proof request client over HTTP.
pub struct HttpProverClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpProverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ProverApi for HttpProverClient {
    async fn request_proof(&self, session: &SessionResult) -> Result<ProofData, ProverError> {
        // Reject trivially invalid runs before spending prover capacity.
        if session.is_empty() {
            return Err(ProverError::EmptySession);
        }

        let url = format!("{}/prove", self.base_url);
        let request = ProveRequest {
            action_log: &session.action_log,
            blocks_destroyed: session.blocks_destroyed,
            time_elapsed: session.time_elapsed_ms,
        };

        tracing::info!(
            actions = session.action_log.len(),
            blocks = session.blocks_destroyed,
            "requesting proof from {url}"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("proof request failed to reach prover: {err}");
                ProverError::Unavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!("prover rejected session (status {status}): {body}");
            return Err(ProverError::Unavailable);
        }

        let parsed: ProveResponse = response.json().await.map_err(|err| {
            tracing::warn!("failed to parse prover response: {err}");
            ProverError::Unavailable
        })?;

        let proof = parsed.into_proof_data()?;
        tracing::info!(
            public_values = proof.public_values.len(),
            proof_bytes = proof.proof_bytes.len(),
            "proof generated"
        );
        Ok(proof)
    }
}
