//! Proof container and error taxonomy for the proving service boundary.

use serde::{Deserialize, Serialize};

/// Opaque proof artifact produced by the proving service.
///
/// Both fields are raw bytes; they are hex-encoded with a `0x` prefix only at
/// the transaction boundary. A proof with either field empty is unusable and
/// must never reach dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofData {
    pub public_values: Vec<u8>,
    pub proof_bytes: Vec<u8>,
}

impl ProofData {
    pub fn is_usable(&self) -> bool {
        !self.public_values.is_empty() && !self.proof_bytes.is_empty()
    }
}

/// Errors surfaced by proof requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProverError {
    /// The session has no recorded actions; rejected before any network call.
    #[error("session has no recorded actions, nothing to prove")]
    EmptySession,

    /// Network failure, prover-side rejection, or malformed response.
    /// The root cause is logged but not distinguished to the caller.
    #[error("proof generation unavailable")]
    Unavailable,
}
