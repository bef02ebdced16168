//! Client for the external proving service.
//!
//! The proving service replays a finalized session's action log inside a
//! zkVM, recomputes the score and elapsed time independently, and returns a
//! succinct proof plus its public values. This crate only speaks the
//! request/response protocol; the circuit itself is an external collaborator.
//!
//! Failure normalization: the caller never learns whether a proof failed
//! because of the network, a prover-side replay mismatch, or a malformed
//! response. All of those collapse into [`ProverError::Unavailable`] after the
//! root cause is logged, and none of them are retried automatically — a fresh
//! user action is required, which keeps duplicate prover billing impossible.

pub mod client;
pub mod types;

pub use client::{HttpProverClient, ProverApi};
pub use types::{ProofData, ProverError};
