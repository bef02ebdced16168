//! Session data model: controls, the action log, and finalized results.

use serde::{Deserialize, Serialize};

/// Paddle control issued for a single simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Control {
    #[default]
    None,
    Left,
    Right,
}

/// One recorded player input.
///
/// Entries form a strictly ordered, append-only log: `sequence` increases by
/// one per entry and `tick` matches the simulation tick the control was
/// applied on. The log is sufficient for the proving service to replay the
/// session deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub sequence: u64,
    pub control: Control,
    pub tick: u64,
}

/// Immutable record of a completed session.
///
/// Created exactly once when the game loop detects termination and consumed
/// exactly once by proof request construction. `blocks_destroyed` and
/// `time_elapsed_ms` are client-reported; the proving service recomputes both
/// from the action log and rejects any divergence, so nothing downstream
/// trusts these values before verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub action_log: Vec<ActionLogEntry>,
    pub blocks_destroyed: u64,
    pub time_elapsed_ms: u64,
}

impl SessionResult {
    /// A session with zero recorded actions has nothing to prove.
    pub fn is_empty(&self) -> bool {
        self.action_log.is_empty()
    }
}

/// Recorder misuse errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session is already finalized")]
    InvalidSessionState,
}
