//! Orchestration layer tying the game session to proof generation and
//! on-chain submission.
//!
//! The [`SubmissionStateMachine`] drives a finished session through the
//! pipeline: request a proof, dispatch the verification call through the
//! wallet, then refresh the leaderboard once the relay confirms. State is
//! published on a watch channel so presentation layers can render progress
//! without polling the machine.

pub mod leaderboard;
pub mod session;
pub mod submission;

pub use leaderboard::{LeaderboardSync, format_time_elapsed};
pub use session::{ControlSource, EngineStatus, FrameClock, GameEngine, IntervalClock, SessionDriver};
pub use submission::{SubmissionState, SubmissionStateMachine, SubmitError};
