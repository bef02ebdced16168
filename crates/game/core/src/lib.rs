//! Core domain types for the Brickles score-submission pipeline.
//!
//! This crate holds the session-side data model: the paddle controls a player
//! can issue, the append-only action log recorded during play, and the
//! finalized [`SessionResult`] handed to the proving service. It has no
//! knowledge of proving or chain submission; those layers consume these types.

pub mod recorder;
pub mod session;

pub use recorder::ActionRecorder;
pub use session::{ActionLogEntry, Control, SessionError, SessionResult};
