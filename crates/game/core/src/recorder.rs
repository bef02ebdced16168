//! Append-only recorder for player inputs during an active session.

use crate::session::{ActionLogEntry, Control, SessionError, SessionResult};

/// Accumulates the deterministic action log for one play-through.
///
/// Owned by the game session driver; `record` is called once per simulation
/// tick while the session is active, and `finalize` is called exactly once
/// when the engine reports termination. After finalization the recorder is
/// terminal and rejects further use.
#[derive(Debug, Default)]
pub struct ActionRecorder {
    log: Vec<ActionLogEntry>,
    tick: u64,
    finalized: bool,
}

impl ActionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry for the current simulation tick.
    ///
    /// Sequence numbers are assigned monotonically and can never repeat or
    /// regress. Fails with [`SessionError::InvalidSessionState`] once the
    /// session has been finalized.
    pub fn record(&mut self, control: Control) -> Result<(), SessionError> {
        if self.finalized {
            return Err(SessionError::InvalidSessionState);
        }

        let sequence = self.log.len() as u64;
        self.log.push(ActionLogEntry {
            sequence,
            control,
            tick: self.tick,
        });
        self.tick += 1;

        Ok(())
    }

    /// Number of entries recorded so far.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Seal the log and produce the immutable session result.
    ///
    /// `blocks_destroyed` and `time_elapsed_ms` come from the game engine at
    /// termination. A second call fails with
    /// [`SessionError::InvalidSessionState`] and does not touch the already
    /// returned result.
    pub fn finalize(
        &mut self,
        blocks_destroyed: u64,
        time_elapsed_ms: u64,
    ) -> Result<SessionResult, SessionError> {
        if self.finalized {
            return Err(SessionError::InvalidSessionState);
        }
        self.finalized = true;

        Ok(SessionResult {
            action_log: std::mem::take(&mut self.log),
            blocks_destroyed,
            time_elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_entries_with_increasing_sequence_and_tick() {
        let mut recorder = ActionRecorder::new();
        recorder.record(Control::Left).unwrap();
        recorder.record(Control::None).unwrap();
        recorder.record(Control::Right).unwrap();

        let result = recorder.finalize(2, 500).unwrap();
        assert_eq!(result.action_log.len(), 3);
        for (i, entry) in result.action_log.iter().enumerate() {
            assert_eq!(entry.sequence, i as u64);
            assert_eq!(entry.tick, i as u64);
        }
        assert_eq!(result.action_log[2].control, Control::Right);
    }

    #[test]
    fn record_after_finalize_is_rejected() {
        let mut recorder = ActionRecorder::new();
        recorder.record(Control::Left).unwrap();
        recorder.finalize(1, 100).unwrap();

        assert_eq!(
            recorder.record(Control::Right),
            Err(SessionError::InvalidSessionState)
        );
    }

    #[test]
    fn second_finalize_fails_without_mutating_first_result() {
        let mut recorder = ActionRecorder::new();
        recorder.record(Control::Left).unwrap();

        let first = recorder.finalize(7, 950).unwrap();
        let snapshot = first.clone();

        assert_eq!(
            recorder.finalize(99, 1),
            Err(SessionError::InvalidSessionState)
        );
        assert_eq!(first, snapshot);
        assert!(recorder.is_finalized());
    }
}
