//! Frame-driven session loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Interval, MissedTickBehavior, interval};

use game_core::{ActionRecorder, Control, SessionError, SessionResult};

/// Whether the engine wants another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Running,
    GameOver,
}

/// Deterministic game simulation advanced one control per frame.
pub trait GameEngine {
    fn advance(&mut self, control: Control) -> EngineStatus;

    /// Blocks destroyed at the current point of the simulation.
    fn blocks_destroyed(&self) -> u64;

    /// Elapsed play time in milliseconds at the current point.
    fn time_elapsed_ms(&self) -> u64;
}

/// Source of the player's control for the upcoming frame.
pub trait ControlSource {
    fn poll(&mut self) -> Control;
}

/// Paces the session loop, one `next_frame` per simulation tick.
#[async_trait]
pub trait FrameClock: Send {
    async fn next_frame(&mut self);
}

/// Wall-clock pacing at a fixed frame period.
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Standard 60 frames per second pacing.
    pub fn sixty_fps() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

#[async_trait]
impl FrameClock for IntervalClock {
    async fn next_frame(&mut self) {
        self.interval.tick().await;
    }
}

/// Runs one session to completion: each frame polls a control, records it,
/// and advances the engine, until the engine reports game over. The recorder
/// is sealed with the engine's final counters, so the log and the claimed
/// outcome come from the same run.
pub struct SessionDriver;

impl SessionDriver {
    pub async fn run<E, C, S>(
        engine: &mut E,
        clock: &mut C,
        controls: &mut S,
    ) -> Result<SessionResult, SessionError>
    where
        E: GameEngine,
        C: FrameClock,
        S: ControlSource,
    {
        let mut recorder = ActionRecorder::new();

        loop {
            clock.next_frame().await;
            let control = controls.poll();
            recorder.record(control)?;
            if engine.advance(control) == EngineStatus::GameOver {
                break;
            }
        }

        let result = recorder.finalize(engine.blocks_destroyed(), engine.time_elapsed_ms())?;
        tracing::info!(
            frames = result.action_log.len(),
            blocks = result.blocks_destroyed,
            time_ms = result.time_elapsed_ms,
            "session finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ImmediateClock;

    #[async_trait]
    impl FrameClock for ImmediateClock {
        async fn next_frame(&mut self) {}
    }

    struct ScriptedEngine {
        frames_left: u32,
        blocks: u64,
        time_ms: u64,
    }

    impl GameEngine for ScriptedEngine {
        fn advance(&mut self, _control: Control) -> EngineStatus {
            self.frames_left -= 1;
            if self.frames_left == 0 {
                EngineStatus::GameOver
            } else {
                EngineStatus::Running
            }
        }

        fn blocks_destroyed(&self) -> u64 {
            self.blocks
        }

        fn time_elapsed_ms(&self) -> u64 {
            self.time_ms
        }
    }

    struct CyclingControls {
        script: Vec<Control>,
        next: usize,
    }

    impl ControlSource for CyclingControls {
        fn poll(&mut self) -> Control {
            let control = self.script[self.next % self.script.len()];
            self.next += 1;
            control
        }
    }

    #[tokio::test]
    async fn driver_records_one_entry_per_frame_until_game_over() {
        let mut engine = ScriptedEngine {
            frames_left: 3,
            blocks: 12,
            time_ms: 45_210,
        };
        let mut clock = ImmediateClock;
        let mut controls = CyclingControls {
            script: vec![Control::Left, Control::None, Control::Right],
            next: 0,
        };

        let result = SessionDriver::run(&mut engine, &mut clock, &mut controls)
            .await
            .unwrap();

        assert_eq!(result.action_log.len(), 3);
        assert_eq!(result.blocks_destroyed, 12);
        assert_eq!(result.time_elapsed_ms, 45_210);
        for (i, entry) in result.action_log.iter().enumerate() {
            assert_eq!(entry.sequence, i as u64);
        }
        assert_eq!(result.action_log[0].control, Control::Left);
        assert_eq!(result.action_log[2].control, Control::Right);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_clock_paces_frames() {
        let mut clock = IntervalClock::sixty_fps();
        // First tick fires immediately, later ticks wait a frame period.
        clock.next_frame().await;
        clock.next_frame().await;
    }
}
