//! Frame driver
//!
//! Turns wall-clock timestamps into ticks: one tick per frame, input sampled
//! from the injected intent source, result handed to the injected render sink.

use crate::settings::Settings;
use crate::sim::{GameState, IntentSource, RenderSink, TickOutcome, tick};

pub struct Game<I: IntentSource, R: RenderSink> {
    pub state: GameState,
    intent: I,
    sink: R,
    /// Timestamp of the previous frame (seconds, monotonic)
    last_time: Option<f64>,
}

impl<I: IntentSource, R: RenderSink> Game<I, R> {
    pub fn new(settings: Settings, seed: u64, intent: I, sink: R) -> Self {
        Self {
            state: GameState::with_settings(settings, seed),
            intent,
            sink,
            last_time: None,
        }
    }

    /// Run one frame at monotonic time `now` (seconds).
    ///
    /// The first frame has no delta and only renders; a clock that goes
    /// backwards yields a skipped tick rather than negative time.
    pub fn frame(&mut self, now: f64) -> TickOutcome {
        let dt = match self.last_time {
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        self.last_time = Some(now);

        let input = self.intent.sample(&self.state.snapshot());
        let outcome = tick(&mut self.state, &input, dt);

        let effects = self.state.drain_effects();
        self.sink.present(&self.state.snapshot(), &effects);
        outcome
    }

    pub fn intent(&self) -> &I {
        &self.intent
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn into_parts(self) -> (GameState, I, R) {
        (self.state, self.intent, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Effect, GamePhase, SkipReason, Snapshot, TickInput};

    /// Replays a fixed script, then idles
    #[derive(Default)]
    struct Script {
        inputs: Vec<TickInput>,
        sampled: usize,
    }

    impl IntentSource for Script {
        fn sample(&mut self, _snapshot: &Snapshot<'_>) -> TickInput {
            let input = self.inputs.get(self.sampled).copied().unwrap_or_default();
            self.sampled += 1;
            input
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        last_player_x: f32,
        effects: Vec<Effect>,
        paused_frames: usize,
    }

    impl RenderSink for Recorder {
        fn present(&mut self, snapshot: &Snapshot<'_>, effects: &[Effect]) {
            self.frames += 1;
            self.last_player_x = snapshot.player.pos.x;
            self.effects.extend_from_slice(effects);
            if snapshot.hud.paused {
                self.paused_frames += 1;
            }
        }
    }

    fn game(inputs: Vec<TickInput>) -> Game<Script, Recorder> {
        Game::new(
            Settings::default(),
            7,
            Script {
                inputs,
                ..Default::default()
            },
            Recorder::default(),
        )
    }

    #[test]
    fn test_first_frame_only_renders() {
        let mut game = game(Vec::new());
        assert_eq!(
            game.frame(100.0),
            TickOutcome::Skipped(SkipReason::NonPositive)
        );
        assert_eq!(game.sink().frames, 1);
        assert_eq!(game.state.time_ticks, 0);

        assert_eq!(game.frame(100.016), TickOutcome::Advanced);
        assert_eq!(game.state.time_ticks, 1);
        assert_eq!(game.sink().frames, 2);
    }

    #[test]
    fn test_clock_anomalies() {
        let mut game = game(Vec::new());
        game.frame(10.0);
        // Backwards clock
        assert_eq!(game.frame(9.0), TickOutcome::Skipped(SkipReason::NonPositive));
        // Same timestamp twice
        assert_eq!(game.frame(9.0), TickOutcome::Skipped(SkipReason::NonPositive));
        // Tab suspended for a minute: clamped to one long frame
        assert_eq!(game.frame(69.0), TickOutcome::Advanced);
        assert!((game.state.elapsed - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_intent_reaches_player() {
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        let mut game = game(vec![left; 3]);
        let x0 = game.state.player.pos.x;
        for i in 0..3 {
            game.frame(i as f64 * 0.05);
        }
        // Two real ticks of 0.05s at 300 px/s
        assert!((x0 - game.sink().last_player_x - 30.0).abs() < 1e-3);
        assert_eq!(game.intent().sampled, 3);
    }

    #[test]
    fn test_paused_frames_still_render() {
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let mut game = game(vec![TickInput::default(), pause]);
        game.frame(0.0);
        assert_eq!(game.frame(0.016), TickOutcome::Paused);
        assert_eq!(game.frame(0.032), TickOutcome::Paused);
        assert_eq!(game.state.phase, GamePhase::Paused);
        assert_eq!(game.sink().frames, 3);
        assert_eq!(game.sink().paused_frames, 2);
    }

    #[test]
    fn test_effects_are_delivered_once() {
        let special = TickInput {
            special: true,
            ..Default::default()
        };
        let mut game = game(vec![TickInput::default(), special]);
        game.frame(0.0);
        game.frame(0.016);
        let (mut state, _, sink) = game.into_parts();
        assert!(!sink.effects.is_empty());
        assert!(state.drain_effects().is_empty());
    }
}
