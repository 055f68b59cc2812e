//! Sky Barrage headless runner
//!
//! Plays a run with a simple autopilot at 60 Hz and prints the final HUD as JSON.
//!
//! Usage: sky-barrage [--settings PATH] [--seed N] [--seconds S]

use std::process::ExitCode;

use sky_barrage::sim::{
    Effect, EffectKind, GameEvent, IntentSource, RenderSink, Snapshot, TickInput, TickOutcome,
};
use sky_barrage::{Game, Settings};

const FRAME_RATE: f64 = 60.0;
const DEFAULT_SECONDS: f64 = 120.0;
/// Autopilot fires the special once this many enemies are on screen
const CROWD_SIZE: usize = 6;

struct Options {
    settings: Option<String>,
    seed: Option<u64>,
    seconds: f64,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        settings: None,
        seed: None,
        seconds: DEFAULT_SECONDS,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or(format!("{name} needs a value"));
        match arg.as_str() {
            "--settings" => options.settings = Some(value("--settings")?),
            "--seed" => {
                let raw = value("--seed")?;
                options.seed = Some(raw.parse().map_err(|_| format!("bad seed '{raw}'"))?);
            }
            "--seconds" => {
                let raw = value("--seconds")?;
                let seconds: f64 = raw.parse().map_err(|_| format!("bad duration '{raw}'"))?;
                if !seconds.is_finite() || seconds <= 0.0 {
                    return Err(format!("duration must be positive, got {raw}"));
                }
                options.seconds = seconds;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(options)
}

/// Follows the nearest enemy horizontally and clears the screen when crowded
struct Autopilot;

impl IntentSource for Autopilot {
    fn sample(&mut self, snapshot: &Snapshot<'_>) -> TickInput {
        let player = snapshot.player.center();
        let target = snapshot
            .enemies
            .iter()
            .map(|e| e.center())
            .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)));

        let mut input = TickInput {
            special: snapshot.enemies.len() >= CROWD_SIZE,
            ..Default::default()
        };
        if let Some(target) = target {
            let dx = target.x - player.x;
            input.move_left = dx < -5.0;
            input.move_right = dx > 5.0;
        }
        input
    }
}

/// Logs notable events instead of drawing
#[derive(Default)]
struct LogSink {
    explosions: usize,
}

impl RenderSink for LogSink {
    fn present(&mut self, _snapshot: &Snapshot<'_>, effects: &[Effect]) {
        self.explosions += effects
            .iter()
            .filter(|e| e.kind == EffectKind::Explosion)
            .count();
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: sky-barrage [--settings PATH] [--seed N] [--seconds S]");
            return ExitCode::from(2);
        }
    };

    let settings = match &options.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = options
        .seed
        .or(settings.seed)
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Starting run with seed {seed}");

    let mut game = Game::new(settings, seed, Autopilot, LogSink::default());
    let frames = (options.seconds * FRAME_RATE).ceil() as u64;
    for frame in 0..=frames {
        let outcome = game.frame(frame as f64 / FRAME_RATE);
        for event in &game.state.events {
            match event {
                GameEvent::EnemySpawned { .. } | GameEvent::EnemyDestroyed { .. } => {
                    log::trace!("{event:?}")
                }
                _ => log::debug!("{event:?}"),
            }
        }
        if outcome == TickOutcome::GameOver {
            break;
        }
    }

    log::info!(
        "Run finished after {:.1}s simulated, {} explosions",
        game.state.elapsed,
        game.sink().explosions
    );
    match serde_json::to_string_pretty(&game.state.hud()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to encode HUD: {e}");
            ExitCode::FAILURE
        }
    }
}
