//! Per-frame simulation tick
//!
//! Order within a tick: intent -> player -> director spawns -> entity updates
//! -> collision detect/resolve -> out-of-bounds pruning.

use serde::{Deserialize, Serialize};

use super::collision;
use super::director::DirectorEvent;
use super::player::Steering;
use super::state::{EffectKind, GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Fire the special ability (ignored while on cooldown)
    pub special: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a fresh run
    pub restart: bool,
}

impl TickInput {
    pub fn steering(&self) -> Steering {
        Steering {
            left: self.move_left,
            right: self.move_right,
            up: self.move_up,
            down: self.move_down,
        }
    }
}

/// Why a frame delta was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NonFinite,
    NonPositive,
}

/// What a call to [`tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    Skipped(SkipReason),
    Paused,
    GameOver,
    Restarted,
}

/// Reject unusable deltas and clamp long frames to `max_dt`
pub fn validate_dt(dt: f32, max_dt: f32) -> Result<f32, SkipReason> {
    if !dt.is_finite() {
        Err(SkipReason::NonFinite)
    } else if dt <= 0.0 {
        Err(SkipReason::NonPositive)
    } else {
        Ok(dt.min(max_dt))
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickOutcome {
    state.events.clear();

    if input.restart {
        state.restart();
        return TickOutcome::Restarted;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused => return TickOutcome::Paused,
        GamePhase::GameOver => return TickOutcome::GameOver,
        GamePhase::Playing => {}
    }

    let dt = match validate_dt(dt, state.settings.effective_max_frame_dt()) {
        Ok(dt) => dt,
        Err(reason) => {
            log::debug!("Skipping tick with delta {dt}: {reason:?}");
            return TickOutcome::Skipped(reason);
        }
    };

    state.time_ticks += 1;
    state.elapsed += dt;
    let field = state.field;

    // Intent -> player
    state.player.steering = input.steering();
    let volley = state.player.update(dt, field);
    state.player_bullets.extend(volley);
    if input.special {
        state.use_special();
    }

    // Director
    let orders = state.director.update(dt, state.score, field, &mut state.rng);
    for order in orders {
        match order {
            DirectorEvent::Spawn(spawn) => {
                state.spawn_enemy(spawn);
            }
            DirectorEvent::WaveEnded { wave } => {
                state.emit(GameEvent::WaveEnded { wave });
            }
            DirectorEvent::WaveStarted { wave } => {
                state.emit(GameEvent::WaveStarted { wave });
                state.push_effect(EffectKind::WaveStart, field * 0.5);
            }
        }
    }

    // Entity updates
    let target = state.player.center();
    let mut phase_changes = Vec::new();
    for enemy in &mut state.enemies {
        let out = enemy.update(dt, target, field);
        if let Some(shot) = out.shot {
            state.enemy_bullets.push(shot);
        }
        if let Some(phase) = out.phase_change {
            phase_changes.push((enemy.id, phase, enemy.center()));
        }
    }
    for (id, phase, pos) in phase_changes {
        state.record_phase_change(id, phase, pos);
    }
    for bullet in &mut state.player_bullets {
        bullet.update(dt);
    }
    for bullet in &mut state.enemy_bullets {
        bullet.update(dt);
    }

    // Collisions
    let collisions = collision::detect(state);
    collision::resolve(state, collisions);

    state.prune_out_of_bounds();

    TickOutcome::Advanced
}
