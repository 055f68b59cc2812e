//! Enemy director: spawn cadence, weighted type selection, waves and difficulty
//!
//! The director owns no entities. Each update returns orders that the game
//! state turns into enemies and events.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::movement::MovementPattern;

/// Spawn interval bounds and starting value (seconds)
pub const BASE_SPAWN_INTERVAL: f32 = 2.0;
pub const MIN_SCORE_SPAWN_INTERVAL: f32 = 0.8;
pub const MIN_WAVE_SPAWN_INTERVAL: f32 = 0.5;
/// Wave length at wave 1, its per-wave reduction, and its floor (seconds)
pub const BASE_WAVE_DURATION: f32 = 30.0;
pub const WAVE_DURATION_STEP: f32 = 2.0;
pub const MIN_WAVE_DURATION: f32 = 15.0;
/// Pause between waves (seconds)
pub const WAVE_INTERMISSION: f32 = 3.0;
/// With no score yet, an enemy is forced once the spawn timer passes this
pub const FIRST_SPAWN_DELAY: f32 = 1.0;
/// First wave that may field a boss
pub const BOSS_MIN_WAVE: u32 = 3;
/// Per-spawn chance of the once-per-wave dedicated boss
pub const BOSS_SPAWN_CHANCE: f32 = 0.3;
pub const BOSS_BASE_HEALTH: i32 = 50;
pub const BOSS_HEALTH_PER_WAVE: i32 = 20;
const BOSS_SPAWN_Y: f32 = -50.0;
const BOSS_SPEED_SCALE: f32 = 0.8;
/// Regular spawns appear at this height, within [0, width - margin)
const SPAWN_Y: f32 = 50.0;
const SPAWN_MARGIN: f32 = 50.0;

/// Spawn interval from score alone, within [0.8, 2.0]
pub fn interval_for_score(score: u64) -> f32 {
    let reduction = (score as f32 / 1000.0).min(1.2);
    (BASE_SPAWN_INTERVAL - reduction).max(MIN_SCORE_SPAWN_INTERVAL)
}

/// Spawn interval set at the start of a wave, within [0.5, 2.0]
pub fn interval_for_wave(wave: u32) -> f32 {
    let reduction = wave.saturating_sub(1) as f32 * 0.1;
    (BASE_SPAWN_INTERVAL - reduction).max(MIN_WAVE_SPAWN_INTERVAL)
}

pub fn difficulty_for_score(score: u64) -> u32 {
    1 + (score / 500) as u32
}

pub fn difficulty_for_wave(wave: u32) -> u32 {
    1 + wave / 2
}

pub fn wave_duration(wave: u32) -> f32 {
    (BASE_WAVE_DURATION - wave.saturating_sub(1) as f32 * WAVE_DURATION_STEP).max(MIN_WAVE_DURATION)
}

/// Selection weights in `EnemyKind::ALL` order
pub fn spawn_weights(wave: u32) -> [f32; 5] {
    if wave >= 3 {
        [0.5, 0.2, 0.15, 0.15, 0.08]
    } else {
        [0.5, 0.2, 0.15, 0.1, 0.05]
    }
}

/// Cumulative-weight draw for a uniform `sample` in [0, 1).
///
/// The sample is scaled by the weight total so every bucket stays reachable
/// when the wave-3 weights add up past 1.0.
pub fn select_kind(wave: u32, sample: f32) -> EnemyKind {
    let weights = spawn_weights(wave);
    let total: f32 = weights.iter().sum();
    let target = sample * total;
    let mut cumulative = 0.0;
    for (kind, weight) in EnemyKind::ALL.iter().zip(weights) {
        cumulative += weight;
        if target <= cumulative {
            return *kind;
        }
    }
    EnemyKind::Basic
}

/// Bosses drawn before they are allowed are downgraded to elites
pub fn gate_kind(kind: EnemyKind, wave: u32) -> EnemyKind {
    if kind == EnemyKind::Boss && wave < BOSS_MIN_WAVE {
        EnemyKind::Elite
    } else {
        kind
    }
}

/// Everything needed to create one enemy
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub pattern: MovementPattern,
    pub speed_scale: f32,
    pub health: i32,
    /// Dedicated once-per-wave boss
    pub wave_boss: bool,
}

impl SpawnOrder {
    pub fn into_enemy(self, id: u32) -> Enemy {
        let mut enemy = Enemy::new(id, self.kind, self.pos, self.pattern).with_health(self.health);
        enemy.speed *= self.speed_scale;
        enemy
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectorEvent {
    Spawn(SpawnOrder),
    WaveEnded { wave: u32 },
    WaveStarted { wave: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub difficulty: u32,
    pub wave: u32,
    pub wave_timer: f32,
    pub wave_duration: f32,
    /// Intermission countdown, 0 while a wave is running
    pub wave_end_timer: f32,
    pub boss_spawned_this_wave: bool,
}

impl Default for Director {
    fn default() -> Self {
        Self::new()
    }
}

impl Director {
    pub fn new() -> Self {
        Self {
            spawn_timer: 0.0,
            spawn_interval: BASE_SPAWN_INTERVAL,
            difficulty: 1,
            wave: 1,
            wave_timer: 0.0,
            wave_duration: BASE_WAVE_DURATION,
            wave_end_timer: 0.0,
            boss_spawned_this_wave: false,
        }
    }

    pub fn in_intermission(&self) -> bool {
        self.wave_end_timer > 0.0
    }

    /// Time left in the running wave, or in the intermission
    pub fn seconds_until_next_wave(&self) -> f32 {
        if self.in_intermission() {
            self.wave_end_timer
        } else {
            (self.wave_duration - self.wave_timer).max(0.0)
        }
    }

    /// Speed multiplier applied to regular spawns
    pub fn speed_scale(&self) -> f32 {
        1.0 + (self.difficulty as f32 - 1.0) * 0.05 + (self.wave as f32 - 1.0) * 0.02
    }

    /// Extra health for regular non-boss spawns
    pub fn health_bonus(&self) -> i32 {
        ((self.difficulty as f32 - 1.0) + (self.wave as f32 - 1.0) * 0.5).floor() as i32
    }

    /// Advance spawn and wave timers. Invalid deltas are ignored.
    pub fn update(
        &mut self,
        dt: f32,
        score: u64,
        field: Vec2,
        rng: &mut impl Rng,
    ) -> Vec<DirectorEvent> {
        let mut out = Vec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return out;
        }

        // The wave clock is held during the countdown and restarts from zero
        // with the next wave
        if self.in_intermission() {
            self.wave_end_timer -= dt;
            if self.wave_end_timer <= 0.0 {
                self.start_next_wave();
                out.push(DirectorEvent::WaveStarted { wave: self.wave });
            }
            return out;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            out.push(DirectorEvent::Spawn(self.spawn(field, rng)));
            self.spawn_timer = 0.0;
            self.spawn_interval = interval_for_score(score);
            self.difficulty = difficulty_for_score(score);
        }

        if score == 0 && self.spawn_timer > FIRST_SPAWN_DELAY {
            out.push(DirectorEvent::Spawn(self.spawn(field, rng)));
            self.spawn_timer = 0.0;
        }

        self.wave_timer += dt;
        if self.wave_timer >= self.wave_duration {
            self.wave_end_timer = WAVE_INTERMISSION;
            self.wave_timer = 0.0;
            log::info!("Wave {} over, next wave in {}s", self.wave, WAVE_INTERMISSION);
            out.push(DirectorEvent::WaveEnded { wave: self.wave });
        }

        out
    }

    fn start_next_wave(&mut self) {
        self.wave_end_timer = 0.0;
        self.wave += 1;
        self.boss_spawned_this_wave = false;
        self.wave_duration = wave_duration(self.wave);
        self.spawn_interval = interval_for_wave(self.wave);
        self.difficulty = difficulty_for_wave(self.wave);
        log::info!(
            "Wave {} started: duration={}s interval={}s difficulty={}",
            self.wave,
            self.wave_duration,
            self.spawn_interval,
            self.difficulty
        );
    }

    /// Pick what to spawn: the dedicated boss when its roll hits, otherwise a weighted draw
    fn spawn(&mut self, field: Vec2, rng: &mut impl Rng) -> SpawnOrder {
        if !self.boss_spawned_this_wave
            && self.wave >= BOSS_MIN_WAVE
            && rng.random::<f32>() < BOSS_SPAWN_CHANCE
        {
            return self.spawn_boss(field, rng);
        }

        let kind = gate_kind(select_kind(self.wave, rng.random::<f32>()), self.wave);
        let x = rng.random_range(0.0..(field.x - SPAWN_MARGIN).max(1.0));
        let pattern = MovementPattern::random_wandering(rng);
        let base = kind.stats().health;
        let health = if kind == EnemyKind::Boss {
            base
        } else {
            base + self.health_bonus()
        };

        SpawnOrder {
            kind,
            pos: Vec2::new(x, SPAWN_Y),
            pattern,
            speed_scale: self.speed_scale(),
            health,
            wave_boss: false,
        }
    }

    fn spawn_boss(&mut self, field: Vec2, rng: &mut impl Rng) -> SpawnOrder {
        self.boss_spawned_this_wave = true;
        let width = EnemyKind::Boss.stats().width;
        let health = BOSS_BASE_HEALTH + (self.wave as i32 - 1) * BOSS_HEALTH_PER_WAVE;
        log::info!("Boss incoming on wave {} with {} hp", self.wave, health);
        SpawnOrder {
            kind: EnemyKind::Boss,
            pos: Vec2::new(field.x / 2.0 - width / 2.0, BOSS_SPAWN_Y),
            pattern: MovementPattern::random_wandering(rng),
            speed_scale: BOSS_SPEED_SCALE,
            health,
            wave_boss: true,
        }
    }
}
