//! Game state and core simulation types
//!
//! The game state is the single owner of every entity collection. The
//! director and the collision manager read and mutate these collections
//! but hold none of their own.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::{Director, SpawnOrder};
use super::enemy::{BossPhase, Enemy, EnemyBullet, EnemyKind};
use super::player::{Player, PlayerBullet};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended, only a restart leaves this phase
    GameOver,
}

/// Observable things that happened during the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemyKind },
    BossSpawned { id: u32, wave: u32, health: i32 },
    BossPhaseChanged { id: u32, phase: u8 },
    EnemyDestroyed { id: u32, kind: EnemyKind, score: u64 },
    PlayerHit { damage: i32, health: i32 },
    LevelUp { level: u32 },
    SpecialUsed { cleared: usize, score: u64 },
    WaveEnded { wave: u32 },
    WaveStarted { wave: u32 },
    GameOver { score: u64 },
}

/// Cosmetic effect kinds (visual only, never read back by the simulation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Spawn,
    BossSpawn,
    Hit,
    Explosion,
    BossPhase,
    PlayerHit,
    WaveStart,
    SpecialBlast,
}

/// A "spawn this effect here" request for the frontend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Playfield size
    pub field: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<PlayerBullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub director: Director,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Pending cosmetic effects, drained by the frontend
    effects: Vec<Effect>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default settings and the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_settings(Settings::default(), seed)
    }

    pub fn with_settings(settings: Settings, seed: u64) -> Self {
        let field = Vec2::new(settings.playfield_width, settings.playfield_height);
        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            elapsed: 0.0,
            player: Player::new(field),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            director: Director::new(),
            events: Vec::new(),
            effects: Vec::new(),
            next_id: 1,
        }
    }

    /// Back to lifecycle-start values (same settings, same seed)
    pub fn restart(&mut self) {
        log::info!("Restarting run (seed {})", self.seed);
        *self = Self::with_settings(self.settings.clone(), self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a cosmetic effect (dropped when effects are off or the queue is full)
    pub fn push_effect(&mut self, kind: EffectKind, pos: Vec2) {
        if self.effects.len() < self.settings.max_effects() {
            self.effects.push(Effect { kind, pos });
        }
    }

    /// Hand all queued effects to the caller
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Turn a director order into a live enemy
    pub fn spawn_enemy(&mut self, order: SpawnOrder) -> u32 {
        let id = self.next_entity_id();
        let wave_boss = order.wave_boss;
        let enemy = order.into_enemy(id);
        let center = enemy.center();
        if wave_boss {
            self.emit(GameEvent::BossSpawned {
                id,
                wave: self.director.wave,
                health: enemy.health,
            });
            self.push_effect(EffectKind::BossSpawn, center);
        } else {
            self.push_effect(EffectKind::Spawn, center);
        }
        self.emit(GameEvent::EnemySpawned {
            id,
            kind: enemy.kind,
        });
        self.enemies.push(enemy);
        id
    }

    pub fn record_phase_change(&mut self, id: u32, phase: BossPhase, pos: Vec2) {
        self.emit(GameEvent::BossPhaseChanged {
            id,
            phase: phase.number(),
        });
        self.push_effect(EffectKind::BossPhase, pos);
    }

    /// Credit experience to the player; reaching the empowered level also
    /// upgrades bullets already in flight
    pub fn grant_exp(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        let before = self.player.level;
        let gained = self.player.add_exp(amount);
        if gained == 0 {
            return;
        }
        for level in before + 1..=self.player.level {
            self.emit(GameEvent::LevelUp { level });
        }
        if self.player.is_empowered() {
            for bullet in &mut self.player_bullets {
                bullet.empower();
            }
        }
    }

    /// Special ability: wipe every live enemy for a flat per-enemy bounty.
    /// Returns the number cleared, or `None` while on cooldown.
    pub fn use_special(&mut self) -> Option<usize> {
        if !self.player.try_special() {
            return None;
        }
        let cleared = std::mem::take(&mut self.enemies);
        let mut score = 0;
        for enemy in &cleared {
            score += if enemy.kind == EnemyKind::Boss {
                SPECIAL_BOSS_SCORE
            } else {
                SPECIAL_SCORE
            };
            self.push_effect(EffectKind::Explosion, enemy.center());
        }
        self.score += score;
        self.push_effect(EffectKind::SpecialBlast, self.player.center());
        self.emit(GameEvent::SpecialUsed {
            cleared: cleared.len(),
            score,
        });
        log::info!("Special ability cleared {} enemies for {} points", cleared.len(), score);
        Some(cleared.len())
    }

    /// Drop entities that left the playfield
    pub fn prune_out_of_bounds(&mut self) {
        let field = self.field;
        self.enemies.retain(|e| e.pos.y <= field.y);
        self.player_bullets
            .retain(|b| b.pos.y >= 0.0 && b.pos.x + b.size.x >= 0.0 && b.pos.x <= field.x);
        self.enemy_bullets.retain(|b| b.pos.y <= field.y);
    }

    /// Enter the terminal game-over phase (once)
    pub fn end_run(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.emit(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over: score {} on wave {} at level {}",
            self.score,
            self.director.wave,
            self.player.level
        );
    }
}
