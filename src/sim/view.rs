//! Read-only views handed to frontends, and the two frontend seams

use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyBullet};
use super::player::{Player, PlayerBullet};
use super::state::{Effect, GamePhase, GameState};
use super::tick::TickInput;

/// Values shown by the score/health/wave overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub health: i32,
    pub max_health: i32,
    pub wave: u32,
    pub seconds_until_next_wave: f32,
    /// Set while between waves
    pub wave_message: Option<String>,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next_level: u32,
    /// Seconds until the special ability is ready (0 when ready)
    pub special_cooldown: f32,
    pub paused: bool,
    pub game_over: bool,
}

/// Everything a renderer needs for one frame. Borrowed, so it cannot be mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub player_bullets: &'a [PlayerBullet],
    pub enemy_bullets: &'a [EnemyBullet],
    pub hud: Hud,
}

impl Snapshot<'_> {
    /// Enemies that draw a health bar, with their remaining health fraction
    pub fn health_bars(&self) -> impl Iterator<Item = (&Enemy, f32)> + '_ {
        self.enemies
            .iter()
            .filter(|e| e.kind.shows_health_bar())
            .map(|e| (e, e.health as f32 / e.max_health.max(1) as f32))
    }
}

/// Receives a snapshot every frame; never consulted by the simulation
pub trait RenderSink {
    fn present(&mut self, snapshot: &Snapshot<'_>, effects: &[Effect]);
}

/// Supplies the player's intent for the next tick
pub trait IntentSource {
    fn sample(&mut self, snapshot: &Snapshot<'_>) -> TickInput;
}

impl GameState {
    pub fn hud(&self) -> Hud {
        let director = &self.director;
        let wave_message = director.in_intermission().then(|| {
            format!(
                "Wave {} cleared! Next wave in {}s",
                director.wave,
                director.wave_end_timer.ceil() as u32
            )
        });
        Hud {
            score: self.score,
            health: self.player.health,
            max_health: self.player.max_health,
            wave: director.wave,
            seconds_until_next_wave: director.seconds_until_next_wave(),
            wave_message,
            level: self.player.level,
            exp: self.player.exp,
            exp_to_next_level: self.player.exp_to_next_level,
            special_cooldown: self.player.special_cooldown,
            paused: self.phase == GamePhase::Paused,
            game_over: self.phase == GamePhase::GameOver,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player: &self.player,
            enemies: &self.enemies,
            player_bullets: &self.player_bullets,
            enemy_bullets: &self.enemy_bullets,
            hud: self.hud(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::movement::MovementPattern;
    use glam::Vec2;

    #[test]
    fn test_hud_fresh_run() {
        let state = GameState::new(1);
        let hud = state.hud();
        assert_eq!(hud.score, 0);
        assert_eq!(hud.health, 100);
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.exp_to_next_level, 100);
        assert_eq!(hud.seconds_until_next_wave, 30.0);
        assert!(hud.wave_message.is_none());
        assert!(!hud.paused && !hud.game_over);
    }

    #[test]
    fn test_hud_intermission_message() {
        let mut state = GameState::new(1);
        state.director.wave_end_timer = 2.4;
        let hud = state.hud();
        assert_eq!(
            hud.wave_message.as_deref(),
            Some("Wave 1 cleared! Next wave in 3s")
        );
        assert!((hud.seconds_until_next_wave - 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(1);
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["hud"]["health"], 100);
        assert!(json["enemies"].as_array().unwrap().is_empty());
        assert!(json["player"]["pos"].is_array());
    }

    #[test]
    fn test_health_bars_for_armoured_kinds() {
        let mut state = GameState::new(1);
        for (id, kind) in EnemyKind::ALL.into_iter().enumerate() {
            state.enemies.push(Enemy::new(
                id as u32,
                kind,
                Vec2::new(100.0 * id as f32, 50.0),
                MovementPattern::StraightDown,
            ));
        }
        state.enemies[2].health = 1;
        let snapshot = state.snapshot();
        let bars: Vec<(EnemyKind, f32)> = snapshot
            .health_bars()
            .map(|(e, fraction)| (e.kind, fraction))
            .collect();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].0, EnemyKind::Tank);
        assert!((bars[0].1 - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(bars[1], (EnemyKind::Elite, 1.0));
        assert_eq!(bars[2], (EnemyKind::Boss, 1.0));
    }
}
