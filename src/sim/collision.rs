//! Collision detection and resolution
//!
//! Detection only reads the game state and produces an ordered event list.
//! Resolution consumes that list, applies damage and scoring, and removes
//! every marked entity in one pass so no index is skipped or removed twice.

use std::collections::BTreeSet;

use super::enemy::{Enemy, EnemyKind};
use super::geometry::{Bounded, Rect, boxes_overlap, circles_overlap, corners_in_circle};
use super::player::Hit;
use super::state::{EffectKind, GameEvent, GameState};
use crate::consts::*;

/// A detected overlap, referencing entities by index into their collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Player bullet touching an enemy
    BulletEnemy { bullet: usize, enemy: usize },
    /// Player ramming an enemy
    PlayerEnemy { enemy: usize },
    /// Enemy bullet touching the player
    EnemyBulletPlayer { bullet: usize },
}

impl CollisionEvent {
    /// Resolution order between event kinds
    fn rank(&self) -> u8 {
        match self {
            CollisionEvent::BulletEnemy { .. } => 0,
            CollisionEvent::PlayerEnemy { .. } => 1,
            CollisionEvent::EnemyBulletPlayer { .. } => 2,
        }
    }
}

/// What a resolution pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub score_delta: u64,
    pub exp_gained: u32,
    pub player_damaged: bool,
    pub game_over: bool,
    pub removed_bullets: BTreeSet<usize>,
    pub removed_enemies: BTreeSet<usize>,
    pub removed_enemy_bullets: BTreeSet<usize>,
}

/// Player bullet vs enemy. Basic enemies test the bullet's corners against
/// their circle; everything else uses box overlap.
pub fn bullet_hits_enemy(bullet: &Rect, enemy: &Enemy) -> bool {
    let target = enemy.rect();
    if enemy.kind.is_round() {
        corners_in_circle(bullet, &target)
    } else {
        boxes_overlap(bullet, &target)
    }
}

/// Player vs enemy. Basic enemies use circle-vs-circle; everything else box overlap.
pub fn player_hits_enemy(player: &Rect, enemy: &Enemy) -> bool {
    let target = enemy.rect();
    if enemy.kind.is_round() {
        circles_overlap(player, &target)
    } else {
        boxes_overlap(player, &target)
    }
}

/// Scan all pairings: bullet-enemy, then player-enemy, then enemy bullet-player
pub fn detect(state: &GameState) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for (bullet_idx, bullet) in state.player_bullets.iter().enumerate() {
        let rect = bullet.rect();
        for (enemy_idx, enemy) in state.enemies.iter().enumerate() {
            if bullet_hits_enemy(&rect, enemy) {
                events.push(CollisionEvent::BulletEnemy {
                    bullet: bullet_idx,
                    enemy: enemy_idx,
                });
            }
        }
    }

    let player = state.player.rect();
    for (enemy_idx, enemy) in state.enemies.iter().enumerate() {
        if player_hits_enemy(&player, enemy) {
            events.push(CollisionEvent::PlayerEnemy { enemy: enemy_idx });
        }
    }

    for (bullet_idx, bullet) in state.enemy_bullets.iter().enumerate() {
        if boxes_overlap(&bullet.rect(), &player) {
            events.push(CollisionEvent::EnemyBulletPlayer { bullet: bullet_idx });
        }
    }

    events
}

/// Apply an event list to the state.
///
/// The list is consumed: indices go stale once entities are removed, so the
/// same list can never be resolved twice. Repeated bullet-enemy pairs and
/// events naming an out-of-range entity are skipped; a bullet that reaches
/// an enemy already killed this pass is consumed without scoring.
pub fn resolve(state: &mut GameState, mut events: Vec<CollisionEvent>) -> Resolution {
    let mut res = Resolution::default();
    let mut applied = BTreeSet::new();
    events.sort_by_key(CollisionEvent::rank);

    for event in events {
        match event {
            CollisionEvent::BulletEnemy { bullet, enemy } => {
                let Some(damage) = state.player_bullets.get(bullet).map(|b| b.damage) else {
                    continue;
                };
                if !applied.insert((bullet, enemy)) {
                    continue;
                }
                // A bullet damages every enemy it overlaps, then goes away
                res.removed_bullets.insert(bullet);
                if res.removed_enemies.contains(&enemy) {
                    continue;
                }
                let Some(target) = state.enemies.get_mut(enemy) else {
                    continue;
                };
                let killed = target.take_damage(damage);
                let (id, kind, center) = (target.id, target.kind, target.center());
                if killed {
                    res.removed_enemies.insert(enemy);
                    res.score_delta += KILL_SCORE;
                    res.exp_gained += kind.stats().exp;
                    state.emit(GameEvent::EnemyDestroyed {
                        id,
                        kind,
                        score: KILL_SCORE,
                    });
                    state.push_effect(EffectKind::Explosion, center);
                    if kind == EnemyKind::Boss {
                        log::info!("Boss {} destroyed", id);
                    }
                } else {
                    state.push_effect(EffectKind::Hit, center);
                }
            }
            CollisionEvent::PlayerEnemy { enemy } => {
                if enemy >= state.enemies.len() {
                    continue;
                }
                // The ram lands even if a bullet already killed this enemy
                res.removed_enemies.insert(enemy);
                damage_player(state, RAM_DAMAGE, &mut res);
            }
            CollisionEvent::EnemyBulletPlayer { bullet } => {
                let Some(damage) = state.enemy_bullets.get(bullet).map(|b| b.damage) else {
                    continue;
                };
                if !res.removed_enemy_bullets.insert(bullet) {
                    continue;
                }
                damage_player(state, damage, &mut res);
            }
        }
    }

    remove_indices(&mut state.player_bullets, &res.removed_bullets);
    remove_indices(&mut state.enemies, &res.removed_enemies);
    remove_indices(&mut state.enemy_bullets, &res.removed_enemy_bullets);

    state.score += res.score_delta;
    state.grant_exp(res.exp_gained);

    if res.game_over {
        state.end_run();
    }

    res
}

fn damage_player(state: &mut GameState, amount: i32, res: &mut Resolution) {
    match state.player.take_damage(amount) {
        Hit::Ignored => {}
        hit => {
            res.player_damaged = true;
            state.emit(GameEvent::PlayerHit {
                damage: amount,
                health: state.player.health,
            });
            state.push_effect(EffectKind::PlayerHit, state.player.center());
            if hit == Hit::Fatal {
                res.game_over = true;
            }
        }
    }
}

/// Remove the given indices, highest first; out-of-range indices are ignored
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &BTreeSet<usize>) {
    for &idx in indices.iter().rev() {
        if idx < items.len() {
            items.remove(idx);
        }
    }
}
