//! Player craft: movement, automatic fire, progression and the damage gate

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Rect};
use crate::consts::*;
use crate::{clamp_to_field, heading_from_vertical};

/// Outcome of a damage call against the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Blocked by the invincibility window
    Ignored,
    /// Damage applied, player still alive
    Applied,
    /// Damage applied and health reached zero
    Fatal,
}

/// Player movement intent (four independent axes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub steering: Steering,
    pub shoot_cooldown: f32,
    /// Seconds between volleys (shrinks with each level-up)
    pub shoot_rate: f32,
    pub special_cooldown: f32,
    pub special_rate: f32,
    pub invincible: bool,
    pub invincible_timer: f32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next_level: u32,
}

impl Player {
    /// Spawn centered horizontally, a fixed distance above the bottom edge
    pub fn new(field: Vec2) -> Self {
        Self {
            pos: Vec2::new(
                (field.x - PLAYER_WIDTH) / 2.0,
                field.y - PLAYER_SPAWN_OFFSET,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            steering: Steering::default(),
            shoot_cooldown: 0.0,
            shoot_rate: PLAYER_SHOOT_RATE,
            special_cooldown: 0.0,
            special_rate: SPECIAL_COOLDOWN,
            invincible: false,
            invincible_timer: 0.0,
            level: 1,
            exp: 0,
            exp_to_next_level: BASE_EXP_TO_LEVEL,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Apply steering, keep inside the field, run down timers, and fire when ready.
    /// Returns the volley fired this tick (empty when still cooling down).
    pub fn update(&mut self, dt: f32, field: Vec2) -> Vec<PlayerBullet> {
        let step = self.speed * dt;
        if self.steering.left {
            self.pos.x -= step;
        }
        if self.steering.right {
            self.pos.x += step;
        }
        if self.steering.up {
            self.pos.y -= step;
        }
        if self.steering.down {
            self.pos.y += step;
        }
        self.pos.x = clamp_to_field(self.pos.x, self.size.x, field.x);
        self.pos.y = clamp_to_field(self.pos.y, self.size.y, field.y);

        self.advance_timers(dt);

        if self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = self.shoot_rate;
            self.volley()
        } else {
            Vec::new()
        }
    }

    /// Count down weapon, special and invincibility timers
    pub fn advance_timers(&mut self, dt: f32) {
        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
        if self.special_cooldown > 0.0 {
            self.special_cooldown = (self.special_cooldown - dt).max(0.0);
        }
        if self.invincible {
            self.invincible_timer -= dt;
            if self.invincible_timer <= 0.0 {
                self.invincible = false;
                self.invincible_timer = 0.0;
            }
        }
    }

    /// Bullets per volley: one per level, capped
    pub fn volley_size(&self) -> u32 {
        self.level.clamp(1, MAX_VOLLEY)
    }

    pub fn is_empowered(&self) -> bool {
        self.level >= EMPOWERED_LEVEL
    }

    /// A symmetric fan of bullets from the nose of the craft
    pub fn volley(&self) -> Vec<PlayerBullet> {
        let count = self.volley_size();
        let origin = Vec2::new(self.pos.x + self.size.x / 2.0 - BULLET_WIDTH / 2.0, self.pos.y);
        (0..count)
            .map(|i| {
                let angle = if count == 1 {
                    0.0
                } else {
                    -VOLLEY_SPREAD / 2.0 + VOLLEY_SPREAD * i as f32 / (count - 1) as f32
                };
                let mut bullet = PlayerBullet::new(origin, heading_from_vertical(angle) * BULLET_SPEED);
                if self.is_empowered() {
                    bullet.empower();
                }
                bullet
            })
            .collect()
    }

    /// Damage gate: no-op while invincible, otherwise subtract (floored at 0)
    /// and open the invincibility window
    pub fn take_damage(&mut self, amount: i32) -> Hit {
        if self.invincible {
            return Hit::Ignored;
        }
        self.health = (self.health - amount).max(0);
        self.invincible = true;
        self.invincible_timer = INVINCIBILITY_DURATION;
        if self.health == 0 {
            Hit::Fatal
        } else {
            Hit::Applied
        }
    }

    /// Add experience, levelling up as many times as it covers.
    /// Returns the number of levels gained.
    pub fn add_exp(&mut self, amount: u32) -> u32 {
        self.exp += amount;
        let mut gained = 0;
        while self.exp >= self.exp_to_next_level {
            self.exp -= self.exp_to_next_level;
            self.level_up();
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.exp_to_next_level = (self.exp_to_next_level as f32 * EXP_GROWTH).round() as u32;
        self.health = self.max_health;
        self.shoot_rate = (self.shoot_rate - SHOOT_RATE_STEP).max(MIN_SHOOT_RATE);
        log::info!(
            "Player reached level {} (next at {} exp, shoot rate {:.2}s)",
            self.level,
            self.exp_to_next_level,
            self.shoot_rate
        );
    }

    pub fn special_ready(&self) -> bool {
        self.special_cooldown <= 0.0
    }

    /// Start the special ability cooldown; false if it was not ready
    pub fn try_special(&mut self) -> bool {
        if !self.special_ready() {
            return false;
        }
        self.special_cooldown = self.special_rate;
        true
    }
}

impl Bounded for Player {
    fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Upward-moving player shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed (pixels/s, positive)
    pub speed: f32,
    /// Horizontal drift (pixels/s), non-zero only inside a spread volley
    pub drift: f32,
    pub damage: i32,
    /// Visual tier flag for upgraded bullets
    pub empowered: bool,
}

impl PlayerBullet {
    pub fn new(pos: Vec2, velocity: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed: -velocity.y,
            drift: velocity.x,
            damage: 1,
            empowered: false,
        }
    }

    pub fn empower(&mut self) {
        self.damage = 2;
        self.empowered = true;
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y -= self.speed * dt;
        self.pos.x += self.drift * dt;
    }
}

impl Bounded for PlayerBullet {
    fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_spawn_position() {
        let p = Player::new(FIELD);
        assert_eq!(p.pos, Vec2::new(375.0, 500.0));
        assert_eq!(p.health, 100);
        assert_eq!(p.level, 1);
    }

    #[test]
    fn test_invincibility_scenario() {
        let mut p = Player::new(FIELD);
        assert_eq!(p.take_damage(20), Hit::Applied);
        p.advance_timers(0.1);
        assert_eq!(p.take_damage(20), Hit::Ignored);
        assert_eq!(p.health, 80);

        p.advance_timers(1.1);
        assert_eq!(p.take_damage(20), Hit::Applied);
        assert_eq!(p.health, 60);
    }

    #[test]
    fn test_fatal_hit_floors_at_zero() {
        let mut p = Player::new(FIELD);
        p.health = 15;
        assert_eq!(p.take_damage(20), Hit::Fatal);
        assert_eq!(p.health, 0);
    }

    #[test]
    fn test_movement_clamped() {
        let mut p = Player::new(FIELD);
        p.pos = Vec2::new(2.0, 2.0);
        p.steering = Steering {
            left: true,
            up: true,
            ..Default::default()
        };
        p.update(0.1, FIELD);
        assert_eq!(p.pos, Vec2::ZERO);

        p.steering = Steering {
            right: true,
            down: true,
            ..Default::default()
        };
        for _ in 0..100 {
            p.update(0.1, FIELD);
        }
        assert_eq!(p.pos, Vec2::new(750.0, 530.0));
    }

    #[test]
    fn test_auto_fire_cadence() {
        let mut p = Player::new(FIELD);
        assert_eq!(p.update(0.05, FIELD).len(), 1);
        assert!(p.update(0.1, FIELD).is_empty());
        // 0.25s since the first shot, past the 0.2s rate
        assert_eq!(p.update(0.15, FIELD).len(), 1);
    }

    #[test]
    fn test_volley_spread_is_symmetric() {
        let mut p = Player::new(FIELD);
        p.level = 3;
        let volley = p.volley();
        assert_eq!(volley.len(), 3);
        assert!((volley[0].drift + volley[2].drift).abs() < 1e-3);
        assert!(volley[1].drift.abs() < 1e-3);
        assert!(volley[0].drift < 0.0);
        assert!(volley.iter().all(|b| b.damage == 2 && b.empowered));

        p.level = 7;
        assert_eq!(p.volley().len(), 3);
    }

    #[test]
    fn test_level_up_carries_exp() {
        let mut p = Player::new(FIELD);
        p.health = 40;
        assert_eq!(p.add_exp(130), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.exp, 30);
        assert_eq!(p.exp_to_next_level, 150);
        assert_eq!(p.health, 100);
        assert!((p.shoot_rate - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_multi_level_grant() {
        let mut p = Player::new(FIELD);
        // 100 + 150 = 250 covers two levels
        assert_eq!(p.add_exp(260), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.exp, 10);
        assert_eq!(p.exp_to_next_level, 225);
    }

    #[test]
    fn test_shoot_rate_floor() {
        let mut p = Player::new(FIELD);
        for _ in 0..20 {
            let need = p.exp_to_next_level - p.exp;
            p.add_exp(need);
        }
        assert!((p.shoot_rate - MIN_SHOOT_RATE).abs() < 1e-6);
    }

    #[test]
    fn test_special_cooldown_gate() {
        let mut p = Player::new(FIELD);
        assert!(p.try_special());
        assert!(!p.try_special());
        p.advance_timers(4.9);
        assert!(!p.try_special());
        p.advance_timers(0.2);
        assert!(p.try_special());
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(
            hits in prop::collection::vec((0i32..60, 0.0f32..2.0), 1..30)
        ) {
            let mut p = Player::new(FIELD);
            for (amount, gap) in hits {
                p.take_damage(amount);
                p.advance_timers(gap);
                prop_assert!(p.health >= 0 && p.health <= p.max_health);
            }
        }
    }
}
