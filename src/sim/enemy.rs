//! Enemy variants, the boss phase machine, and enemy bullets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Rect};
use super::movement::{MoveContext, MovementPattern};
use crate::consts::*;

/// Closed set of enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Elite,
    Boss,
}

/// Fixed per-variant constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStats {
    pub speed: f32,
    pub health: i32,
    pub width: f32,
    pub height: f32,
    /// Seconds between shots, `None` for variants that never fire
    pub fire_interval: Option<f32>,
    /// Experience granted to the player on a kill
    pub exp: u32,
    /// Render hint (RGB)
    pub color: u32,
}

const BASIC: KindStats = KindStats {
    speed: 150.0,
    health: 1,
    width: 40.0,
    height: 40.0,
    fire_interval: None,
    exp: 10,
    color: 0xe74c3c,
};

const FAST: KindStats = KindStats {
    speed: 250.0,
    health: 1,
    width: 30.0,
    height: 30.0,
    fire_interval: None,
    exp: 15,
    color: 0xf39c12,
};

const TANK: KindStats = KindStats {
    speed: 100.0,
    health: 3,
    width: 60.0,
    height: 60.0,
    fire_interval: None,
    exp: 30,
    color: 0x34495e,
};

const ELITE: KindStats = KindStats {
    speed: 120.0,
    health: 5,
    width: 50.0,
    height: 50.0,
    fire_interval: Some(1.0),
    exp: 50,
    color: 0xff6b6b,
};

const BOSS: KindStats = KindStats {
    speed: 60.0,
    health: 50,
    width: 120.0,
    height: 100.0,
    fire_interval: Some(1.5),
    exp: 200,
    color: 0x8e44ad,
};

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Elite,
        EnemyKind::Boss,
    ];

    pub fn stats(self) -> &'static KindStats {
        match self {
            EnemyKind::Basic => &BASIC,
            EnemyKind::Fast => &FAST,
            EnemyKind::Tank => &TANK,
            EnemyKind::Elite => &ELITE,
            EnemyKind::Boss => &BOSS,
        }
    }

    /// Basic enemies are drawn and collided as circles
    pub fn is_round(self) -> bool {
        self == EnemyKind::Basic
    }

    /// Variants that render a health bar
    pub fn shows_health_bar(self) -> bool {
        matches!(self, EnemyKind::Tank | EnemyKind::Elite | EnemyKind::Boss)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Fast => "fast",
            EnemyKind::Tank => "tank",
            EnemyKind::Elite => "elite",
            EnemyKind::Boss => "boss",
        }
    }
}

/// Boss difficulty tier, advanced by health thresholds and never reverted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
    Three,
}

impl BossPhase {
    pub fn number(self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }

    /// Speed and fire interval the boss switches to on entering this phase
    fn tuning(self) -> (f32, f32) {
        match self {
            BossPhase::One => (BOSS.speed, 1.5),
            BossPhase::Two => (70.0, 1.0),
            BossPhase::Three => (80.0, 0.8),
        }
    }

    /// At most one step per evaluation: 1 -> 2 at 60% health, 2 -> 3 at 30%
    pub fn next(self, health: i32, max_health: i32) -> Option<BossPhase> {
        match self {
            BossPhase::One if health * 10 <= max_health * 6 => Some(BossPhase::Two),
            BossPhase::Two if health * 10 <= max_health * 3 => Some(BossPhase::Three),
            _ => None,
        }
    }
}

/// What an enemy produced during its update
#[derive(Debug, Default)]
pub struct EnemyUpdate {
    pub shot: Option<EnemyBullet>,
    pub phase_change: Option<BossPhase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub color: u32,
    pub pattern: MovementPattern,
    /// Entity-local clock driving the movement pattern
    pub time: f32,
    pub shoot_cooldown: f32,
    pub fire_interval: Option<f32>,
    /// Only bosses carry a phase
    pub phase: Option<BossPhase>,
}

impl Enemy {
    /// Create an enemy with its variant's base stats; elites always chase
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, pattern: MovementPattern) -> Self {
        let stats = kind.stats();
        let pattern = if kind == EnemyKind::Elite {
            MovementPattern::ChasePlayer
        } else {
            pattern
        };
        Self {
            id,
            kind,
            pos,
            size: Vec2::new(stats.width, stats.height),
            speed: stats.speed,
            health: stats.health,
            max_health: stats.health,
            color: stats.color,
            pattern,
            time: 0.0,
            shoot_cooldown: 0.0,
            fire_interval: stats.fire_interval,
            phase: (kind == EnemyKind::Boss).then_some(BossPhase::One),
        }
    }

    /// Override both current and max health
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self.max_health = health;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Move, count down the weapon, fire if ready, then evaluate the boss phase
    pub fn update(&mut self, dt: f32, target: Vec2, field: Vec2) -> EnemyUpdate {
        self.time += dt;
        let ctx = MoveContext {
            time: self.time,
            dt,
            target,
            field,
        };
        self.pattern.step(&mut self.pos, self.size, self.speed, &ctx);

        let mut out = EnemyUpdate::default();

        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
        if let Some(interval) = self.fire_interval {
            if self.shoot_cooldown <= 0.0 {
                out.shot = Some(self.shoot());
                self.shoot_cooldown = interval;
            }
        }

        out.phase_change = self.update_phase();
        out
    }

    /// Bullet leaving the enemy's bottom-center
    pub fn shoot(&self) -> EnemyBullet {
        EnemyBullet::new(Vec2::new(
            self.pos.x + self.size.x / 2.0 - ENEMY_BULLET_WIDTH / 2.0,
            self.pos.y + self.size.y,
        ))
    }

    fn update_phase(&mut self) -> Option<BossPhase> {
        let next = self.phase?.next(self.health, self.max_health)?;
        let (speed, interval) = next.tuning();
        self.phase = Some(next);
        self.speed = speed;
        self.fire_interval = Some(interval);
        log::info!(
            "Boss {} entered phase {} at {}/{} hp",
            self.id,
            next.number(),
            self.health,
            self.max_health
        );
        Some(next)
    }

    /// Subtract `amount` (floored at 0); returns true once health is gone.
    /// Removal and scoring are the caller's job.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        self.health == 0
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }
}

impl Bounded for Enemy {
    fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Downward-moving enemy shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub damage: i32,
}

impl EnemyBullet {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT),
            speed: ENEMY_BULLET_SPEED,
            damage: ENEMY_BULLET_DAMAGE,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
    }
}

impl Bounded for EnemyBullet {
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
    const FAR: Vec2 = Vec2::new(400.0, 10_000.0);

    fn boss() -> Enemy {
        Enemy::new(1, EnemyKind::Boss, Vec2::new(340.0, 50.0), MovementPattern::StraightDown)
    }

    #[test]
    fn test_variant_table() {
        let tank = Enemy::new(1, EnemyKind::Tank, Vec2::ZERO, MovementPattern::ZigZag);
        assert_eq!(tank.health, 3);
        assert_eq!(tank.size, Vec2::new(60.0, 60.0));
        assert_eq!(tank.fire_interval, None);
        assert_eq!(tank.phase, None);

        let b = boss();
        assert_eq!(b.health, 50);
        assert_eq!(b.size, Vec2::new(120.0, 100.0));
        assert_eq!(b.phase, Some(BossPhase::One));
    }

    #[test]
    fn test_elite_always_chases() {
        let elite = Enemy::new(1, EnemyKind::Elite, Vec2::ZERO, MovementPattern::SineWave);
        assert_eq!(elite.pattern, MovementPattern::ChasePlayer);
    }

    #[test]
    fn test_take_damage_signals_kill() {
        let mut tank = Enemy::new(1, EnemyKind::Tank, Vec2::ZERO, MovementPattern::StraightDown);
        assert!(!tank.take_damage(1));
        assert!(!tank.take_damage(1));
        assert!(tank.take_damage(1));
        assert!(tank.is_destroyed());

        let mut basic = Enemy::new(2, EnemyKind::Basic, Vec2::ZERO, MovementPattern::StraightDown);
        assert!(basic.take_damage(2));
        assert_eq!(basic.health, 0);
    }

    #[test]
    fn test_only_shooters_fire() {
        let mut basic = Enemy::new(1, EnemyKind::Basic, Vec2::ZERO, MovementPattern::StraightDown);
        assert!(basic.update(0.016, FAR, FIELD).shot.is_none());

        let mut elite = Enemy::new(2, EnemyKind::Elite, Vec2::new(100.0, 100.0), MovementPattern::StraightDown);
        let shot = elite.update(0.016, FAR, FIELD).shot.expect("elite fires immediately");
        assert_eq!(shot.damage, 10);
        assert!((elite.shoot_cooldown - 1.0).abs() < 1e-6);
        // Not again until the interval has elapsed
        assert!(elite.update(0.5, FAR, FIELD).shot.is_none());
    }

    #[test]
    fn test_boss_phase_thresholds_exact() {
        let mut b = boss();
        b.health = 31;
        assert!(b.update(0.01, FAR, FIELD).phase_change.is_none());
        assert_eq!(b.phase, Some(BossPhase::One));

        b.health = 30;
        assert_eq!(b.update(0.01, FAR, FIELD).phase_change, Some(BossPhase::Two));
        assert_eq!(b.speed, 70.0);
        assert_eq!(b.fire_interval, Some(1.0));

        b.health = 16;
        assert!(b.update(0.01, FAR, FIELD).phase_change.is_none());

        b.health = 15;
        assert_eq!(b.update(0.01, FAR, FIELD).phase_change, Some(BossPhase::Three));
        assert_eq!(b.speed, 80.0);
        assert_eq!(b.fire_interval, Some(0.8));
    }

    #[test]
    fn test_boss_phase_never_reverts() {
        let mut b = boss();
        b.health = 10;
        b.update(0.01, FAR, FIELD);
        b.update(0.01, FAR, FIELD);
        assert_eq!(b.phase, Some(BossPhase::Three));

        b.health = 50;
        assert!(b.update(0.01, FAR, FIELD).phase_change.is_none());
        assert_eq!(b.phase, Some(BossPhase::Three));
    }

    #[test]
    fn test_one_phase_step_per_tick() {
        let mut b = boss();
        b.health = 5;
        assert_eq!(b.update(0.01, FAR, FIELD).phase_change, Some(BossPhase::Two));
        assert_eq!(b.update(0.01, FAR, FIELD).phase_change, Some(BossPhase::Three));
    }

    proptest! {
        #[test]
        fn prop_phase_monotonic(healths in prop::collection::vec(-10i32..=60, 1..40)) {
            let mut b = boss();
            let mut last = BossPhase::One;
            for h in healths {
                b.health = h;
                b.update(0.01, FAR, FIELD);
                let phase = b.phase.unwrap();
                prop_assert!(phase >= last);
                last = phase;
            }
        }
    }
}
