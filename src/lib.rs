//! Sky Barrage - A wave-based vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, director, collisions, game state)
//! - `game`: Frame driver wiring an intent source and a render sink to the sim
//! - `settings`: Data-driven configuration (JSON)

pub mod game;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default playfield dimensions (pixels, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Longest frame delta accepted before clamping (tab suspend, debugger stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 70.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Distance of the player's spawn point from the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 100.0;
    /// Seconds between automatic volleys at level 1
    pub const PLAYER_SHOOT_RATE: f32 = 0.2;
    /// Permanent fire-rate buff per level-up, and its floor
    pub const SHOOT_RATE_STEP: f32 = 0.02;
    pub const MIN_SHOOT_RATE: f32 = 0.1;
    /// Special ability cooldown (seconds)
    pub const SPECIAL_COOLDOWN: f32 = 5.0;
    /// Invincibility window after taking a hit (seconds)
    pub const INVINCIBILITY_DURATION: f32 = 1.0;
    /// Experience needed for the first level-up, and its growth per level
    pub const BASE_EXP_TO_LEVEL: u32 = 100;
    pub const EXP_GROWTH: f32 = 1.5;
    /// Level at which player bullets deal double damage
    pub const EMPOWERED_LEVEL: u32 = 3;
    /// Most bullets in a single volley
    pub const MAX_VOLLEY: u32 = 3;
    /// Total fan angle of a multi-bullet volley (radians, 30 degrees)
    pub const VOLLEY_SPREAD: f32 = std::f32::consts::PI / 6.0;

    /// Player bullet defaults
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const BULLET_SPEED: f32 = 500.0;

    /// Enemy bullet defaults
    pub const ENEMY_BULLET_WIDTH: f32 = 6.0;
    pub const ENEMY_BULLET_HEIGHT: f32 = 12.0;
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;
    pub const ENEMY_BULLET_DAMAGE: i32 = 10;

    /// Collision outcomes
    pub const KILL_SCORE: u64 = 10;
    pub const RAM_DAMAGE: i32 = 20;
    pub const SPECIAL_SCORE: u64 = 50;
    pub const SPECIAL_BOSS_SCORE: u64 = 200;
}

/// Clamp a box's top-left x so the whole box stays inside `[0, field_width]`
#[inline]
pub fn clamp_to_field(x: f32, width: f32, field_width: f32) -> f32 {
    x.max(0.0).min((field_width - width).max(0.0))
}

/// Unit vector for an angle measured from straight up (screen space, y down)
#[inline]
pub fn heading_from_vertical(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}
