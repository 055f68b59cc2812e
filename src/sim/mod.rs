//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (entity vectors, insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod director;
pub mod enemy;
pub mod geometry;
pub mod movement;
pub mod player;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::{CollisionEvent, Resolution, detect, resolve};
pub use director::{Director, DirectorEvent, SpawnOrder};
pub use enemy::{BossPhase, Enemy, EnemyBullet, EnemyKind, KindStats};
pub use geometry::{Bounded, Rect};
pub use movement::MovementPattern;
pub use player::{Hit, Player, PlayerBullet, Steering};
pub use state::{Effect, EffectKind, GameEvent, GamePhase, GameState};
pub use tick::{SkipReason, TickInput, TickOutcome, tick, validate_dt};
pub use view::{Hud, IntentSource, RenderSink, Snapshot};
