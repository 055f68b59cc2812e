//! Enemy movement strategies
//!
//! A pattern is picked once when an enemy spawns and stays bound to it.
//! Every pattern is a pure function of the entity-local clock and the frame
//! delta; the only outside state it reads is the chase target.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clamp_to_field;

/// Sine-wave horizontal amplitude (pixels/s) and angular rate
const SINE_AMPLITUDE: f32 = 100.0;
const SINE_RATE: f32 = 2.0;
/// Zig-zag horizontal speed and half-period length
const ZIGZAG_SPEED: f32 = 200.0;
const ZIGZAG_PERIOD: f32 = 2.0;
/// Chasers stop short of the target to avoid jitter
const CHASE_DEAD_ZONE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    StraightDown,
    SineWave,
    ZigZag,
    ChasePlayer,
}

/// Everything a pattern may look at besides the mover itself
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Entity-local elapsed time (already advanced for this tick)
    pub time: f32,
    pub dt: f32,
    /// Center of the chase target
    pub target: Vec2,
    pub field: Vec2,
}

impl MovementPattern {
    /// The three patterns a regular spawn picks from
    pub const WANDERING: [MovementPattern; 3] = [
        MovementPattern::StraightDown,
        MovementPattern::SineWave,
        MovementPattern::ZigZag,
    ];

    /// Uniform pick among the wandering patterns
    pub fn random_wandering(rng: &mut impl Rng) -> Self {
        Self::WANDERING[rng.random_range(0..Self::WANDERING.len())]
    }

    /// Advance `pos` (top-left of a `size` box) moving at `speed`
    pub fn step(self, pos: &mut Vec2, size: Vec2, speed: f32, ctx: &MoveContext) {
        match self {
            MovementPattern::StraightDown => {
                pos.y += speed * ctx.dt;
            }
            MovementPattern::SineWave => {
                pos.y += speed * ctx.dt;
                pos.x += (ctx.time * SINE_RATE).sin() * SINE_AMPLITUDE * ctx.dt;
                pos.x = clamp_to_field(pos.x, size.x, ctx.field.x);
            }
            MovementPattern::ZigZag => {
                pos.y += speed * ctx.dt;
                let half_period = (ctx.time / ZIGZAG_PERIOD).floor() as i64;
                if half_period % 2 == 0 {
                    pos.x += ZIGZAG_SPEED * ctx.dt;
                } else {
                    pos.x -= ZIGZAG_SPEED * ctx.dt;
                }
                pos.x = clamp_to_field(pos.x, size.x, ctx.field.x);
            }
            MovementPattern::ChasePlayer => {
                let center = *pos + size * 0.5;
                let delta = ctx.target - center;
                let distance = delta.length();
                if distance > CHASE_DEAD_ZONE {
                    *pos += delta / distance * speed * ctx.dt;
                }
                pos.x = clamp_to_field(pos.x, size.x, ctx.field.x);
                pos.y = clamp_to_field(pos.y, size.y, ctx.field.y);
            }
        }
    }
}
