//! Boost Ball - two-team vehicular soccer in a rounded arena
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (arena geometry, ball and car physics,
//!   collisions, boost pads, demolitions, match state machine)
//! - `settings`: Match configuration chosen before kickoff
//! - `web`: Browser bridge for the JS renderer/HUD (wasm32 only)

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{BoostMode, MatchSettings, Stadium, TeamSize};

use glam::{Vec2, Vec3};

/// Game configuration constants
///
/// Units are arena meters and seconds. `x` is lateral, `y` is up and `z`
/// runs along the field toward the goals.
pub mod consts {
    /// Nominal frame timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest frame the driver will integrate in one go (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 6;

    /// Standard stadium dimensions (full extents)
    pub const FIELD_WIDTH: f32 = 80.0;
    pub const FIELD_LENGTH: f32 = 120.0;
    pub const CORNER_RADIUS: f32 = 12.0;
    pub const GOAL_WIDTH: f32 = 18.0;
    pub const WALL_HEIGHT: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 1.5;
    pub const GRAVITY: f32 = 25.0;
    /// Fraction of vertical speed kept on a ground bounce
    pub const BALL_RESTITUTION: f32 = 0.6;
    /// Fraction of normal speed kept when bouncing off walls and corners
    pub const BALL_WALL_RESTITUTION: f32 = 0.8;
    /// Hard speed cap applied after every integration
    pub const BALL_MAX_SPEED: f32 = 50.0;
    /// Horizontal speed lost per second while rolling on the ground
    pub const BALL_ROLL_DRAG: f32 = 0.35;
    /// Bounces slower than this settle the ball onto the ground
    pub const BALL_SETTLE_SPEED: f32 = 1.0;

    /// Car body
    pub const CAR_HALF_WIDTH: f32 = 1.2;
    pub const CAR_LENGTH: f32 = 3.6;
    pub const CAR_RIDE_HEIGHT: f32 = 0.5;
    /// Car handling
    pub const CAR_ACCEL: f32 = 28.0;
    pub const CAR_REVERSE_ACCEL: f32 = 18.0;
    pub const CAR_BRAKE: f32 = 45.0;
    pub const CAR_COAST_DRAG: f32 = 6.0;
    pub const CAR_MAX_SPEED: f32 = 22.0;
    pub const CAR_MAX_REVERSE_SPEED: f32 = 10.0;
    /// Radians per second at full steering lock
    pub const CAR_TURN_RATE: f32 = 2.6;
    /// Exponential decay rate of sideways slip
    pub const CAR_GRIP: f32 = 8.0;
    pub const JUMP_VELOCITY: f32 = 10.0;

    /// Boost
    pub const BOOST_MAX: f32 = 100.0;
    pub const BOOST_SPAWN_AMOUNT: f32 = 33.0;
    pub const BOOST_DRAIN_PER_SEC: f32 = 33.0;
    pub const BOOST_ACCEL: f32 = 22.0;
    /// Top speed multiplier while boosting
    pub const BOOST_MULTIPLIER: f32 = 1.5;
    pub const SMALL_PAD_AMOUNT: f32 = 12.0;
    pub const BIG_PAD_PICKUP_RADIUS: f32 = 2.5;
    pub const SMALL_PAD_PICKUP_RADIUS: f32 = 1.8;
    pub const BIG_PAD_RESPAWN_SECS: f32 = 10.0;
    pub const SMALL_PAD_RESPAWN_SECS: f32 = 4.0;

    /// Car-ball contact
    /// Center distance below which a car touches the ball
    pub const MIN_SEPARATION: f32 = BALL_RADIUS + CAR_LENGTH * 0.6;
    /// Contacts closer than this are degenerate and ignored
    pub const COLLISION_EPSILON: f32 = 1.0e-4;
    /// Weight of the car's travel direction in the hit direction
    pub const HEADING_BLEND: f32 = 0.35;
    /// Ball speed gained per unit of car speed
    pub const HIT_SPEED_FACTOR: f32 = 1.4;
    /// Smallest impulse a touch can give (stationary cars still nudge)
    pub const MIN_HIT_IMPULSE: f32 = 6.0;

    /// Demolition
    pub const DEMO_RESPAWN_SECS: f32 = 3.0;
    /// Attacker speed needed to demolish an opponent
    pub const DEMO_SPEED: f32 = 25.0;

    /// Match timing
    pub const COUNTDOWN_SECS: f32 = 3.0;
    pub const GOAL_CELEBRATION_SECS: f32 = 3.0;
    pub const OVERTIME_ANNOUNCE_SECS: f32 = 2.0;
    pub const DEFAULT_MATCH_SECS: f32 = 300.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Project a world position onto the ground plane as (x, z)
#[inline]
pub fn flat(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Unit forward vector for a heading (0 faces +z, positive turns toward +x)
#[inline]
pub fn heading_dir(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}
