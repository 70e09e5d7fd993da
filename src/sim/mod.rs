//! Frame-driven simulation module
//!
//! All gameplay logic lives here. The host calls [`tick`] once per frame and
//! reads a [`Snapshot`] back:
//! - Frame times are clamped, never trusted blindly
//! - Seeded RNG only (respawn spot choice)
//! - Stable iteration order (cars by id, pads by id)
//! - No rendering or platform dependencies

pub mod arena;
pub mod ball;
pub mod boost;
pub mod car;
pub mod collision;
pub mod control;
pub mod demolition;
pub mod match_state;
pub mod state;
pub mod tick;

pub use arena::{ArenaBounds, BoundaryContact, EndWalls, WallAxis, WallResponse};
pub use control::{BallChaser, ControlSource, HeldKeys, Key};
pub use demolition::{trigger_demo, trigger_demo_on};
pub use match_state::{GamePhase, MatchState, Outcome, PhaseChange, Score};
pub use state::{
    Ball, BoostPad, CarState, ControlIntent, GameEvent, RigidBody, Snapshot, Team, World,
};
pub use tick::{FrameClock, TickInput, tick};
