//! Frame driver
//!
//! One call to [`tick`] runs the whole ordered pipeline for a frame:
//! match clock → ball and car integration → car–ball contacts → car–car
//! demolitions → wall confinement (once per entity) → goal check → pads →
//! pad and respawn timers.

use super::match_state::{GamePhase, PhaseChange};
use super::state::{ControlIntent, GameEvent, World};
use super::{ball, boost, car, collision, demolition};
use super::control::ControlSource;
use crate::consts::*;

/// Controls for one frame, in car order (missing entries coast)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub controls: Vec<ControlIntent>,
}

impl TickInput {
    /// Ask each source for its car's intent; `sources[i]` drives `world.cars[i]`
    pub fn from_sources(world: &World, sources: &mut [Box<dyn ControlSource>]) -> Self {
        let controls = world
            .cars
            .iter()
            .zip(sources.iter_mut())
            .map(|(car, source)| source.produce_intent(car, world))
            .collect();
        Self { controls }
    }
}

/// Advance the world by `dt` seconds
///
/// Non-finite or non-positive `dt` is ignored; long frames are capped at
/// [`MAX_FRAME_DT`].
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let dt = dt.min(MAX_FRAME_DT);
    world.time_ticks += 1;

    for (i, car) in world.cars.iter_mut().enumerate() {
        car.intent = if car.demolished {
            ControlIntent::default()
        } else {
            input.controls.get(i).copied().unwrap_or_default()
        };
    }

    if let Some(change) = world.match_state.advance(dt, &mut world.events) {
        on_phase_change(world, change);
    }

    match world.match_state.phase {
        GamePhase::Menu | GamePhase::GameOver => return,
        GamePhase::Countdown => countdown_frame(world, dt),
        GamePhase::Playing => play_frame(world, dt),
        GamePhase::Goal | GamePhase::OvertimeAnnounce => {}
    }

    boost::tick_pads(&mut world.pads, dt, &mut world.events);
    demolition::tick_respawns(world, dt);
}

/// Kickoff countdown: ball pinned, cars optionally driving
fn countdown_frame(world: &mut World, dt: f32) {
    ball::freeze(&mut world.ball);
    if world.settings.cars_move_during_countdown {
        let unlimited = world.settings.unlimited_boost();
        for c in world.cars.iter_mut() {
            car::drive(c, dt, unlimited);
            car::confine(c, &world.bounds);
        }
    }
}

/// Full physics frame
fn play_frame(world: &mut World, dt: f32) {
    let unlimited = world.settings.unlimited_boost();

    ball::integrate(&mut world.ball, &world.bounds, dt);
    for c in world.cars.iter_mut() {
        car::drive(c, dt, unlimited);
    }

    for c in &world.cars {
        if collision::resolve_car_ball(c, &mut world.ball.body) {
            world.events.push(GameEvent::BallTouched { car_id: c.id });
        }
    }
    demolition::apply_car_demolitions(world);

    for c in world.cars.iter_mut() {
        car::confine(c, &world.bounds);
    }
    ball::confine(&mut world.ball, &world.bounds);

    if let Some(scorer) = ball::goal_crossed(&world.ball, &world.bounds) {
        if let Some(change) = world.match_state.on_goal(scorer, &mut world.events) {
            on_phase_change(world, change);
        }
    }

    boost::collect_pads(world);
}

fn on_phase_change(world: &mut World, change: PhaseChange) {
    match (change.from, change.to) {
        (GamePhase::Goal | GamePhase::OvertimeAnnounce, GamePhase::Playing) => {
            world.reset_kickoff();
        }
        (GamePhase::Playing, GamePhase::Goal) => {
            for c in world.cars.iter_mut() {
                c.boosting = false;
            }
        }
        _ => {}
    }
}

/// Fixed-step accumulator for hosts with variable frame times
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    /// Number of [`SIM_DT`] steps to run for a host frame of `frame_dt` seconds
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        steps
    }
}
