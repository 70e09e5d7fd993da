//! Demolitions and respawns
//!
//! A demolished car is hidden and inert until its respawn timer runs out,
//! then it reappears at one of its team's respawn spots.

use glam::Vec3;

use super::collision::find_demolitions;
use super::state::{GameEvent, World};
use crate::consts::*;

/// Demolish car `car_id`. Returns false if it doesn't exist or is already down.
pub fn trigger_demo(world: &mut World, car_id: u32, by: Option<u32>) -> bool {
    let Some(car) = world.car_mut(car_id) else {
        return false;
    };
    if car.demolished {
        return false;
    }

    car.demolished = true;
    car.visible = false;
    car.boosting = false;
    car.body.velocity = Vec3::ZERO;
    car.demo_respawn_timer = DEMO_RESPAWN_SECS;

    log::debug!("Car {} demolished by {:?}", car_id, by);
    world.events.push(GameEvent::CarDemolished { car_id, by });
    true
}

/// Demolish the player's car, or the first opposing AI car
pub fn trigger_demo_on(world: &mut World, is_player: bool) -> bool {
    let target = world
        .cars
        .iter()
        .find(|c| {
            if is_player {
                c.is_player
            } else {
                !c.is_player && world.player_car().is_some_and(|p| p.team != c.team)
            }
        })
        .map(|c| c.id);
    target.is_some_and(|id| trigger_demo(world, id, None))
}

/// Apply car-on-car demolitions for this frame
pub fn apply_car_demolitions(world: &mut World) {
    for (attacker, victim) in find_demolitions(&world.cars) {
        trigger_demo(world, victim, Some(attacker));
    }
}

/// Count down demolished cars and respawn those whose timer ran out
pub fn tick_respawns(world: &mut World, dt: f32) {
    let mut ready = Vec::new();
    for car in world.cars.iter_mut().filter(|c| c.demolished) {
        car.demo_respawn_timer -= dt;
        if car.demo_respawn_timer <= 0.0 {
            ready.push((car.id, car.team));
        }
    }

    for (car_id, team) in ready {
        let spot = world.pick_respawn_spot(team);
        if let Some(car) = world.car_mut(car_id) {
            car.respawn_at(spot);
            log::debug!("Car {} respawned at {:?}", car_id, spot);
            world.events.push(GameEvent::CarRespawned { car_id });
        }
    }
}
