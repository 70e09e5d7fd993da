//! Boost pads: layout, pickups and respawn timers

use glam::Vec2;

use super::arena::ArenaBounds;
use super::state::{BoostPad, CarState, GameEvent, World};
use crate::consts::*;
use crate::flat;

/// Pad layout for an arena: big pads in the corners and at midfield on the
/// side walls, small pads scattered over the field
pub fn pad_layout(bounds: &ArenaBounds) -> Vec<BoostPad> {
    let hw = bounds.half_width();
    let hl = bounds.half_length();
    let r = bounds.corner_radius;

    let mut big = vec![
        Vec2::new(-(hw - 4.0), 0.0),
        Vec2::new(hw - 4.0, 0.0),
    ];
    for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        let center = Vec2::new(sx * (hw - r), sz * (hl - r));
        big.push(center + Vec2::new(sx, sz).normalize() * (r * 0.5));
    }

    let small = [
        Vec2::new(0.0, -hl * 0.7),
        Vec2::new(0.0, hl * 0.7),
        Vec2::new(-hw * 0.5, 0.0),
        Vec2::new(hw * 0.5, 0.0),
        Vec2::new(-hw * 0.35, -hl * 0.35),
        Vec2::new(hw * 0.35, -hl * 0.35),
        Vec2::new(-hw * 0.35, hl * 0.35),
        Vec2::new(hw * 0.35, hl * 0.35),
        Vec2::new(-hw * 0.7, -hl * 0.6),
        Vec2::new(hw * 0.7, -hl * 0.6),
        Vec2::new(-hw * 0.7, hl * 0.6),
        Vec2::new(hw * 0.7, hl * 0.6),
    ];

    big.into_iter()
        .map(|p| (p, true))
        .chain(small.into_iter().map(|p| (p, false)))
        .enumerate()
        .map(|(id, (p, is_big))| BoostPad::new(id as u32, p, is_big))
        .collect()
}

/// Whether the car is close enough to take the pad
pub fn in_pickup_range(car: &CarState, pad: &BoostPad) -> bool {
    flat(car.body.position).distance(pad.position) <= pad.pickup_radius()
}

/// Give the pad's boost to the car and start the pad's respawn timer
///
/// Big pads fill the tank; small pads add a fixed amount.
pub fn apply_pickup(car: &mut CarState, pad: &mut BoostPad) {
    if pad.big {
        car.boost_fuel = BOOST_MAX;
    } else {
        car.add_boost(SMALL_PAD_AMOUNT);
    }
    pad.active = false;
    pad.respawn_timer = pad.respawn_secs();
}

/// Let every active car take the active pads under it
pub fn collect_pads(world: &mut World) {
    for car in world.cars.iter_mut().filter(|c| c.is_active()) {
        for pad in world.pads.iter_mut().filter(|p| p.active) {
            if in_pickup_range(car, pad) {
                apply_pickup(car, pad);
                log::debug!(
                    "Car {} took {} pad {} (fuel {:.0})",
                    car.id,
                    if pad.big { "big" } else { "small" },
                    pad.id,
                    car.boost_fuel
                );
                world.events.push(GameEvent::PadCollected {
                    pad_id: pad.id,
                    car_id: car.id,
                });
            }
        }
    }
}

/// Count down inactive pads and reactivate them at zero
pub fn tick_pads(pads: &mut [BoostPad], dt: f32, events: &mut Vec<GameEvent>) {
    for pad in pads.iter_mut().filter(|p| !p.active) {
        pad.respawn_timer -= dt;
        if pad.respawn_timer <= 0.0 {
            pad.respawn_timer = 0.0;
            pad.active = true;
            events.push(GameEvent::PadRespawned { pad_id: pad.id });
        }
    }
}
