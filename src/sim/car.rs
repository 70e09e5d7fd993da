//! Car physics
//!
//! Arcade handling: the car keeps a heading, throttle changes speed along it,
//! sideways slip decays with grip. Control comes from [`ControlIntent`] and
//! is the same for the player and AI cars.

use glam::Vec3;

use super::arena::{self, ArenaBounds, BoundaryContact, EndWalls, WallResponse};
use super::state::{CarState, ControlIntent};
use crate::consts::*;
use crate::{heading_dir, normalize_angle};

/// Steering rate multiplier while airborne
const AIR_STEER: f32 = 0.5;

/// Integrate one frame of driving from the car's current intent
///
/// Demolished cars are skipped entirely.
pub fn drive(car: &mut CarState, dt: f32, unlimited_boost: bool) {
    if car.demolished {
        return;
    }

    let intent: ControlIntent = car.intent;
    let grounded = car.grounded();

    // Split planar velocity into forward and sideways parts
    let fwd = car.forward();
    let side = Vec3::new(fwd.z, 0.0, -fwd.x);
    let planar = Vec3::new(car.body.velocity.x, 0.0, car.body.velocity.z);
    let mut forward_speed = planar.dot(fwd);
    let mut lateral = planar.dot(side);

    // Reversing flips steering like a real car
    let steer_sign = if forward_speed < -0.5 { -1.0 } else { 1.0 };
    let steer_rate = if grounded { CAR_TURN_RATE } else { CAR_TURN_RATE * AIR_STEER };
    car.heading = normalize_angle(car.heading + intent.steer() * steer_sign * steer_rate * dt);

    let boosting = intent.boost && (unlimited_boost || car.boost_fuel > 0.0);

    if grounded {
        let throttle = intent.throttle();
        if throttle > 0.0 {
            forward_speed += CAR_ACCEL * dt;
        } else if throttle < 0.0 {
            let decel = if forward_speed > 0.0 { CAR_BRAKE } else { CAR_REVERSE_ACCEL };
            forward_speed -= decel * dt;
        } else {
            let coast = CAR_COAST_DRAG * dt;
            forward_speed = if forward_speed.abs() <= coast {
                0.0
            } else {
                forward_speed - coast * forward_speed.signum()
            };
        }
        lateral *= (-CAR_GRIP * dt).exp();
    }

    if boosting {
        forward_speed += BOOST_ACCEL * dt;
        if !unlimited_boost {
            car.boost_fuel = (car.boost_fuel - BOOST_DRAIN_PER_SEC * dt).max(0.0);
        }
    }
    car.boosting = boosting;

    let top_speed = if boosting {
        CAR_MAX_SPEED * BOOST_MULTIPLIER
    } else {
        CAR_MAX_SPEED
    };
    if forward_speed > top_speed {
        // Bleed off boost speed instead of snapping down
        forward_speed = (forward_speed - CAR_BRAKE * dt).max(top_speed);
    }
    forward_speed = forward_speed.max(-CAR_MAX_REVERSE_SPEED);

    let fwd = heading_dir(car.heading);
    let side = Vec3::new(fwd.z, 0.0, -fwd.x);
    let planar = fwd * forward_speed + side * lateral;
    car.body.velocity.x = planar.x;
    car.body.velocity.z = planar.z;

    if intent.jump && grounded {
        car.body.velocity.y = JUMP_VELOCITY;
    }
    car.body.velocity.y -= GRAVITY * dt;

    car.body.position += car.body.velocity * dt;

    if car.body.position.y <= CAR_RIDE_HEIGHT {
        car.body.position.y = CAR_RIDE_HEIGHT;
        car.body.velocity.y = car.body.velocity.y.max(0.0);
    }
}

/// Keep the car inside the walls; cars never pass through goal mouths
pub fn confine(car: &mut CarState, bounds: &ArenaBounds) -> BoundaryContact {
    if car.demolished {
        return BoundaryContact::None;
    }
    arena::confine(
        bounds,
        &mut car.body,
        CAR_HALF_WIDTH,
        EndWalls::Solid,
        WallResponse::Stop,
    )
}
