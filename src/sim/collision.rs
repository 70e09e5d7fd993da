//! Car–ball and car–car contacts
//!
//! Car–ball touches are impulse based: any ball motion into the car is
//! reflected, the ball gets a kick along a blend of the impact normal and the
//! car's direction of travel, then is pushed out to the minimum separation so
//! the same contact can't fire every frame.

use glam::Vec3;

use super::state::{CarState, RigidBody};
use crate::consts::*;

/// Resolve a car touching the ball. Returns true if the ball was hit.
///
/// No effect when the centers are farther apart than [`MIN_SEPARATION`], or
/// so close together that the impact direction is undefined.
pub fn resolve_car_ball(car: &CarState, ball: &mut RigidBody) -> bool {
    if car.demolished {
        return false;
    }

    let offset = ball.position - car.body.position;
    let dist = offset.length();
    if dist > MIN_SEPARATION || dist < COLLISION_EPSILON {
        return false;
    }
    let normal = offset / dist;

    // Bias the kick along where the car is going (or facing, when parked)
    let car_speed = car.body.speed();
    let travel = if car_speed > COLLISION_EPSILON {
        car.body.velocity / car_speed
    } else {
        car.forward()
    };
    let blended = normal * (1.0 - HEADING_BLEND) + travel * HEADING_BLEND;
    let dir = match blended.try_normalize() {
        // never pull the ball back into the car
        Some(dir) if dir.dot(normal) > 0.0 => dir,
        _ => normal,
    };

    let impulse = (car_speed * HIT_SPEED_FACTOR).max(MIN_HIT_IMPULSE);

    // Bounce the ball's motion into the car back out (the car is much
    // heavier), then add the kick on top
    let incoming = ball.velocity.dot(normal);
    if incoming < 0.0 {
        ball.velocity -= 2.0 * normal * incoming;
    }
    ball.velocity += dir * impulse;
    ball.velocity = ball.velocity.clamp_length_max(BALL_MAX_SPEED);

    if dist < MIN_SEPARATION {
        ball.position = car.body.position + normal * MIN_SEPARATION;
    }

    true
}

/// Whether `attacker` is fast enough, and heading into `victim`, to demolish it
pub fn demolishes(attacker: &CarState, victim: &CarState) -> bool {
    if attacker.demolished || victim.demolished || attacker.team == victim.team {
        return false;
    }

    let offset: Vec3 = victim.body.position - attacker.body.position;
    if offset.length() > CAR_LENGTH {
        return false;
    }

    let speed = attacker.body.speed();
    speed >= DEMO_SPEED && attacker.body.velocity.dot(offset) > 0.0
}

/// All (attacker id, victim id) demolitions among `cars` this frame
pub fn find_demolitions(cars: &[CarState]) -> Vec<(u32, u32)> {
    let mut hits = Vec::new();
    for attacker in cars {
        for victim in cars {
            if attacker.id != victim.id && demolishes(attacker, victim) {
                hits.push((attacker.id, victim.id));
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Team;

    fn car_at(pos: Vec3) -> CarState {
        CarState::new(0, Team::Orange, true, pos)
    }

    fn ball_at(pos: Vec3) -> RigidBody {
        RigidBody::new(pos)
    }

    #[test]
    fn test_far_apart_no_effect() {
        let car = car_at(Vec3::new(0.0, CAR_RIDE_HEIGHT, 0.0));
        let mut ball = ball_at(Vec3::new(0.0, BALL_RADIUS, MIN_SEPARATION + 1.0));
        ball.velocity = Vec3::new(1.0, 0.0, 0.0);
        let before = ball;
        assert!(!resolve_car_ball(&car, &mut ball));
        assert_eq!(ball, before);
    }

    #[test]
    fn test_stationary_touch_still_nudges() {
        let car = car_at(Vec3::new(0.0, CAR_RIDE_HEIGHT, 0.0));
        let mut ball = ball_at(Vec3::new(0.0, BALL_RADIUS, 1.0));
        assert!(resolve_car_ball(&car, &mut ball));
        assert!(ball.speed() > 0.0);
        assert!(ball.speed() >= MIN_HIT_IMPULSE * 0.99);
        let dist = (ball.position - car.body.position).length();
        assert!(dist >= MIN_SEPARATION - 1e-3);
    }

    #[test]
    fn test_fast_car_hits_harder() {
        let mut car = car_at(Vec3::new(0.0, CAR_RIDE_HEIGHT, 0.0));
        car.body.velocity = Vec3::new(0.0, 0.0, -20.0);
        let mut ball = ball_at(Vec3::new(0.0, BALL_RADIUS, -2.5));
        assert!(resolve_car_ball(&car, &mut ball));
        assert!(ball.speed() > 20.0);
        // ball leaves in the car's direction of travel
        assert!(ball.velocity.z < 0.0);
    }

    #[test]
    fn test_fast_ball_into_parked_car_leaves_faster() {
        // Orange faces -z, toward the ball
        let mut car = car_at(Vec3::new(0.0, BALL_RADIUS, 0.0));
        car.heading = std::f32::consts::PI;
        let mut ball = ball_at(Vec3::new(0.0, BALL_RADIUS, -3.0));
        ball.velocity = Vec3::new(0.0, 0.0, 20.0);

        assert!(resolve_car_ball(&car, &mut ball));
        assert!(ball.speed() > 20.0, "speed {}", ball.speed());
        assert!(ball.velocity.z < 0.0);
    }

    #[test]
    fn test_degenerate_overlap_ignored() {
        let pos = Vec3::new(3.0, 1.0, 3.0);
        let car = car_at(pos);
        let mut ball = ball_at(pos);
        assert!(!resolve_car_ball(&car, &mut ball));
        assert!(ball.position.is_finite());
        assert!(ball.velocity.is_finite());
        assert_eq!(ball.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_demolished_car_does_not_touch() {
        let mut car = car_at(Vec3::new(0.0, CAR_RIDE_HEIGHT, 0.0));
        car.demolished = true;
        let mut ball = ball_at(Vec3::new(0.0, BALL_RADIUS, 1.0));
        assert!(!resolve_car_ball(&car, &mut ball));
    }

    #[test]
    fn test_demolition_needs_speed_and_opponent() {
        let mut attacker = CarState::new(0, Team::Orange, true, Vec3::new(0.0, CAR_RIDE_HEIGHT, 0.0));
        let victim = CarState::new(1, Team::Blue, false, Vec3::new(0.0, CAR_RIDE_HEIGHT, -2.0));
        attacker.body.velocity = Vec3::new(0.0, 0.0, -10.0);
        assert!(!demolishes(&attacker, &victim));

        attacker.body.velocity = Vec3::new(0.0, 0.0, -DEMO_SPEED - 1.0);
        assert!(demolishes(&attacker, &victim));
        assert_eq!(find_demolitions(&[attacker.clone(), victim.clone()]), vec![(0, 1)]);

        let mut teammate = victim.clone();
        teammate.team = Team::Orange;
        assert!(!demolishes(&attacker, &teammate));

        // driving away doesn't count
        attacker.body.velocity = Vec3::new(0.0, 0.0, DEMO_SPEED + 1.0);
        assert!(!demolishes(&attacker, &victim));
    }

    proptest::proptest! {
        #[test]
        fn prop_contact_always_separates(
            dx in -3.0f32..3.0,
            dy in -1.0f32..3.0,
            dz in -3.0f32..3.0,
            vx in -30.0f32..30.0,
            vz in -30.0f32..30.0,
        ) {
            let mut car = car_at(Vec3::new(0.0, CAR_RIDE_HEIGHT, 0.0));
            car.body.velocity = Vec3::new(vx, 0.0, vz);
            let mut ball = ball_at(car.body.position + Vec3::new(dx, dy, dz));
            let dist = (ball.position - car.body.position).length();
            let hit = resolve_car_ball(&car, &mut ball);
            if dist > MIN_SEPARATION || dist < COLLISION_EPSILON {
                proptest::prop_assert!(!hit);
            } else {
                proptest::prop_assert!(hit);
                proptest::prop_assert!(ball.speed() > 0.0);
                proptest::prop_assert!(ball.speed() <= BALL_MAX_SPEED + 1e-3);
                let after = (ball.position - car.body.position).length();
                proptest::prop_assert!(after >= MIN_SEPARATION - 1e-3);
            }
        }
    }
}
