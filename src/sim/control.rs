//! Control sources
//!
//! Every car is driven through the same [`ControlIntent`]. Where it comes
//! from (keyboard, AI, replay) is hidden behind [`ControlSource`], so car
//! physics never knows who is driving.

use glam::Vec2;

use super::state::{CarState, ControlIntent, World};
use crate::{flat, normalize_angle};

/// Anything that can drive a car for one frame
pub trait ControlSource {
    fn produce_intent(&mut self, car: &CarState, world: &World) -> ControlIntent;
}

/// Logical driving keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Boost,
}

impl Key {
    /// Parse an action name sent by the host
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forward" | "up" => Some(Key::Forward),
            "backward" | "back" | "down" => Some(Key::Backward),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "jump" => Some(Key::Jump),
            "boost" => Some(Key::Boost),
            _ => None,
        }
    }
}

/// Human input adapter: the host's input capture presses and releases keys
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    pub intent: ControlIntent,
}

impl HeldKeys {
    pub fn set_key(&mut self, key: Key, down: bool) {
        let slot = match key {
            Key::Forward => &mut self.intent.forward,
            Key::Backward => &mut self.intent.backward,
            Key::Left => &mut self.intent.left,
            Key::Right => &mut self.intent.right,
            Key::Jump => &mut self.intent.jump,
            Key::Boost => &mut self.intent.boost,
        };
        *slot = down;
    }

    /// Release everything (focus lost)
    pub fn release_all(&mut self) {
        self.intent = ControlIntent::default();
    }
}

impl ControlSource for HeldKeys {
    fn produce_intent(&mut self, _car: &CarState, _world: &World) -> ControlIntent {
        self.intent
    }
}

/// Minimal AI adapter: lines up behind the ball and drives through it
/// toward the opposing goal
#[derive(Debug, Clone)]
pub struct BallChaser {
    /// Boost when farther than this from the target
    pub boost_distance: f32,
    /// Heading error (radians) tolerated before steering
    pub steer_deadzone: f32,
}

impl Default for BallChaser {
    fn default() -> Self {
        Self {
            boost_distance: 25.0,
            steer_deadzone: 0.08,
        }
    }
}

impl ControlSource for BallChaser {
    fn produce_intent(&mut self, car: &CarState, world: &World) -> ControlIntent {
        if car.demolished {
            return ControlIntent::default();
        }

        let ball = flat(world.ball.body.position);
        let me = flat(car.body.position);
        let target_goal = Vec2::new(0.0, car.team.opponent().defended_end() * world.bounds.half_length());

        // Aim a little behind the ball on the line from the goal through it
        let behind = (ball - target_goal).normalize_or_zero() * 2.0;
        let aim = ball + behind;
        let to_aim = aim - me;
        let distance = to_aim.length();

        let desired = to_aim.x.atan2(to_aim.y);
        let error = normalize_angle(desired - car.heading);

        ControlIntent {
            forward: true,
            backward: false,
            left: error > self.steer_deadzone,
            right: error < -self.steer_deadzone,
            jump: world.ball.body.position.y > 4.0 && distance < 4.0,
            boost: error.abs() < 0.3 && distance > self.boost_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchSettings;
    use crate::consts::*;
    use glam::Vec3;

    #[test]
    fn test_held_keys() {
        let world = World::new(MatchSettings::default());
        let mut keys = HeldKeys::default();
        keys.set_key(Key::Forward, true);
        keys.set_key(Key::Boost, true);
        keys.set_key(Key::Boost, false);

        let intent = keys.produce_intent(&world.cars[0], &world);
        assert!(intent.forward);
        assert!(!intent.boost);

        keys.release_all();
        assert_eq!(keys.intent, ControlIntent::default());
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!(Key::from_str("Boost"), Some(Key::Boost));
        assert_eq!(Key::from_str("honk"), None);
    }

    #[test]
    fn test_chaser_drives_at_ball() {
        let world = World::new(MatchSettings::default());
        let mut ai = BallChaser::default();
        // Blue car faces +z toward the ball at center
        let intent = ai.produce_intent(&world.cars[1], &world);
        assert!(intent.forward);
        assert!(!intent.left && !intent.right);
    }

    #[test]
    fn test_chaser_steers_toward_ball() {
        let mut world = World::new(MatchSettings::default());
        world.ball.body.position = Vec3::new(20.0, BALL_RADIUS, -30.0);
        let mut ai = BallChaser::default();
        let intent = ai.produce_intent(&world.cars[1], &world);
        // target is to the car's +x side, which is a left turn (heading increases)
        assert!(intent.left);
        assert!(!intent.right);
    }

    #[test]
    fn test_chaser_idle_when_demolished() {
        let mut world = World::new(MatchSettings::default());
        world.cars[1].demolished = true;
        let mut ai = BallChaser::default();
        let intent = ai.produce_intent(&world.cars[1], &world);
        assert_eq!(intent, ControlIntent::default());
    }
}
