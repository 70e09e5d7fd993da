//! Ball physics: gravity, bounces, speed cap, walls and goal line

use super::arena::{self, ArenaBounds, BoundaryContact, EndWalls, WallResponse};
use super::state::{Ball, Team};
use crate::consts::*;

/// Integrate one frame of free flight
///
/// Gravity, position, ground bounce, ceiling bounce, then the speed cap.
/// Wall handling is separate ([`confine`]) so the frame driver can run
/// car contacts in between.
pub fn integrate(ball: &mut Ball, bounds: &ArenaBounds, dt: f32) {
    let radius = ball.radius;
    let body = &mut ball.body;

    body.velocity.y -= GRAVITY * dt;
    body.position += body.velocity * dt;

    if body.position.y <= radius {
        body.position.y = radius;
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y * BALL_RESTITUTION;
            if body.velocity.y < BALL_SETTLE_SPEED {
                body.velocity.y = 0.0;
            }
        }
        // Rolling
        let drag = (1.0 - BALL_ROLL_DRAG * dt).max(0.0);
        body.velocity.x *= drag;
        body.velocity.z *= drag;
    }

    let ceiling = bounds.wall_height - radius;
    if body.position.y >= ceiling {
        body.position.y = ceiling;
        if body.velocity.y > 0.0 {
            body.velocity.y = -body.velocity.y * BALL_WALL_RESTITUTION;
        }
    }

    body.velocity = body.velocity.clamp_length_max(BALL_MAX_SPEED);
}

/// Keep the ball inside the walls, letting it through the goal mouths
pub fn confine(ball: &mut Ball, bounds: &ArenaBounds) -> BoundaryContact {
    arena::confine(
        bounds,
        &mut ball.body,
        ball.radius,
        EndWalls::OpenAtGoals,
        WallResponse::Bounce {
            restitution: BALL_WALL_RESTITUTION,
        },
    )
}

/// Hold the ball still (kickoff countdown)
pub fn freeze(ball: &mut Ball) {
    ball.body.velocity = glam::Vec3::ZERO;
}

/// Team credited if the ball has fully crossed a goal line
pub fn goal_crossed(ball: &Ball, bounds: &ArenaBounds) -> Option<Team> {
    let p = ball.body.position;
    let past_line = p.z.abs() > bounds.half_length() + ball.radius;
    (past_line && bounds.in_goal_mouth(p.x)).then(|| Team::scoring_at_end(p.z.signum()))
}
