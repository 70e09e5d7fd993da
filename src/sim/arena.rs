//! Arena boundary geometry
//!
//! The field is a rectangle on the ground plane (x lateral, z lengthwise)
//! whose four corners are rounded with a fixed radius. Each end wall has a
//! goal mouth the ball can pass through.
//!
//! Boundary handling is split in two steps. [`classify`] looks at a position
//! once and returns a single tagged [`BoundaryContact`]; [`resolve`] consumes
//! that tag. Corner arcs and flat walls are decided in the same match, so an
//! entity is never corrected by both in one frame.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::state::RigidBody;
use crate::flat;

/// Tolerance before a boundary counts as crossed
const SKIN: f32 = 1.0e-4;

/// Static arena dimensions (full extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Extent along x (side wall to side wall)
    pub field_width: f32,
    /// Extent along z (end wall to end wall)
    pub field_length: f32,
    /// Radius of the rounded corners
    pub corner_radius: f32,
    /// Width of each goal mouth, centered on x = 0
    pub goal_width: f32,
    /// Ceiling height
    pub wall_height: f32,
}

impl ArenaBounds {
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.field_width / 2.0
    }

    #[inline]
    pub fn half_length(&self) -> f32 {
        self.field_length / 2.0
    }

    #[inline]
    pub fn goal_half_width(&self) -> f32 {
        self.goal_width / 2.0
    }

    /// Corner-zone flags for a ground point: (x near a side wall, z near an end wall)
    ///
    /// `in_corner_zone_z` gates the x-facing walls and `in_corner_zone_x`
    /// gates the z-facing walls.
    pub fn corner_zones(&self, p: Vec2) -> (bool, bool) {
        let in_zone_x = p.x.abs() > self.half_width() - self.corner_radius;
        let in_zone_z = p.y.abs() > self.half_length() - self.corner_radius;
        (in_zone_x, in_zone_z)
    }

    /// Center of the corner arc in the quadrant containing `p`
    pub fn corner_center(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.signum() * (self.half_width() - self.corner_radius),
            p.y.signum() * (self.half_length() - self.corner_radius),
        )
    }

    /// Whether a lateral offset lies inside the goal mouth
    #[inline]
    pub fn in_goal_mouth(&self, x: f32) -> bool {
        x.abs() < self.goal_half_width()
    }

    /// Whether an entity of `half_width` at ground point `p` is inside the walls
    pub fn contains(&self, p: Vec2, half_width: f32) -> bool {
        let tol = 1.0e-3;
        let (in_zone_x, in_zone_z) = self.corner_zones(p);
        if in_zone_x && in_zone_z {
            let reach = (self.corner_radius - half_width).max(0.0);
            (p - self.corner_center(p)).length() <= reach + tol
        } else {
            p.x.abs() <= self.half_width() - half_width + tol
                && p.y.abs() <= self.half_length() - half_width + tol
        }
    }
}

/// Which flat wall pair a contact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallAxis {
    /// Side walls at x = ±half_width
    X,
    /// End walls at z = ±half_length
    Z,
}

/// Result of classifying a position against the boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundaryContact {
    /// Inside the field, nothing to do
    None,
    /// Outside a rounded corner
    CornerArc {
        /// Arc center on the ground plane (x, z)
        center: Vec2,
        /// Unit outward normal from the center toward the entity
        normal: Vec2,
        /// Distance from the center the entity must be pulled back to
        reach: f32,
    },
    /// Beyond a flat wall
    FlatWall {
        axis: WallAxis,
        /// +1.0 or -1.0, the side of the field the wall is on
        normal: f32,
        /// Coordinate the entity must be clamped to (always positive)
        limit: f32,
    },
    /// Past an end wall inside the goal mouth, clear of the posts (ball only)
    GoalMouth,
}

/// Whether end walls are open at the goal mouths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndWalls {
    /// Cars: end walls are solid across the full width
    Solid,
    /// Ball: the goal mouth is open
    OpenAtGoals,
}

/// How velocity reacts to a wall contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallResponse {
    /// Zero the velocity along the contact normal (cars)
    Stop,
    /// Reflect the outward velocity component, keeping `restitution` of it (ball)
    Bounce { restitution: f32 },
}

/// Classify an entity position against the arena boundary
///
/// Exactly one contact is produced. Inside both corner zones only the
/// corner arc is considered; otherwise only the flat wall the zones allow.
pub fn classify(
    bounds: &ArenaBounds,
    pos: Vec3,
    half_width: f32,
    end_walls: EndWalls,
) -> BoundaryContact {
    let p = flat(pos);
    let (in_zone_x, in_zone_z) = bounds.corner_zones(p);

    if in_zone_x && in_zone_z {
        let center = bounds.corner_center(p);
        let offset = p - center;
        let dist = offset.length();
        let reach = (bounds.corner_radius - half_width).max(0.0);
        // dist > 0 here since both zone tests are strict
        if dist > reach + SKIN {
            return BoundaryContact::CornerArc {
                center,
                normal: offset / dist,
                reach,
            };
        }
        return BoundaryContact::None;
    }

    if !in_zone_z {
        let limit = bounds.half_width() - half_width;
        if p.x.abs() > limit + SKIN {
            return BoundaryContact::FlatWall {
                axis: WallAxis::X,
                normal: p.x.signum(),
                limit,
            };
        }
    }

    if !in_zone_x {
        let limit = bounds.half_length() - half_width;
        if p.y.abs() > limit + SKIN {
            if end_walls == EndWalls::OpenAtGoals {
                // Past the end-wall plane the ball is inside the goal, bounded
                // sideways by the posts rather than the end wall
                if p.y.abs() > bounds.half_length() {
                    let post = bounds.goal_half_width() - half_width;
                    if p.x.abs() > post + SKIN {
                        return BoundaryContact::FlatWall {
                            axis: WallAxis::X,
                            normal: p.x.signum(),
                            limit: post,
                        };
                    }
                    return BoundaryContact::GoalMouth;
                }
                if bounds.in_goal_mouth(p.x) {
                    return BoundaryContact::GoalMouth;
                }
            }
            return BoundaryContact::FlatWall {
                axis: WallAxis::Z,
                normal: p.y.signum(),
                limit,
            };
        }
    }

    BoundaryContact::None
}

/// Apply a contact to a body: move it back inside and adjust its velocity
pub fn resolve(body: &mut RigidBody, contact: BoundaryContact, response: WallResponse) {
    match contact {
        BoundaryContact::None | BoundaryContact::GoalMouth => {}
        BoundaryContact::CornerArc {
            center,
            normal,
            reach,
        } => {
            let on_arc = center + normal * reach;
            body.position.x = on_arc.x;
            body.position.z = on_arc.y;

            let v = flat(body.velocity);
            let outward = v.dot(normal);
            if outward > 0.0 {
                let keep = match response {
                    WallResponse::Stop => 0.0,
                    WallResponse::Bounce { restitution } => restitution,
                };
                let corrected = v - normal * outward * (1.0 + keep);
                body.velocity.x = corrected.x;
                body.velocity.z = corrected.y;
            }
        }
        BoundaryContact::FlatWall {
            axis,
            normal,
            limit,
        } => {
            let (coord, vel) = match axis {
                WallAxis::X => (&mut body.position.x, &mut body.velocity.x),
                WallAxis::Z => (&mut body.position.z, &mut body.velocity.z),
            };
            *coord = normal * limit;
            match response {
                WallResponse::Stop => *vel = 0.0,
                WallResponse::Bounce { restitution } => {
                    if *vel * normal > 0.0 {
                        *vel = -*vel * restitution;
                    }
                }
            }
        }
    }
}

/// Classify once and resolve once; returns the contact that was applied
pub fn confine(
    bounds: &ArenaBounds,
    body: &mut RigidBody,
    half_width: f32,
    end_walls: EndWalls,
    response: WallResponse,
) -> BoundaryContact {
    let contact = classify(bounds, body.position, half_width, end_walls);
    resolve(body, contact, response);
    contact
}
