//! Exact time of impact between two shapes moving with constant velocity.
//!
//! Every routine works on the relative motion of the pair and reports the
//! contact normal from the first shape toward the second. Mirrored pairs reuse
//! the same routine and flip the normal, so `toi(a, b)` and `toi(b, a)` agree.
//! Pairs that already overlap produce no impact; pairs that touch and approach
//! produce an impact at time zero.

mod aabb;
mod bounding;
mod circle;
mod overlap;
mod sweep;

use common::shapes::{Shape, ShapeKind};
use common::Vector2D;
use sweep::Hull;

pub use overlap::intersects;

/// Distance within which two surfaces are considered touching.
pub const CONTACT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub time: f64,
    /// Unit vector from the first shape toward the second.
    pub normal: Vector2D,
}

impl Impact {
    pub(crate) fn new(time: f64, normal: Vector2D) -> Self {
        Self { time, normal }
    }

    pub fn flipped(self) -> Self {
        Self {
            time: self.time,
            normal: -self.normal,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Motion {
    pub(crate) position: Vector2D,
    pub(crate) velocity: Vector2D,
}

impl Motion {
    pub(crate) fn of(shape: &Shape) -> Self {
        Self {
            position: shape.position(),
            velocity: shape.velocity(),
        }
    }
}

#[inline(always)]
pub(crate) fn unit_or(v: Vector2D, fallback: Vector2D) -> Vector2D {
    let length = v.norm();
    if length > 0.0 {
        v / length
    } else {
        fallback
    }
}

/// Earliest time in `[0, max_time]` at which `a` and `b` touch.
pub fn time_to_collision(a: &Shape, b: &Shape, max_time: f64) -> Option<Impact> {
    if !(max_time >= 0.0) {
        return None;
    }
    let (ma, mb) = (Motion::of(a), Motion::of(b));
    let impact = match (a.kind(), b.kind()) {
        (ShapeKind::Circle(ca), ShapeKind::Circle(cb)) => {
            circle::circle_circle(ma, ca.radius, mb, cb.radius)
        }
        (ShapeKind::Circle(circle), ShapeKind::Aabb(aabb)) => {
            circle::circle_aabb(ma, circle.radius, mb, aabb)
        }
        (ShapeKind::Aabb(aabb), ShapeKind::Circle(circle)) => {
            circle::circle_aabb(mb, circle.radius, ma, aabb).map(Impact::flipped)
        }
        (ShapeKind::Aabb(aa), ShapeKind::Aabb(ab)) => aabb::aabb_aabb(ma, aa, mb, ab),
        (ShapeKind::Circle(circle), ShapeKind::Polygon(polygon)) => {
            if !bounding::may_collide(a, b, max_time) {
                return None;
            }
            circle::circle_polygon(ma, circle.radius, mb, polygon)
        }
        (ShapeKind::Polygon(polygon), ShapeKind::Circle(circle)) => {
            if !bounding::may_collide(b, a, max_time) {
                return None;
            }
            circle::circle_polygon(mb, circle.radius, ma, polygon).map(Impact::flipped)
        }
        (ShapeKind::Aabb(aabb), ShapeKind::Polygon(polygon)) => {
            if !bounding::may_collide(a, b, max_time) {
                return None;
            }
            sweep::hull_sweep(Hull::Box(aabb), ma, Hull::Polygon(polygon), mb)
        }
        (ShapeKind::Polygon(polygon), ShapeKind::Aabb(aabb)) => {
            if !bounding::may_collide(a, b, max_time) {
                return None;
            }
            sweep::hull_sweep(Hull::Polygon(polygon), ma, Hull::Box(aabb), mb)
        }
        (ShapeKind::Polygon(pa), ShapeKind::Polygon(pb)) => {
            if !bounding::may_collide(a, b, max_time) {
                return None;
            }
            sweep::hull_sweep(Hull::Polygon(pa), ma, Hull::Polygon(pb), mb)
        }
    };
    impact.filter(|impact| impact.time <= max_time)
}
