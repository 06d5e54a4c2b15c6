use super::{aabb, circle, Motion};
use common::shapes::{Aabb, BoundingBox, BoundingVolume, Shape};

/// Cheap rejection for pairs involving a polygon. Passes when the preferred
/// bounding volumes overlap now or meet within `max_time`.
pub(crate) fn may_collide(a: &Shape, b: &Shape, max_time: f64) -> bool {
    let (ma, mb) = (Motion::of(a), Motion::of(b));
    let within = |time: f64| time <= max_time;
    match (a.bounding_volume(), b.bounding_volume()) {
        (BoundingVolume::Circle { radius: ra }, BoundingVolume::Circle { radius: rb }) => {
            (mb.position - ma.position).norm() <= ra + rb
                || circle::circle_circle(ma, ra, mb, rb).map_or(false, |i| within(i.time))
        }
        (BoundingVolume::Circle { radius }, BoundingVolume::Box(local)) => {
            circle_box(ma, radius, mb, &local, max_time)
        }
        (BoundingVolume::Box(local), BoundingVolume::Circle { radius }) => {
            circle_box(mb, radius, ma, &local, max_time)
        }
        (BoundingVolume::Box(la), BoundingVolume::Box(lb)) => {
            let (ma, ha) = centered(ma, &la);
            let (mb, hb) = centered(mb, &lb);
            la.translated(&a.position()).overlaps(&lb.translated(&b.position()))
                || aabb::aabb_aabb(ma, &ha, mb, &hb).map_or(false, |i| within(i.time))
        }
    }
}

fn circle_box(c: Motion, radius: f64, b: Motion, local: &BoundingBox, max_time: f64) -> bool {
    let world = local.translated(&b.position);
    if world.distance_to_point(c.position.x, c.position.y) <= radius * radius {
        return true;
    }
    let (b, half) = centered(b, local);
    circle::circle_aabb(c, radius, b, &half).map_or(false, |i| i.time <= max_time)
}

/// Re-centers a box given relative to a shape's center on the box itself.
fn centered(motion: Motion, local: &BoundingBox) -> (Motion, Aabb) {
    (
        Motion {
            position: motion.position + local.center(),
            velocity: motion.velocity,
        },
        Aabb {
            half_width: local.half_width(),
            half_height: local.half_height(),
        },
    )
}
