use super::sweep::Hull;
use common::shapes::{Aabb, BoundingBox, Polygon, Shape, ShapeKind};
use common::vector::dist_to_segment_squared;
use common::Vector2D;

/// Static overlap test at the shapes' current positions. Touching counts.
pub fn intersects(a: &Shape, b: &Shape) -> bool {
    let (pa, pb) = (a.position(), b.position());
    match (a.kind(), b.kind()) {
        (ShapeKind::Circle(ca), ShapeKind::Circle(cb)) => {
            (pb - pa).norm() <= ca.radius + cb.radius
        }
        (ShapeKind::Circle(circle), ShapeKind::Aabb(aabb)) => {
            circle_aabb(pa, circle.radius, pb, aabb)
        }
        (ShapeKind::Aabb(aabb), ShapeKind::Circle(circle)) => {
            circle_aabb(pb, circle.radius, pa, aabb)
        }
        (ShapeKind::Circle(circle), ShapeKind::Polygon(polygon)) => {
            circle_polygon(pa - pb, circle.radius, polygon)
        }
        (ShapeKind::Polygon(polygon), ShapeKind::Circle(circle)) => {
            circle_polygon(pb - pa, circle.radius, polygon)
        }
        (ShapeKind::Aabb(aa), ShapeKind::Aabb(ab)) => hulls(Hull::Box(aa), pa, Hull::Box(ab), pb),
        (ShapeKind::Aabb(aabb), ShapeKind::Polygon(polygon)) => {
            hulls(Hull::Box(aabb), pa, Hull::Polygon(polygon), pb)
        }
        (ShapeKind::Polygon(polygon), ShapeKind::Aabb(aabb)) => {
            hulls(Hull::Polygon(polygon), pa, Hull::Box(aabb), pb)
        }
        (ShapeKind::Polygon(pa_shape), ShapeKind::Polygon(pb_shape)) => hulls(
            Hull::Polygon(pa_shape),
            pa,
            Hull::Polygon(pb_shape),
            pb,
        ),
    }
}

fn circle_aabb(center: Vector2D, radius: f64, box_center: Vector2D, aabb: &Aabb) -> bool {
    let bounds =
        BoundingBox::from_center(box_center.x, box_center.y, aabb.half_width, aabb.half_height);
    bounds.distance_to_point(center.x, center.y) <= radius * radius
}

/// `center` is relative to the polygon's center.
fn circle_polygon(center: Vector2D, radius: f64, polygon: &Polygon) -> bool {
    let inside = polygon
        .normals()
        .iter()
        .enumerate()
        .all(|(index, normal)| center.dot(normal) <= polygon.normal_max(index));
    if inside {
        return true;
    }
    let points = polygon.points();
    let radius_sq = radius * radius;
    (0..points.len()).any(|i| {
        let from = points[(i + points.len() - 1) % points.len()];
        dist_to_segment_squared(&center, &from, &points[i]) <= radius_sq
    })
}

fn hulls(a: Hull<'_>, pa: Vector2D, b: Hull<'_>, pb: Vector2D) -> bool {
    for (owner, other, owner_is_a) in [(&a, &b, true), (&b, &a, false)] {
        for index in 0..owner.axis_count() {
            let axis = owner.axis(index);
            let own = owner.own_interval(index);
            let projected = other.project(&axis);
            let (a_local, b_local) = if owner_is_a {
                (own, projected)
            } else {
                (projected, own)
            };
            let (a_offset, b_offset) = (pa.dot(&axis), pb.dot(&axis));
            if a_local.1 + a_offset < b_local.0 + b_offset
                || b_local.1 + b_offset < a_local.0 + a_offset
            {
                return false;
            }
        }
    }
    true
}
