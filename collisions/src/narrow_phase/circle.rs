use super::{unit_or, Impact, Motion, CONTACT_EPSILON};
use common::shapes::{Aabb, Polygon};
use common::vector::{closest_point_on_segment, dist_to_line_squared, scalar_project};
use common::{vec2, Vector2D};

pub(crate) fn circle_circle(a: Motion, ra: f64, b: Motion, rb: f64) -> Option<Impact> {
    let relative = b.velocity - a.velocity;
    let offset = b.position - a.position;
    let radii = ra + rb;

    // B's center travels along a line relative to A; too far from it means no hit.
    let trail = b.position + relative;
    if dist_to_line_squared(&a.position, &b.position, &trail) > radii * radii {
        return None;
    }
    let distance = offset.norm();
    if distance == 0.0 {
        return None;
    }
    let closing_speed = -scalar_project(&relative, &offset, distance);
    if closing_speed <= 0.0 {
        return None;
    }
    let gap = distance - radii;
    if gap <= 0.0 {
        return (gap >= -CONTACT_EPSILON).then(|| Impact::new(0.0, offset / distance));
    }

    // First root of |offset + relative * t| = radii, in the cancellation-free form.
    let qa = relative.norm_squared();
    let half_qb = offset.dot(&relative);
    let qc = offset.norm_squared() - radii * radii;
    let discriminant = half_qb * half_qb - qa * qc;
    if discriminant < 0.0 {
        return None;
    }
    let time = qc / (-half_qb + discriminant.sqrt());
    let contact = offset + relative * time;
    Some(Impact::new(time, unit_or(contact, offset / distance)))
}

/// Circle against a box, by clipping the circle's center against the box
/// grown by the radius and falling back to the corner disks.
pub(crate) fn circle_aabb(c: Motion, radius: f64, b: Motion, aabb: &Aabb) -> Option<Impact> {
    let relative = c.velocity - b.velocity;
    let start = c.position;
    let half = aabb.half_extents();
    let box_min = b.position - half;
    let box_max = b.position + half;

    let mut entry = f64::NEG_INFINITY;
    let mut exit = f64::INFINITY;
    let mut entry_normal = None;
    for axis in 0..2 {
        let lo = box_min[axis] - radius;
        let hi = box_max[axis] + radius;
        let (p, v) = (start[axis], relative[axis]);
        if v == 0.0 {
            if p < lo || p > hi {
                return None;
            }
            continue;
        }
        let (near, far) = if v > 0.0 {
            ((lo - p) / v, (hi - p) / v)
        } else {
            ((hi - p) / v, (lo - p) / v)
        };
        if near > entry {
            entry = near;
            let mut normal = Vector2D::zeros();
            normal[axis] = v.signum();
            entry_normal = Some(normal);
        }
        exit = exit.min(far);
    }
    let normal = entry_normal?;
    if entry > exit || exit < 0.0 {
        return None;
    }

    if entry < 0.0 {
        // The center already sits inside the grown box.
        let closest = vec2(
            start.x.clamp(box_min.x, box_max.x),
            start.y.clamp(box_min.y, box_max.y),
        );
        if (closest - start).norm() > radius + CONTACT_EPSILON {
            return disk_hit(start, relative, closest, radius);
        }
        return resting_contact(start, relative, closest, radius);
    }

    let hit = start + relative * entry;
    match corner_region(&hit, &box_min, &box_max) {
        Some(corner) => disk_hit(start, relative, corner, radius),
        None => Some(Impact::new(entry, normal)),
    }
}

/// Circle against a convex polygon: half-plane clipping against the polygon
/// grown by the radius, then the vertex disks when the entry point lies past
/// the ends of the entry edge.
pub(crate) fn circle_polygon(
    c: Motion,
    radius: f64,
    p: Motion,
    polygon: &Polygon,
) -> Option<Impact> {
    let relative = c.velocity - p.velocity;
    let start = c.position - p.position;

    let mut entry = f64::NEG_INFINITY;
    let mut exit = f64::INFINITY;
    let mut entry_edge = None;
    for (index, normal) in polygon.normals().iter().enumerate() {
        let inside_by = polygon.normal_max(index) + radius - start.dot(normal);
        let speed = relative.dot(normal);
        if speed == 0.0 {
            if inside_by < 0.0 {
                return None;
            }
            continue;
        }
        let t = inside_by / speed;
        if speed > 0.0 {
            exit = exit.min(t);
        } else if t > entry {
            entry = t;
            entry_edge = Some(index);
        }
    }
    let edge = entry_edge?;
    if entry > exit || exit < 0.0 {
        return None;
    }

    if entry < 0.0 {
        return polygon_start_contact(start, relative, polygon, radius);
    }

    let (from, to) = edge_points(polygon, edge);
    let hit = start + relative * entry;
    let along = (hit - from).dot(&(to - from)) / (to - from).norm_squared();
    if (0.0..=1.0).contains(&along) {
        Some(Impact::new(entry, -polygon.normals()[edge]))
    } else {
        vertex_hit(start, relative, polygon, radius)
    }
}

fn edge_points(polygon: &Polygon, edge: usize) -> (Vector2D, Vector2D) {
    let points = polygon.points();
    (points[(edge + points.len() - 1) % points.len()], points[edge])
}

/// The center starts inside the grown polygon: either it already touches or
/// overlaps the polygon, or it sits in a vertex wedge outside the rounded shape.
fn polygon_start_contact(
    start: Vector2D,
    relative: Vector2D,
    polygon: &Polygon,
    radius: f64,
) -> Option<Impact> {
    let inside = polygon
        .normals()
        .iter()
        .enumerate()
        .all(|(index, normal)| start.dot(normal) <= polygon.normal_max(index));
    if inside {
        return None;
    }
    let mut closest = polygon.points()[0];
    let mut closest_distance = f64::INFINITY;
    for edge in 0..polygon.len() {
        let (from, to) = edge_points(polygon, edge);
        let point = closest_point_on_segment(&start, &from, &to);
        let distance = (point - start).norm_squared();
        if distance < closest_distance {
            closest_distance = distance;
            closest = point;
        }
    }
    if closest_distance.sqrt() > radius + CONTACT_EPSILON {
        return vertex_hit(start, relative, polygon, radius);
    }
    resting_contact(start, relative, closest, radius)
}

fn vertex_hit(
    start: Vector2D,
    relative: Vector2D,
    polygon: &Polygon,
    radius: f64,
) -> Option<Impact> {
    polygon
        .points()
        .iter()
        .filter_map(|vertex| disk_hit(start, relative, *vertex, radius))
        .min_by(|x, y| x.time.total_cmp(&y.time))
}

/// Point moving from `start` along `relative` against the disk of `radius`
/// around `corner`.
fn disk_hit(start: Vector2D, relative: Vector2D, corner: Vector2D, radius: f64) -> Option<Impact> {
    let m = start - corner;
    let c = m.norm_squared() - radius * radius;
    if c <= 0.0 {
        return resting_contact(start, relative, corner, radius);
    }
    let half_b = m.dot(&relative);
    if half_b >= 0.0 {
        return None;
    }
    let a = relative.norm_squared();
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let time = c / (-half_b + discriminant.sqrt());
    let contact = start + relative * time;
    Some(Impact::new(time, unit_or(corner - contact, -m)))
}

/// Time-zero impact when the circle touches `closest` and moves toward it.
fn resting_contact(
    start: Vector2D,
    relative: Vector2D,
    closest: Vector2D,
    radius: f64,
) -> Option<Impact> {
    let to_shape = closest - start;
    let distance = to_shape.norm();
    if distance == 0.0 || (distance - radius).abs() > CONTACT_EPSILON {
        return None;
    }
    let normal = to_shape / distance;
    (relative.dot(&normal) > 0.0).then(|| Impact::new(0.0, normal))
}

fn corner_region(point: &Vector2D, min: &Vector2D, max: &Vector2D) -> Option<Vector2D> {
    let x = if point.x < min.x {
        min.x
    } else if point.x > max.x {
        max.x
    } else {
        return None;
    };
    let y = if point.y < min.y {
        min.y
    } else if point.y > max.y {
        max.y
    } else {
        return None;
    };
    Some(vec2(x, y))
}
