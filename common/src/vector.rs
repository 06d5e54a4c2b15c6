use nalgebra::Vector2;

pub type Vector2D = Vector2<f64>;

#[inline(always)]
pub fn vec2(x: f64, y: f64) -> Vector2D {
    Vector2::new(x, y)
}

/// Signed length of the projection of `v` onto the unit vector `axis`.
#[inline(always)]
pub fn unit_scalar_project(v: &Vector2D, axis: &Vector2D) -> f64 {
    v.dot(axis)
}

/// Signed length of the projection of `v` onto `onto`, whose length is already known.
#[inline(always)]
pub fn scalar_project(v: &Vector2D, onto: &Vector2D, onto_length: f64) -> f64 {
    v.dot(onto) / onto_length
}

/// z component of the 3D cross product of `a` and `b`.
#[inline(always)]
pub fn cross(a: &Vector2D, b: &Vector2D) -> f64 {
    a.perp(b)
}

/// Squared distance from `p` to the infinite line through `a` and `b`.
/// Falls back to the distance to `a` when the line is degenerate.
pub fn dist_to_line_squared(p: &Vector2D, a: &Vector2D, b: &Vector2D) -> f64 {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    if length_sq == 0.0 {
        return (p - a).norm_squared();
    }
    let c = cross(&ab, &(p - a));
    c * c / length_sq
}

/// Squared distance from `p` to the segment `a`-`b`.
pub fn dist_to_segment_squared(p: &Vector2D, a: &Vector2D, b: &Vector2D) -> f64 {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    if length_sq == 0.0 {
        return (p - a).norm_squared();
    }
    let t = ((p - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    (a + ab * t - p).norm_squared()
}

/// Closest point to `p` on the segment `a`-`b`.
pub fn closest_point_on_segment(p: &Vector2D, a: &Vector2D, b: &Vector2D) -> Vector2D {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    if length_sq == 0.0 {
        return *a;
    }
    let t = ((p - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[inline(always)]
pub fn is_finite(v: &Vector2D) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
