use crate::error::{ShapeError, ShapeResult};
use crate::vector::{cross, is_finite, vec2, Vector2D};
use rand::Rng;
use std::f64::consts::PI;

/// Axis-aligned box stored as min/max corners. "Top" is the smaller y.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_center(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            min_x: x - half_width,
            min_y: y - half_height,
            max_x: x + half_width,
            max_y: y + half_height,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn half_width(&self) -> f64 {
        self.width() * 0.5
    }

    pub fn half_height(&self) -> f64 {
        self.height() * 0.5
    }

    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) * 0.5
    }

    pub fn center_y(&self) -> f64 {
        (self.min_y + self.max_y) * 0.5
    }

    pub fn center(&self) -> Vector2D {
        vec2(self.center_x(), self.center_y())
    }

    /// Touching edges count as overlapping.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Squared distance from the point to the box; zero inside.
    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        let dx = f64::max(self.min_x - x, x - self.max_x).max(0.0);
        let dy = f64::max(self.min_y - y, y - self.max_y).max(0.0);
        dx * dx + dy * dy
    }

    pub fn expand_to_include(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn translated(&self, offset: &Vector2D) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Random point at least `margin` away from every edge. Collapses to the
    /// low edge on an axis that is too small for the margin.
    pub fn random_point_inside<R: Rng>(&self, margin: f64, rng: &mut R) -> (f64, f64) {
        (
            safe_range(rng, self.min_x + margin, self.max_x - margin),
            safe_range(rng, self.min_y + margin, self.max_y - margin),
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

fn safe_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> ShapeResult<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ShapeError::InvalidRadius { radius });
        }
        Ok(Self { radius })
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub half_width: f64,
    pub half_height: f64,
}

impl Aabb {
    pub fn new(half_width: f64, half_height: f64) -> ShapeResult<Self> {
        if !half_width.is_finite()
            || !half_height.is_finite()
            || half_width < 0.0
            || half_height < 0.0
        {
            return Err(ShapeError::InvalidHalfExtents {
                half_width,
                half_height,
            });
        }
        Ok(Self {
            half_width,
            half_height,
        })
    }

    pub fn half_extents(&self) -> Vector2D {
        vec2(self.half_width, self.half_height)
    }
}

/// Convex polygon with points relative to the owning shape's center.
///
/// Normal `i` is the outward unit normal of the edge `points[i - 1] -> points[i]`
/// (wrapping), and `normal_mins[i]`/`normal_maxs[i]` hold the projection of the
/// polygon onto that normal. Either winding is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vector2D>,
    normals: Vec<Vector2D>,
    normal_mins: Vec<f64>,
    normal_maxs: Vec<f64>,
    extents: BoundingBox,
    radius: f64,
    area: f64,
    uses_bounding_box: bool,
}

impl Polygon {
    pub fn new(points: Vec<Vector2D>) -> ShapeResult<Self> {
        let count = points.len();
        if count < 3 {
            return Err(ShapeError::TooFewPoints { count });
        }
        if !points.iter().all(is_finite) {
            return Err(ShapeError::NonFinite);
        }

        let twice_area: f64 = (0..count)
            .map(|i| cross(&points[(i + count - 1) % count], &points[i]))
            .sum();
        if twice_area == 0.0 {
            return Err(ShapeError::ZeroArea);
        }
        let winding = twice_area.signum();

        let mut normals = Vec::with_capacity(count);
        for i in 0..count {
            let prev = points[(i + count - 1) % count];
            let next = points[(i + 1) % count];
            let edge = points[i] - prev;
            if edge.norm_squared() == 0.0 {
                return Err(ShapeError::DegenerateEdge { index: i });
            }
            if cross(&edge, &(next - points[i])) * winding < 0.0 {
                return Err(ShapeError::NonConvex { index: i });
            }
            normals.push((vec2(edge.y, -edge.x) * winding).normalize());
        }

        let mut normal_mins = Vec::with_capacity(count);
        let mut normal_maxs = Vec::with_capacity(count);
        for normal in &normals {
            let (min, max) = project_points(&points, normal);
            normal_mins.push(min);
            normal_maxs.push(max);
        }

        let mut extents = BoundingBox::new(points[0].x, points[0].y, points[0].x, points[0].y);
        let mut radius: f64 = 0.0;
        for point in &points {
            extents.min_x = extents.min_x.min(point.x);
            extents.min_y = extents.min_y.min(point.y);
            extents.max_x = extents.max_x.max(point.x);
            extents.max_y = extents.max_y.max(point.y);
            radius = radius.max(point.norm());
        }
        let uses_bounding_box = PI * radius * radius > extents.width() * extents.height();

        Ok(Self {
            points,
            normals,
            normal_mins,
            normal_maxs,
            extents,
            radius,
            area: twice_area.abs() * 0.5,
            uses_bounding_box,
        })
    }

    /// Axis-aligned rectangle centered on the origin.
    pub fn rectangle(width: f64, height: f64) -> ShapeResult<Self> {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new(vec![
            vec2(-hw, -hh),
            vec2(hw, -hh),
            vec2(hw, hh),
            vec2(-hw, hh),
        ])
    }

    pub fn regular(sides: usize, radius: f64) -> ShapeResult<Self> {
        let step = 2.0 * PI / sides as f64;
        Self::new(
            (0..sides)
                .map(|i| {
                    let angle = step * i as f64;
                    vec2(radius * angle.cos(), radius * angle.sin())
                })
                .collect(),
        )
    }

    /// Random convex polygon: a single radius in `[min_radius, max_radius]`,
    /// a point count in `[min_points, max_points]`, and vertices on that circle
    /// with jittered but strictly increasing angles.
    pub fn random_convex<R: Rng>(
        rng: &mut R,
        min_radius: f64,
        max_radius: f64,
        min_points: usize,
        max_points: usize,
    ) -> ShapeResult<Self> {
        let radius = safe_range(rng, min_radius, max_radius);
        let count = if min_points >= max_points {
            min_points
        } else {
            rng.gen_range(min_points..=max_points)
        };
        if count < 3 {
            return Err(ShapeError::TooFewPoints { count });
        }
        let step = 2.0 * PI / count as f64;
        let start = rng.gen_range(0.0..2.0 * PI);
        let points = (0..count)
            .map(|i| {
                let jitter = rng.gen_range(-step..=-step * 0.5);
                let angle = step * i as f64 + jitter + start;
                vec2(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[Vector2D] {
        &self.points
    }

    pub fn normals(&self) -> &[Vector2D] {
        &self.normals
    }

    pub fn normal_min(&self, index: usize) -> f64 {
        self.normal_mins[index]
    }

    pub fn normal_max(&self, index: usize) -> f64 {
        self.normal_maxs[index]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Extents of the points relative to the center.
    pub fn extents(&self) -> BoundingBox {
        self.extents
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// True when the extents box is a tighter pre-filter than the bounding circle.
    pub fn uses_bounding_box(&self) -> bool {
        self.uses_bounding_box
    }

    /// Min/max projection of the points onto `axis`, relative to the center.
    pub fn project(&self, axis: &Vector2D) -> (f64, f64) {
        project_points(&self.points, axis)
    }
}

fn project_points(points: &[Vector2D], axis: &Vector2D) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for point in points {
        let d = point.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Circle(Circle),
    Aabb(Aabb),
    Polygon(Polygon),
}

/// Cheap volume used to pre-filter polygon pairs, relative to the shape center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BoundingVolume {
    Circle { radius: f64 },
    Box(BoundingBox),
}

/// A shape moving with constant velocity, plus its cached swept bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    position: Vector2D,
    velocity: Vector2D,
    radius: f64,
    bounds: BoundingBox,
    horizon: f64,
}

impl Shape {
    pub fn new(kind: ShapeKind, x: f64, y: f64) -> ShapeResult<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        let radius = match &kind {
            ShapeKind::Circle(circle) => circle.radius,
            ShapeKind::Aabb(aabb) => aabb.half_extents().norm(),
            ShapeKind::Polygon(polygon) => polygon.radius(),
        };
        let mut shape = Self {
            kind,
            position: vec2(x, y),
            velocity: Vector2D::zeros(),
            radius,
            bounds: BoundingBox::default(),
            horizon: 0.0,
        };
        shape.calculate_bounding_box(0.0);
        Ok(shape)
    }

    pub fn circle(x: f64, y: f64, radius: f64) -> ShapeResult<Self> {
        Self::new(ShapeKind::Circle(Circle::new(radius)?), x, y)
    }

    pub fn aabb(x: f64, y: f64, half_width: f64, half_height: f64) -> ShapeResult<Self> {
        Self::new(ShapeKind::Aabb(Aabb::new(half_width, half_height)?), x, y)
    }

    pub fn polygon(x: f64, y: f64, points: Vec<Vector2D>) -> ShapeResult<Self> {
        Self::new(ShapeKind::Polygon(Polygon::new(points)?), x, y)
    }

    pub fn with_velocity(mut self, dx: f64, dy: f64) -> Self {
        self.velocity = vec2(dx, dy);
        self.calculate_bounding_box(self.horizon);
        self
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    /// Moves the shape without sweeping; the cached box is stale until the
    /// next `calculate_bounding_box`.
    pub fn set_position(&mut self, position: Vector2D) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector2D) {
        self.velocity = velocity;
    }

    /// Radius of the circle around the center enclosing the whole shape.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn is_finite(&self) -> bool {
        is_finite(&self.position) && is_finite(&self.velocity)
    }

    /// Extents of the shape relative to its center.
    pub fn local_extents(&self) -> BoundingBox {
        match &self.kind {
            ShapeKind::Circle(circle) => {
                BoundingBox::from_center(0.0, 0.0, circle.radius, circle.radius)
            }
            ShapeKind::Aabb(aabb) => {
                BoundingBox::from_center(0.0, 0.0, aabb.half_width, aabb.half_height)
            }
            ShapeKind::Polygon(polygon) => polygon.extents(),
        }
    }

    pub fn bounding_volume(&self) -> BoundingVolume {
        match &self.kind {
            ShapeKind::Circle(circle) => BoundingVolume::Circle {
                radius: circle.radius,
            },
            ShapeKind::Aabb(_) => BoundingVolume::Box(self.local_extents()),
            ShapeKind::Polygon(polygon) if polygon.uses_bounding_box() => {
                BoundingVolume::Box(polygon.extents())
            }
            ShapeKind::Polygon(polygon) => BoundingVolume::Circle {
                radius: polygon.radius(),
            },
        }
    }

    /// Recomputes the cached box so it covers the shape swept from its current
    /// position over `[0, time]`.
    pub fn calculate_bounding_box(&mut self, time: f64) {
        let local = self.local_extents();
        let mut bounds = local.translated(&self.position);
        bounds.expand_to_include(&local.translated(&(self.position + self.velocity * time)));
        self.bounds = bounds;
        self.horizon = time;
    }

    pub fn update_position(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Copy of the shape moved forward by `dt`.
    pub fn advanced(&self, dt: f64) -> Self {
        let mut shape = self.clone();
        shape.update_position(dt);
        shape
    }
}
