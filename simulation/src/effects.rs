use common::Vector2D;
use quadtree::Entity;

/// Acceleration applied to every affected entity once per frame.
pub trait WorldEffect {
    fn acceleration(&self, entity: &Entity) -> Vector2D;
}

/// Constant acceleration over all of space.
#[derive(Debug, Clone, Copy)]
pub struct Gravity(pub Vector2D);

impl WorldEffect for Gravity {
    fn acceleration(&self, _entity: &Entity) -> Vector2D {
        self.0
    }
}

/// Pull toward a fixed point. A negative `strength` pushes away.
#[derive(Debug, Clone, Copy)]
pub struct PointAttractor {
    pub position: Vector2D,
    pub strength: f64,
    falloff: f64,
}

impl PointAttractor {
    /// `falloff` scales how quickly the pull weakens with squared distance
    /// and must be finite and positive.
    pub fn new(position: Vector2D, strength: f64, falloff: f64) -> Option<Self> {
        if !(falloff > 0.0 && falloff.is_finite()) {
            return None;
        }
        Some(Self {
            position,
            strength,
            falloff,
        })
    }

    pub fn falloff(&self) -> f64 {
        self.falloff
    }
}

impl WorldEffect for PointAttractor {
    fn acceleration(&self, entity: &Entity) -> Vector2D {
        let offset = self.position - entity.position();
        let distance_squared = offset.norm_squared();
        if distance_squared == 0.0 {
            return Vector2D::zeros();
        }
        // + 1.0 keeps the pull finite at the source
        let strength = self.strength / ((distance_squared + 1.0) * self.falloff);
        offset / distance_squared.sqrt() * strength
    }
}
