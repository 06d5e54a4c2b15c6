use collisions::EntityId;
use common::Vector2D;
use quadtree::Entity;

/// A collision being reported, with both participants open for mutation.
///
/// The handler is expected to change the velocities so the bodies separate;
/// a pair left touching and approaching is reported again immediately.
pub struct Contact<'a> {
    time: f64,
    normal: Vector2D,
    ids: (EntityId, EntityId),
    a: &'a mut Entity,
    b: &'a mut Entity,
    remove_a: bool,
    remove_b: bool,
}

impl<'a> Contact<'a> {
    pub(crate) fn new(
        time: f64,
        normal: Vector2D,
        ids: (EntityId, EntityId),
        a: &'a mut Entity,
        b: &'a mut Entity,
    ) -> Self {
        Self {
            time,
            normal,
            ids,
            a,
            b,
            remove_a: false,
            remove_b: false,
        }
    }

    /// Time since the start of the current `advance`.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Unit normal pointing from `a` toward `b`.
    pub fn normal(&self) -> Vector2D {
        self.normal
    }

    pub fn ids(&self) -> (EntityId, EntityId) {
        self.ids
    }

    pub fn a(&mut self) -> &mut Entity {
        &mut *self.a
    }

    pub fn b(&mut self) -> &mut Entity {
        &mut *self.b
    }

    pub fn entities(&mut self) -> (&mut Entity, &mut Entity) {
        (&mut *self.a, &mut *self.b)
    }

    /// Removes `a` from the world once the handler returns.
    pub fn remove_a(&mut self) {
        self.remove_a = true;
    }

    pub fn remove_b(&mut self) {
        self.remove_b = true;
    }

    pub(crate) fn removals(&self) -> (bool, bool) {
        (self.remove_a, self.remove_b)
    }
}

pub trait CollisionHandler {
    fn handle(&mut self, contact: &mut Contact<'_>);
}

impl<F> CollisionHandler for F
where
    F: FnMut(&mut Contact<'_>),
{
    fn handle(&mut self, contact: &mut Contact<'_>) {
        (*self)(contact)
    }
}
