use common::Vector2D;
use std::fmt;

/// Time of a record that holds no collision.
pub const NO_COLLISION: f64 = f64::MAX;

/// Stable handle of an entity stored in the tree's entity arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Earliest known collision among a set of pairs.
///
/// `time` is absolute within the current frame. `normal` is a unit vector
/// pointing from `a` toward `b`. A record with `time == NO_COLLISION` is empty
/// and carries no participants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub time: f64,
    pub normal: Option<Vector2D>,
    pub a: Option<EntityId>,
    pub b: Option<EntityId>,
}

impl Collision {
    pub fn none() -> Self {
        Self {
            time: NO_COLLISION,
            normal: None,
            a: None,
            b: None,
        }
    }

    pub fn new(time: f64, normal: Vector2D, a: EntityId, b: EntityId) -> Self {
        Self {
            time,
            normal: Some(normal),
            a: Some(a),
            b: Some(b),
        }
    }

    pub fn set(&mut self, time: f64, normal: Vector2D, a: EntityId, b: EntityId) {
        *self = Self::new(time, normal, a, b);
    }

    pub fn set_no_collision(&mut self) {
        *self = Self::none();
    }

    pub fn is_collision(&self) -> bool {
        self.time != NO_COLLISION
    }

    pub fn involves(&self, id: EntityId) -> bool {
        self.a == Some(id) || self.b == Some(id)
    }

    /// Both participants, when the record holds a collision.
    pub fn participants(&self) -> Option<(EntityId, EntityId)> {
        match (self.a, self.b) {
            (Some(a), Some(b)) if self.is_collision() => Some((a, b)),
            _ => None,
        }
    }

    /// Keeps whichever of the two records happens first; ties keep `self`.
    pub fn keep_earliest(&mut self, other: &Collision) {
        if other.time < self.time {
            *self = *other;
        }
    }
}

impl Default for Collision {
    fn default() -> Self {
        Self::none()
    }
}
