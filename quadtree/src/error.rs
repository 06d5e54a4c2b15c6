use crate::quadtree::NodeId;
use collisions::EntityId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadtreeError {
    InvalidRegion {
        center_x: f64,
        center_y: f64,
        half_length: f64,
    },
    InvalidLeafCapacity {
        capacity: usize,
    },
    InvalidMinHalfLength {
        min_half_length: f64,
    },
    UnknownEntity {
        id: EntityId,
    },
    NonFiniteEntity,
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadtreeError::InvalidRegion {
                center_x,
                center_y,
                half_length,
            } => {
                write!(
                    f,
                    "tree region must be finite with a positive half length (center: ({}, {}), half_length: {})",
                    center_x, center_y, half_length
                )
            }
            QuadtreeError::InvalidLeafCapacity { capacity } => {
                write!(f, "leaf capacity must be at least 1 (capacity: {})", capacity)
            }
            QuadtreeError::InvalidMinHalfLength { min_half_length } => {
                write!(
                    f,
                    "minimum half length must be finite and positive (min_half_length: {})",
                    min_half_length
                )
            }
            QuadtreeError::UnknownEntity { id } => write!(f, "no entity with id {}", id),
            QuadtreeError::NonFiniteEntity => {
                write!(f, "entity position and velocity must be finite")
            }
        }
    }
}

impl std::error::Error for QuadtreeError {}

/// Structural problem found by `QuadTree::check_invariants`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvariantViolation {
    EntityCountMismatch {
        node: NodeId,
        cached: usize,
        actual: usize,
    },
    EntityNotContained {
        entity: EntityId,
        node: NodeId,
    },
    LoosePlacement {
        entity: EntityId,
        node: NodeId,
    },
    BrokenBackReference {
        entity: EntityId,
    },
    UnplacedEntity {
        entity: EntityId,
    },
    BrokenParentLink {
        node: NodeId,
    },
    CollisionListUnordered,
    CollisionListStale {
        node: NodeId,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::EntityCountMismatch {
                node,
                cached,
                actual,
            } => write!(
                f,
                "node {:?} caches {} entities but holds {}",
                node, cached, actual
            ),
            InvariantViolation::EntityNotContained { entity, node } => write!(
                f,
                "entity {} is not strictly contained by its node {:?}",
                entity, node
            ),
            InvariantViolation::LoosePlacement { entity, node } => write!(
                f,
                "entity {} in node {:?} fits entirely inside a child",
                entity, node
            ),
            InvariantViolation::BrokenBackReference { entity } => {
                write!(f, "entity {} has a stale node/slot reference", entity)
            }
            InvariantViolation::UnplacedEntity { entity } => {
                write!(f, "entity {} is not stored in any reachable bucket", entity)
            }
            InvariantViolation::BrokenParentLink { node } => {
                write!(f, "node {:?} does not point back to its parent", node)
            }
            InvariantViolation::CollisionListUnordered => {
                write!(f, "collision list lost its heap order")
            }
            InvariantViolation::CollisionListStale { node } => write!(
                f,
                "collision list key of node {:?} differs from its cached collision",
                node
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
