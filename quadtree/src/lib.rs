pub mod error;
pub mod quadtree;

pub use error::{InvariantViolation, QuadtreeError, QuadtreeResult};
pub use quadtree::{
    pair_key, CheckContext, Config, Entity, EntityKind, NodeId, NodeView, PairFilter, QuadTree,
    Quadrant,
};
