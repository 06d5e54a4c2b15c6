mod api;
mod collision_cache;
mod collision_list;
mod config;
mod core;
mod debug;
mod entity;
mod invariants;
mod maintenance;
mod pool;
mod types;

pub use collision_cache::{pair_key, CheckContext, PairFilter};
pub use config::Config;
pub use debug::NodeView;
pub use entity::{Entity, EntityKind};
pub use types::{NodeId, Quadrant};

use crate::error::{QuadtreeError, QuadtreeResult};
use collision_list::CollisionList;
use entity::EntitySlab;
use pool::NodePool;

/// Adaptive quadtree that caches, per node, the earliest collision among the
/// entity pairs the node owns.
#[derive(Debug)]
pub struct QuadTree {
    root: NodeId,
    nodes: NodePool,
    entities: EntitySlab,
    list: CollisionList,
    config: Config,
}

impl QuadTree {
    pub fn new(center_x: f64, center_y: f64, half_length: f64) -> QuadtreeResult<Self> {
        Self::new_with_config(Config {
            center_x,
            center_y,
            half_length,
            ..Config::default()
        })
    }

    pub fn new_with_config(config: Config) -> QuadtreeResult<Self> {
        validate_config(&config)?;
        let mut tree = QuadTree {
            root: NodeId(0),
            nodes: NodePool::with_capacity(config.pool_size),
            entities: EntitySlab::default(),
            list: CollisionList::with_capacity(config.pool_size),
            config,
        };
        tree.root = tree.alloc_node(
            None,
            tree.config.center_x,
            tree.config.center_y,
            tree.config.half_length,
        );
        Ok(tree)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }
}

fn validate_config(config: &Config) -> QuadtreeResult<()> {
    if !config.center_x.is_finite()
        || !config.center_y.is_finite()
        || !config.half_length.is_finite()
        || config.half_length <= 0.0
    {
        return Err(QuadtreeError::InvalidRegion {
            center_x: config.center_x,
            center_y: config.center_y,
            half_length: config.half_length,
        });
    }
    if config.leaf_capacity == 0 {
        return Err(QuadtreeError::InvalidLeafCapacity {
            capacity: config.leaf_capacity,
        });
    }
    if !config.min_half_length.is_finite() || config.min_half_length <= 0.0 {
        return Err(QuadtreeError::InvalidMinHalfLength {
            min_half_length: config.min_half_length,
        });
    }
    Ok(())
}
