use super::*;
use collisions::{Collision, EntityId};

impl QuadTree {
    pub fn add_entity(&mut self, mut entity: Entity) -> QuadtreeResult<EntityId> {
        if !entity.shape().is_finite() {
            return Err(QuadtreeError::NonFiniteEntity);
        }
        entity.shape_mut().calculate_bounding_box(0.0);
        entity.node = None;
        let bounds = *entity.shape().bounds();
        let id = self.entities.insert(entity);

        while !self.nodes[self.root].contains(&bounds) {
            if self.grow_toward(&bounds).is_none() {
                break;
            }
        }
        self.insert_from(self.root, id, true);
        Ok(id)
    }

    pub fn remove_entity(&mut self, id: EntityId) -> QuadtreeResult<Entity> {
        if !self.entities.contains(id) {
            return Err(QuadtreeError::UnknownEntity { id });
        }
        if let Some(node) = self.detach(id) {
            self.decrement_path(node);
            self.forget_collisions_of(node, id);
        }
        self.entities
            .remove(id)
            .ok_or(QuadtreeError::UnknownEntity { id })
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Mutable access to an entity. Position or velocity changes take effect
    /// in the tree on the next `ensure_entities_are_contained`.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        self.entities.pair_mut(a, b)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> + '_ {
        self.entities.iter_mut()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.len() == 0
    }

    pub fn update_positions(&mut self, dt: f64) {
        for (_, entity) in self.entities.iter_mut() {
            entity.shape_mut().update_position(dt);
        }
    }

    pub fn node_collision(&self, node: NodeId) -> Option<Collision> {
        self.nodes
            .is_live(node)
            .then(|| self.nodes[node].collision)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.list.clear();
        self.entities.clear();
        self.root = self.alloc_node(
            None,
            self.config.center_x,
            self.config.center_y,
            self.config.half_length,
        );
        log::debug!("cleared tree");
    }
}
