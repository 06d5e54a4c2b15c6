use super::types::NodeKind;
use super::*;
use crate::error::InvariantViolation;

impl QuadTree {
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = 0;
        self.check_node(self.root, None, &mut seen)?;

        for (id, entity) in self.entities.iter() {
            match entity.node {
                Some(node) if self.nodes.is_live(node) => {}
                _ => return Err(InvariantViolation::UnplacedEntity { entity: id }),
            }
        }
        if seen != self.entities.len() {
            return Err(InvariantViolation::EntityCountMismatch {
                node: self.root,
                cached: self.entities.len(),
                actual: seen,
            });
        }

        if !self.list.is_heap_ordered() || self.list.len() != self.nodes.live_count() {
            return Err(InvariantViolation::CollisionListUnordered);
        }
        Ok(())
    }

    fn check_node(
        &self,
        node: NodeId,
        parent: Option<NodeId>,
        seen: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        if !self.nodes.is_live(node) || self.nodes[node].parent != parent {
            return Err(InvariantViolation::BrokenParentLink { node });
        }
        let current = &self.nodes[node];
        for (slot, &id) in current.entities.iter().enumerate() {
            let entity = self
                .entities
                .get(id)
                .ok_or(InvariantViolation::BrokenBackReference { entity: id })?;
            if entity.node != Some(node) || entity.slot != slot {
                return Err(InvariantViolation::BrokenBackReference { entity: id });
            }
            let bounds = entity.shape().bounds();
            if bounds.is_finite() && !current.contains(bounds) {
                return Err(InvariantViolation::EntityNotContained { entity: id, node });
            }
        }
        *seen += current.entities.len();

        let mut actual = current.entities.len();
        if let NodeKind::Quad(children) = current.kind {
            for child in children {
                actual += self.check_node(child, Some(node), seen)?;
            }
        }
        if actual != current.entity_count {
            return Err(InvariantViolation::EntityCountMismatch {
                node,
                cached: current.entity_count,
                actual,
            });
        }
        if self.list.key(node) != Some(current.collision.time) {
            return Err(InvariantViolation::CollisionListStale { node });
        }
        Ok(actual)
    }

    /// Only holds right after `ensure_entities_are_contained`.
    pub fn check_tight_placement(&self) -> Result<(), InvariantViolation> {
        for (id, entity) in self.entities.iter() {
            let Some(node) = entity.node else {
                return Err(InvariantViolation::UnplacedEntity { entity: id });
            };
            if self
                .child_containing(node, entity.shape().bounds())
                .is_some()
            {
                return Err(InvariantViolation::LoosePlacement { entity: id, node });
            }
        }
        Ok(())
    }
}

impl QuadTree {
    #[cfg(feature = "invariant-checks")]
    pub(crate) fn assert_invariants(&self, after: &str) {
        if let Err(violation) = self.check_invariants() {
            panic!("quadtree invariant violated after {}: {}", after, violation);
        }
    }

    #[cfg(not(feature = "invariant-checks"))]
    #[inline(always)]
    pub(crate) fn assert_invariants(&self, _after: &str) {}
}
