use super::types::{NodeKind, NodeStack};
use super::*;

impl QuadTree {
    /// Recomputes every entity's box for `time` and moves entities that left
    /// their node or now fit a child. Returns how many changed node.
    pub fn ensure_entities_are_contained(&mut self, time: f64) -> usize {
        for (_, entity) in self.entities.iter_mut() {
            entity.shape_mut().calculate_bounding_box(time);
        }

        let mut moved = 0;
        let mut stack: NodeStack = NodeStack::new();
        stack.push(self.root);
        while let Some(node) = stack.pop() {
            if self.should_split(node) {
                moved += self.split(node);
            }

            let mut slot = 0;
            while slot < self.nodes[node].entities.len() {
                let id = self.nodes[node].entities[slot];
                let bounds = *self.entities[id].shape().bounds();
                if !bounds.is_finite() {
                    log::warn!("entity {} has a non-finite box and stays put", id);
                    slot += 1;
                } else if !self.nodes[node].contains(&bounds) {
                    self.detach(id);
                    self.relocate_up(node, id, &bounds, true);
                    moved += 1;
                } else if let Some(child) = self.child_containing(node, &bounds) {
                    self.detach(id);
                    self.insert_from(child, id, true);
                    moved += 1;
                } else {
                    slot += 1;
                }
            }

            if let NodeKind::Quad(children) = self.nodes[node].kind {
                stack.extend(children);
            }
        }
        if moved > 0 {
            log::debug!("containment pass moved {} entities", moved);
        }
        self.assert_invariants("ensure_entities_are_contained");
        moved
    }

    pub fn try_resize(&mut self) {
        let mut stack: NodeStack = NodeStack::new();
        stack.push(self.root);
        while let Some(node) = stack.pop() {
            let NodeKind::Quad(children) = self.nodes[node].kind else {
                continue;
            };
            if self.nodes[node].entity_count == 0 {
                for child in children {
                    self.release_subtree(child);
                }
                self.nodes[node].kind = NodeKind::Leaf;
                log::debug!("collapsed node {:?}", node);
            } else {
                stack.extend(children);
            }
        }
        self.assert_invariants("try_resize");
    }
}
