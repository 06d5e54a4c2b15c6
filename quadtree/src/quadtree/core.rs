use super::types::{NodeKind, NodePath, NodeStack};
use super::*;
use collisions::{EntityId, NO_COLLISION};
use common::shapes::BoundingBox;

impl QuadTree {
    pub(crate) fn alloc_node(
        &mut self,
        parent: Option<NodeId>,
        center_x: f64,
        center_y: f64,
        half_length: f64,
    ) -> NodeId {
        let id = self.nodes.alloc(parent, center_x, center_y, half_length);
        self.list.insert(id, NO_COLLISION);
        id
    }

    pub(crate) fn free_node(&mut self, id: NodeId) {
        self.list.remove(id);
        self.nodes.release(id);
    }

    pub(crate) fn release_subtree(&mut self, node: NodeId) {
        let mut stack: NodeStack = NodeStack::new();
        stack.push(node);
        while let Some(current) = stack.pop() {
            if let NodeKind::Quad(children) = self.nodes[current].kind {
                stack.extend(children);
            }
            self.free_node(current);
        }
    }

    pub(crate) fn path_to_root(&self, node: NodeId) -> NodePath {
        let mut path = NodePath::new();
        let mut current = Some(node);
        while let Some(id) = current {
            path.push(id);
            current = self.nodes[id].parent;
        }
        path
    }

    pub(crate) fn attach(&mut self, node: NodeId, id: EntityId) {
        let bucket = &mut self.nodes[node].entities;
        bucket.push(id);
        let slot = bucket.len() - 1;
        let entity = &mut self.entities[id];
        entity.node = Some(node);
        entity.slot = slot;
    }

    pub(crate) fn detach(&mut self, id: EntityId) -> Option<NodeId> {
        let entity = &mut self.entities[id];
        let node = entity.node.take()?;
        let slot = entity.slot;
        let bucket = &mut self.nodes[node].entities;
        bucket.swap_remove(slot);
        if let Some(&moved) = bucket.get(slot) {
            self.entities[moved].slot = slot;
        }
        Some(node)
    }

    pub(crate) fn decrement_path(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            self.nodes[id].entity_count -= 1;
            current = self.nodes[id].parent;
        }
    }

    #[inline(always)]
    pub(crate) fn child_containing(&self, node: NodeId, bounds: &BoundingBox) -> Option<NodeId> {
        let current = &self.nodes[node];
        let NodeKind::Quad(children) = current.kind else {
            return None;
        };
        let child = children[current.quadrant_for(bounds)?.index()];
        self.nodes[child].contains(bounds).then_some(child)
    }

    pub(crate) fn insert_from(&mut self, node: NodeId, id: EntityId, allow_split: bool) -> NodeId {
        self.nodes[node].entity_count += 1;
        self.insert_below(node, id, allow_split)
    }

    pub(crate) fn insert_below(
        &mut self,
        mut node: NodeId,
        id: EntityId,
        allow_split: bool,
    ) -> NodeId {
        let bounds = *self.entities[id].shape().bounds();
        while let Some(child) = self.child_containing(node, &bounds) {
            self.nodes[child].entity_count += 1;
            node = child;
        }
        self.attach(node, id);
        if allow_split && self.should_split(node) {
            self.split(node);
        }
        self.entities[id].node.unwrap_or(node)
    }

    /// Walks up from `from` (which no longer holds the entity in its bucket)
    /// until a node contains `bounds`, growing the root when needed, then
    /// places the entity below that node.
    pub(crate) fn relocate_up(
        &mut self,
        from: NodeId,
        id: EntityId,
        bounds: &BoundingBox,
        allow_split: bool,
    ) -> NodeId {
        let mut node = from;
        while !self.nodes[node].contains(bounds) {
            let parent = match self.nodes[node].parent {
                Some(parent) => parent,
                None => match self.grow_toward(bounds) {
                    Some(root) => root,
                    None => break,
                },
            };
            self.nodes[node].entity_count -= 1;
            node = parent;
        }
        self.insert_below(node, id, allow_split)
    }

    pub(crate) fn should_split(&self, node: NodeId) -> bool {
        let current = &self.nodes[node];
        current.is_leaf()
            && current.entities.len() > self.config.leaf_capacity
            && current.half_length * 0.5 >= self.config.min_half_length
    }

    pub(crate) fn split(&mut self, node: NodeId) -> usize {
        let (center_x, center_y, half_length) = {
            let current = &self.nodes[node];
            (current.center_x, current.center_y, current.half_length)
        };
        let quarter = half_length * 0.5;
        let children = Quadrant::ALL.map(|quadrant| {
            let (sx, sy) = quadrant.signs();
            self.alloc_node(
                Some(node),
                center_x + sx * quarter,
                center_y + sy * quarter,
                quarter,
            )
        });
        self.nodes[node].kind = NodeKind::Quad(children);

        let bucket = std::mem::take(&mut self.nodes[node].entities);
        let mut moved = 0;
        for id in bucket {
            let bounds = *self.entities[id].shape().bounds();
            match self.child_containing(node, &bounds) {
                Some(child) => {
                    self.insert_from(child, id, true);
                    moved += 1;
                }
                None => self.attach(node, id),
            }
        }
        log::trace!(
            "split node {:?} (half length {}), {} entities pushed down",
            node,
            half_length,
            moved
        );
        moved
    }

    /// Wraps the root in a new root of twice the size that extends toward
    /// `bounds`. The old root becomes the new root's quadrant facing away from
    /// the box; the other three quadrants are fresh leaves.
    pub(crate) fn grow_toward(&mut self, bounds: &BoundingBox) -> Option<NodeId> {
        if !bounds.is_finite() {
            return None;
        }
        let old = self.root;
        let (center_x, center_y, half_length, count) = {
            let root = &self.nodes[old];
            (
                root.center_x,
                root.center_y,
                root.half_length,
                root.entity_count,
            )
        };
        let toward_left = bounds.center_x() < center_x;
        let toward_top = bounds.center_y() < center_y;
        let new_x = if toward_left {
            center_x - half_length
        } else {
            center_x + half_length
        };
        let new_y = if toward_top {
            center_y - half_length
        } else {
            center_y + half_length
        };
        let old_quadrant = Quadrant::from_sides(toward_left, toward_top);

        let root = self.alloc_node(None, new_x, new_y, half_length * 2.0);
        let children = Quadrant::ALL.map(|quadrant| {
            if quadrant == old_quadrant {
                return old;
            }
            let (sx, sy) = quadrant.signs();
            self.alloc_node(
                Some(root),
                new_x + sx * half_length,
                new_y + sy * half_length,
                half_length,
            )
        });
        self.nodes[old].parent = Some(root);
        let new_root = &mut self.nodes[root];
        new_root.kind = NodeKind::Quad(children);
        new_root.entity_count = count;
        self.root = root;
        log::debug!(
            "grew root to half length {} centered at ({}, {})",
            half_length * 2.0,
            new_x,
            new_y
        );
        Some(root)
    }
}
