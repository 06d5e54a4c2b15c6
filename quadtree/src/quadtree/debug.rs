use super::types::{NodeKind, NodeStack};
use super::*;
use collisions::EntityId;
use common::shapes::BoundingBox;
use smallvec::SmallVec;

/// Read-only snapshot of one node, for drawing and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub center_x: f64,
    pub center_y: f64,
    pub half_length: f64,
    pub depth: usize,
    pub entity_count: usize,
    pub bucket_len: usize,
    pub is_leaf: bool,
    pub collision_time: f64,
}

impl NodeView {
    pub fn region(&self) -> BoundingBox {
        BoundingBox::from_center(
            self.center_x,
            self.center_y,
            self.half_length,
            self.half_length,
        )
    }
}

impl QuadTree {
    pub fn node_views(&self, views: &mut Vec<NodeView>) {
        let mut stack: SmallVec<[(NodeId, usize); 64]> = SmallVec::new();
        stack.push((self.root, 0));
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            views.push(NodeView {
                id,
                parent: node.parent,
                center_x: node.center_x,
                center_y: node.center_y,
                half_length: node.half_length,
                depth,
                entity_count: node.entity_count,
                bucket_len: node.entities.len(),
                is_leaf: node.is_leaf(),
                collision_time: node.collision.time,
            });
            if let NodeKind::Quad(children) = node.kind {
                for child in children.into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
    }

    pub fn all_node_bounding_boxes(&self, bounding_boxes: &mut Vec<BoundingBox>) {
        let mut stack: NodeStack = NodeStack::new();
        stack.push(self.root);
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            bounding_boxes.push(node.region());
            if let NodeKind::Quad(children) = node.kind {
                stack.extend(children);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.live_count()
    }

    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: SmallVec<[(NodeId, usize); 64]> = SmallVec::new();
        stack.push((self.root, 0));
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let NodeKind::Quad(children) = self.nodes[id].kind {
                for child in children {
                    stack.push((child, depth + 1));
                }
            }
        }
        deepest
    }

    pub fn root_region(&self) -> BoundingBox {
        self.nodes[self.root].region()
    }

    pub fn bucket(&self, node: NodeId) -> &[EntityId] {
        if self.nodes.is_live(node) {
            &self.nodes[node].entities
        } else {
            &[]
        }
    }

    pub fn pool_free_count(&self) -> usize {
        self.nodes.free_count()
    }
}
