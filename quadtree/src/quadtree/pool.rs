use super::types::{Node, NodeId, NodeKind};
use collisions::Collision;
use std::ops::{Index, IndexMut};

pub(crate) trait Resettable {
    fn reset(&mut self);
}

impl Resettable for Node {
    fn reset(&mut self) {
        self.kind = NodeKind::Leaf;
        self.parent = None;
        self.entities.clear();
        self.entity_count = 0;
        self.collision = Collision::none();
    }
}

#[derive(Debug, Default)]
pub(crate) struct NodePool {
    nodes: Vec<Node>,
    live: Vec<bool>,
    free: Vec<NodeId>,
}

impl NodePool {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(
        &mut self,
        parent: Option<NodeId>,
        center_x: f64,
        center_y: f64,
        half_length: f64,
    ) -> NodeId {
        if let Some(id) = self.free.pop() {
            let node = &mut self.nodes[id.index()];
            node.parent = parent;
            node.center_x = center_x;
            node.center_y = center_y;
            node.half_length = half_length;
            self.live[id.index()] = true;
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(Node::new(parent, center_x, center_y, half_length));
        self.live.push(true);
        id
    }

    pub(crate) fn release(&mut self, id: NodeId) {
        debug_assert!(self.live[id.index()], "node {:?} released twice", id);
        self.nodes[id.index()].reset();
        self.live[id.index()] = false;
        self.free.push(id);
    }

    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        self.live.get(id.index()).copied().unwrap_or(false)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.live.clear();
        self.free.clear();
    }
}

impl Index<NodeId> for NodePool {
    type Output = Node;

    #[inline(always)]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodePool {
    #[inline(always)]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
