use super::types::NodeId;
use collisions::NO_COLLISION;

const ABSENT: usize = usize::MAX;

/// Indexed binary min-heap of nodes keyed by (collision time, node index).
///
/// `positions` maps a node index to its slot in `heap` so a node whose cached
/// collision changed can be re-ordered in O(log n).
#[derive(Debug, Default)]
pub(crate) struct CollisionList {
    heap: Vec<NodeId>,
    keys: Vec<f64>,
    positions: Vec<usize>,
}

impl CollisionList {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn peek(&self) -> Option<NodeId> {
        self.heap.first().copied()
    }

    pub(crate) fn key(&self, node: NodeId) -> Option<f64> {
        match self.positions.get(node.index()) {
            Some(&position) if position != ABSENT => Some(self.keys[node.index()]),
            _ => None,
        }
    }

    pub(crate) fn insert(&mut self, node: NodeId, time: f64) {
        let index = node.index();
        if index >= self.keys.len() {
            self.keys.resize(index + 1, NO_COLLISION);
            self.positions.resize(index + 1, ABSENT);
        }
        if self.positions[index] != ABSENT {
            self.update(node, time);
            return;
        }
        self.keys[index] = time;
        self.positions[index] = self.heap.len();
        self.heap.push(node);
        self.sift_up(self.heap.len() - 1);
    }

    pub(crate) fn remove(&mut self, node: NodeId) {
        let position = match self.positions.get(node.index()) {
            Some(&position) if position != ABSENT => position,
            _ => return,
        };
        let last = self.heap.len() - 1;
        self.heap.swap(position, last);
        self.heap.pop();
        self.positions[node.index()] = ABSENT;
        if position < self.heap.len() {
            self.positions[self.heap[position].index()] = position;
            self.sift_down(position);
            self.sift_up(position);
        }
    }

    pub(crate) fn update(&mut self, node: NodeId, time: f64) {
        let position = match self.positions.get(node.index()) {
            Some(&position) if position != ABSENT => position,
            _ => {
                self.insert(node, time);
                return;
            }
        };
        let previous = self.keys[node.index()];
        self.keys[node.index()] = time;
        if time < previous {
            self.sift_up(position);
        } else if time > previous {
            self.sift_down(position);
        }
    }

    pub(crate) fn reset_all(&mut self) {
        for node in &self.heap {
            self.keys[node.index()] = NO_COLLISION;
        }
        // With equal keys the order falls back to node index; a sorted array is a heap.
        self.heap.sort_unstable();
        for (position, node) in self.heap.iter().enumerate() {
            self.positions[node.index()] = position;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.keys.clear();
        self.positions.clear();
    }

    pub(crate) fn is_heap_ordered(&self) -> bool {
        (1..self.heap.len()).all(|child| !self.less(self.heap[child], self.heap[(child - 1) / 2]))
            && self
                .heap
                .iter()
                .enumerate()
                .all(|(position, node)| self.positions[node.index()] == position)
    }

    #[inline(always)]
    fn less(&self, a: NodeId, b: NodeId) -> bool {
        let (ka, kb) = (self.keys[a.index()], self.keys[b.index()]);
        ka < kb || (ka == kb && a < b)
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(self.heap[position], self.heap[parent]) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left = 2 * position + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let mut smallest = left;
            if right < self.heap.len() && self.less(self.heap[right], self.heap[left]) {
                smallest = right;
            }
            if !self.less(self.heap[smallest], self.heap[position]) {
                break;
            }
            self.swap(position, smallest);
            position = smallest;
        }
    }

    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a].index()] = a;
        self.positions[self.heap[b].index()] = b;
    }
}
