use collisions::{Collision, EntityId};
use common::shapes::BoundingBox;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Child slot of a quad. "Top" is the smaller y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    #[inline(always)]
    pub(crate) fn from_sides(right: bool, bottom: bool) -> Self {
        match (right, bottom) {
            (false, false) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, true) => Quadrant::BottomLeft,
            (true, true) => Quadrant::BottomRight,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub(crate) fn signs(self) -> (f64, f64) {
        match self {
            Quadrant::TopLeft => (-1.0, -1.0),
            Quadrant::TopRight => (1.0, -1.0),
            Quadrant::BottomLeft => (-1.0, 1.0),
            Quadrant::BottomRight => (1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Leaf,
    Quad([NodeId; 4]),
}

pub(crate) type Bucket = SmallVec<[EntityId; 8]>;
pub(crate) type NodeStack = SmallVec<[NodeId; 64]>;
pub(crate) type NodePath = SmallVec<[NodeId; 32]>;

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) center_x: f64,
    pub(crate) center_y: f64,
    pub(crate) half_length: f64,
    /// Entities that live in this node and straddle its children.
    pub(crate) entities: Bucket,
    pub(crate) entity_count: usize,
    pub(crate) collision: Collision,
}

impl Node {
    pub(crate) fn new(
        parent: Option<NodeId>,
        center_x: f64,
        center_y: f64,
        half_length: f64,
    ) -> Self {
        Self {
            kind: NodeKind::Leaf,
            parent,
            center_x,
            center_y,
            half_length,
            entities: Bucket::new(),
            entity_count: 0,
            collision: Collision::none(),
        }
    }

    pub(crate) fn region(&self) -> BoundingBox {
        BoundingBox::from_center(
            self.center_x,
            self.center_y,
            self.half_length,
            self.half_length,
        )
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Strict containment: a box touching the region's edge is not contained.
    #[inline(always)]
    pub(crate) fn contains(&self, bounds: &BoundingBox) -> bool {
        bounds.min_x > self.center_x - self.half_length
            && bounds.max_x < self.center_x + self.half_length
            && bounds.min_y > self.center_y - self.half_length
            && bounds.max_y < self.center_y + self.half_length
    }

    /// Quadrant lying entirely on one side of both center lines, if any.
    #[inline(always)]
    pub(crate) fn quadrant_for(&self, bounds: &BoundingBox) -> Option<Quadrant> {
        let right = if bounds.max_x < self.center_x {
            false
        } else if bounds.min_x > self.center_x {
            true
        } else {
            return None;
        };
        let bottom = if bounds.max_y < self.center_y {
            false
        } else if bounds.min_y > self.center_y {
            true
        } else {
            return None;
        };
        Some(Quadrant::from_sides(right, bottom))
    }

    #[inline(always)]
    pub(crate) fn may_touch(&self, bounds: &BoundingBox) -> bool {
        (self.center_x - bounds.center_x()).abs() < bounds.half_width() + self.half_length
            && (self.center_y - bounds.center_y()).abs() < bounds.half_height() + self.half_length
    }
}
