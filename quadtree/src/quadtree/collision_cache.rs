use super::entity::Entity;
use super::types::{NodeKind, NodePath, NodeStack};
use super::*;
use collisions::{time_to_collision, Collision, CollisionGroups, EntityId};
use fxhash::FxHashSet;

#[inline(always)]
pub fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PairFilter<'a> {
    groups: &'a CollisionGroups,
    suppressed: Option<&'a FxHashSet<(EntityId, EntityId)>>,
}

impl<'a> PairFilter<'a> {
    pub fn new(groups: &'a CollisionGroups) -> Self {
        Self {
            groups,
            suppressed: None,
        }
    }

    /// Pairs in `suppressed` (keyed by `pair_key`) are skipped.
    pub fn with_suppressed(mut self, suppressed: &'a FxHashSet<(EntityId, EntityId)>) -> Self {
        self.suppressed = Some(suppressed);
        self
    }

    #[inline(always)]
    pub fn allows(&self, a: EntityId, entity_a: &Entity, b: EntityId, entity_b: &Entity) -> bool {
        if !self
            .groups
            .allows(entity_a.entity_type(), entity_b.entity_type())
        {
            return false;
        }
        match self.suppressed {
            Some(suppressed) => !suppressed.contains(&pair_key(a, b)),
            None => true,
        }
    }
}

/// Window a collision check covers: shapes are at their positions for
/// `current_time` and move for at most `time_left` more.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub filter: PairFilter<'a>,
    pub current_time: f64,
    pub time_left: f64,
}

impl<'a> CheckContext<'a> {
    pub fn new(filter: PairFilter<'a>, current_time: f64, time_left: f64) -> Self {
        Self {
            filter,
            current_time,
            time_left,
        }
    }
}

impl QuadTree {
    #[inline(always)]
    fn check_pair(&self, a: EntityId, b: EntityId, ctx: &CheckContext, best: &mut Collision) {
        let (entity_a, entity_b) = (&self.entities[a], &self.entities[b]);
        if !ctx.filter.allows(a, entity_a, b, entity_b) {
            return;
        }
        if !entity_a
            .shape()
            .bounds()
            .overlaps(entity_b.shape().bounds())
        {
            return;
        }
        if let Some(impact) = time_to_collision(entity_a.shape(), entity_b.shape(), ctx.time_left) {
            let time = ctx.current_time + impact.time;
            if time < best.time {
                best.set(time, impact.normal, a, b);
            }
        }
    }

    fn check_entity_against_subtrees(
        &self,
        node: NodeId,
        id: EntityId,
        ctx: &CheckContext,
        best: &mut Collision,
    ) {
        let NodeKind::Quad(children) = self.nodes[node].kind else {
            return;
        };
        let bounds = *self.entities[id].shape().bounds();
        let mut stack: NodeStack = NodeStack::new();
        stack.extend(children);
        while let Some(current) = stack.pop() {
            let child = &self.nodes[current];
            if child.entity_count == 0 || !child.may_touch(&bounds) {
                continue;
            }
            for &other in &child.entities {
                self.check_pair(id, other, ctx, best);
            }
            if let NodeKind::Quad(grandchildren) = child.kind {
                stack.extend(grandchildren);
            }
        }
    }

    fn calc_level(&mut self, node: NodeId, ctx: &CheckContext) {
        let mut best = Collision::none();
        let bucket = &self.nodes[node].entities;
        for (i, &a) in bucket.iter().enumerate() {
            for &b in &bucket[i + 1..] {
                self.check_pair(a, b, ctx, &mut best);
            }
            self.check_entity_against_subtrees(node, a, ctx, &mut best);
        }
        self.set_collision(node, best);
    }

    #[inline(always)]
    fn set_collision(&mut self, node: NodeId, collision: Collision) {
        self.nodes[node].collision = collision;
        self.list.update(node, collision.time);
    }

    pub fn init_calc_collisions(&mut self, filter: PairFilter, time_left: f64) {
        let ctx = CheckContext::new(filter, 0.0, time_left);
        let mut stack: NodeStack = NodeStack::new();
        stack.push(self.root);
        while let Some(node) = stack.pop() {
            self.calc_level(node, &ctx);
            if let NodeKind::Quad(children) = self.nodes[node].kind {
                stack.extend(children);
            }
        }
    }

    pub fn next_collision(&self) -> Option<Collision> {
        let node = self.list.peek()?;
        let collision = self.nodes[node].collision;
        collision.is_collision().then_some(collision)
    }

    /// Re-places an entity whose motion changed at `ctx.current_time` and
    /// repairs the cached collisions of the nodes on its old and new paths.
    pub fn entity_updated(&mut self, id: EntityId, ctx: &CheckContext) -> QuadtreeResult<()> {
        if !self.entities.contains(id) {
            return Err(QuadtreeError::UnknownEntity { id });
        }
        let old = self
            .detach(id)
            .ok_or(QuadtreeError::UnknownEntity { id })?;
        let old_path = self.path_to_root(old);

        let shape = self.entities[id].shape_mut();
        shape.calculate_bounding_box(ctx.time_left);
        let bounds = *shape.bounds();
        let new_node = self.relocate_up(old, id, &bounds, false);
        let new_path = self.path_to_root(new_node);

        let mut recomputed = NodePath::new();
        for &node in &old_path {
            if self.nodes[node].collision.involves(id) {
                self.calc_level(node, ctx);
                recomputed.push(node);
            }
        }

        for (depth, &node) in new_path.iter().enumerate() {
            if recomputed.contains(&node) {
                continue;
            }
            let mut best = self.nodes[node].collision;
            if depth == 0 {
                for &other in &self.nodes[node].entities {
                    if other != id {
                        self.check_pair(id, other, ctx, &mut best);
                    }
                }
                self.check_entity_against_subtrees(node, id, ctx, &mut best);
            } else {
                for &other in &self.nodes[node].entities {
                    self.check_pair(other, id, ctx, &mut best);
                }
            }
            if best.time < self.nodes[node].collision.time {
                self.set_collision(node, best);
            }
        }
        self.assert_invariants("entity_updated");
        Ok(())
    }

    pub fn remove_entity_during_collision(
        &mut self,
        id: EntityId,
        ctx: &CheckContext,
    ) -> QuadtreeResult<Entity> {
        if !self.entities.contains(id) {
            return Err(QuadtreeError::UnknownEntity { id });
        }
        let node = self
            .detach(id)
            .ok_or(QuadtreeError::UnknownEntity { id })?;
        self.decrement_path(node);
        for node in self.path_to_root(node) {
            if self.nodes[node].collision.involves(id) {
                self.calc_level(node, ctx);
            }
        }
        let entity = self
            .entities
            .remove(id)
            .ok_or(QuadtreeError::UnknownEntity { id })?;
        self.assert_invariants("remove_entity_during_collision");
        Ok(entity)
    }

    pub fn reset_collisions(&mut self) {
        let mut stack: NodeStack = NodeStack::new();
        stack.push(self.root);
        while let Some(node) = stack.pop() {
            self.nodes[node].collision = Collision::none();
            if let NodeKind::Quad(children) = self.nodes[node].kind {
                stack.extend(children);
            }
        }
        self.list.reset_all();
    }

    pub(crate) fn forget_collisions_of(&mut self, node: NodeId, id: EntityId) {
        for node in self.path_to_root(node) {
            if self.nodes[node].collision.involves(id) {
                self.set_collision(node, Collision::none());
            }
        }
    }
}
