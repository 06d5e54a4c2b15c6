use super::types::NodeId;
use collisions::EntityId;
use common::shapes::Shape;
use common::Vector2D;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Body,
    Sensor,
}

#[derive(Debug, Clone)]
pub struct Entity {
    shape: Shape,
    mass: f64,
    acceleration: Vector2D,
    entity_type: u32,
    kind: EntityKind,
    affected_by_effects: bool,
    pub(crate) node: Option<NodeId>,
    pub(crate) slot: usize,
}

impl Entity {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            mass: 1.0,
            acceleration: Vector2D::zeros(),
            entity_type: 0,
            kind: EntityKind::Body,
            affected_by_effects: true,
            node: None,
            slot: 0,
        }
    }

    /// Region sensor. Sensors ignore world effects unless re-enabled.
    pub fn sensor(shape: Shape) -> Self {
        Self {
            kind: EntityKind::Sensor,
            affected_by_effects: false,
            ..Self::new(shape)
        }
    }

    /// `f64::INFINITY` makes the entity immovable for impulse responses.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_entity_type(mut self, entity_type: u32) -> Self {
        self.entity_type = entity_type;
        self
    }

    pub fn with_acceleration(mut self, ax: f64, ay: f64) -> Self {
        self.acceleration = Vector2D::new(ax, ay);
        self
    }

    pub fn with_effects(mut self, affected: bool) -> Self {
        self.affected_by_effects = affected;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn position(&self) -> Vector2D {
        self.shape.position()
    }

    /// Teleports the entity. The tree repairs its placement on the next
    /// containment pass.
    pub fn set_position(&mut self, position: Vector2D) {
        self.shape.set_position(position);
    }

    pub fn velocity(&self) -> Vector2D {
        self.shape.velocity()
    }

    pub fn set_velocity(&mut self, velocity: Vector2D) {
        self.shape.set_velocity(velocity);
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f64 {
        if self.mass.is_finite() && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    pub fn acceleration(&self) -> Vector2D {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: Vector2D) {
        self.acceleration = acceleration;
    }

    pub fn entity_type(&self) -> u32 {
        self.entity_type
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_sensor(&self) -> bool {
        self.kind == EntityKind::Sensor
    }

    pub fn affected_by_effects(&self) -> bool {
        self.affected_by_effects
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn update_motion(&mut self, dt: f64, extra: Vector2D) {
        let velocity = self.shape.velocity() + (self.acceleration + extra) * dt;
        self.shape.set_velocity(velocity);
    }
}

#[derive(Debug, Default)]
pub(crate) struct EntitySlab {
    slots: Vec<Option<Entity>>,
    free: Vec<EntityId>,
    len: usize,
}

impl EntitySlab {
    pub(crate) fn insert(&mut self, entity: Entity) -> EntityId {
        self.len += 1;
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(entity);
            return id;
        }
        self.slots.push(Some(entity));
        EntityId::new((self.slots.len() - 1) as u32)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id);
        self.len -= 1;
        Some(entity)
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.index())?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub(crate) fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|entity| (EntityId::new(index as u32), entity))
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            slot.as_mut()
                .map(|entity| (EntityId::new(index as u32), entity))
        })
    }

    pub(crate) fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        if a == b {
            return None;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        if high.index() >= self.slots.len() {
            return None;
        }
        let (head, tail) = self.slots.split_at_mut(high.index());
        let first = head[low.index()].as_mut()?;
        let second = tail[0].as_mut()?;
        if a < b {
            Some((first, second))
        } else {
            Some((second, first))
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl Index<EntityId> for EntitySlab {
    type Output = Entity;

    #[inline(always)]
    fn index(&self, id: EntityId) -> &Entity {
        match &self.slots[id.index()] {
            Some(entity) => entity,
            None => panic!("entity {} is not live", id),
        }
    }
}

impl IndexMut<EntityId> for EntitySlab {
    #[inline(always)]
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        match &mut self.slots[id.index()] {
            Some(entity) => entity,
            None => panic!("entity {} is not live", id),
        }
    }
}
