use crate::config::{SensorPolicy, WorldConfig};
use crate::effects::WorldEffect;
use crate::handler::{CollisionHandler, Contact};
use collisions::{Collision, CollisionGroups, EntityId};
use common::Vector2D;
use fxhash::{FxHashMap, FxHashSet};
use quadtree::{
    pair_key, CheckContext, Entity, PairFilter, QuadTree, QuadtreeError, QuadtreeResult,
};

/// What one `advance` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Collisions passed to the handler.
    pub collisions: usize,
    /// Sensor contacts recorded.
    pub sensor_events: usize,
    /// Entities removed at the handler's request.
    pub removed: usize,
    /// The event cap was hit and the rest of the frame ran without collisions.
    pub truncated: bool,
}

/// Moving entities advanced in continuous time, one collision at a time.
pub struct World {
    tree: QuadTree,
    groups: CollisionGroups,
    effects: Vec<Box<dyn WorldEffect>>,
    sensors: FxHashMap<EntityId, FxHashSet<EntityId>>,
    suppressed: FxHashSet<(EntityId, EntityId)>,
    config: WorldConfig,
}

impl World {
    pub fn new(config: WorldConfig) -> QuadtreeResult<Self> {
        Ok(World {
            tree: QuadTree::new_with_config(config.tree.clone())?,
            groups: CollisionGroups::all(),
            effects: Vec::new(),
            sensors: FxHashMap::default(),
            suppressed: FxHashSet::default(),
            config,
        })
    }

    pub fn add_entity(&mut self, entity: Entity) -> QuadtreeResult<EntityId> {
        let is_sensor = entity.is_sensor();
        let id = self.tree.add_entity(entity)?;
        if is_sensor {
            self.sensors.insert(id, FxHashSet::default());
        }
        Ok(id)
    }

    pub fn remove_entity(&mut self, id: EntityId) -> QuadtreeResult<Entity> {
        let entity = self.tree.remove_entity(id)?;
        self.forget(id);
        Ok(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.tree.entity(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.tree.entity_mut(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.tree.entities()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn set_collision_groups(&mut self, groups: CollisionGroups) {
        self.groups = groups;
    }

    pub fn collision_groups(&self) -> &CollisionGroups {
        &self.groups
    }

    pub fn collision_groups_mut(&mut self) -> &mut CollisionGroups {
        &mut self.groups
    }

    pub fn add_effect<E: WorldEffect + 'static>(&mut self, effect: E) {
        self.effects.push(Box::new(effect));
    }

    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Bodies a sensor has touched since it was last cleared.
    pub fn sensor_contents(&self, sensor: EntityId) -> Option<&FxHashSet<EntityId>> {
        self.sensors.get(&sensor)
    }

    /// Empties a sensor and lets it report its pairs again.
    pub fn clear_sensor(&mut self, sensor: EntityId) {
        if let Some(contents) = self.sensors.get_mut(&sensor) {
            contents.clear();
        }
        self.suppressed
            .retain(|&(a, b)| a != sensor && b != sensor);
    }

    /// Removes every entity. Groups, effects and configuration stay.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.sensors.clear();
        self.suppressed.clear();
    }

    /// Simulates `elapsed` time units, reporting every collision in time order.
    pub fn advance<H>(&mut self, elapsed: f64, handler: &mut H) -> QuadtreeResult<StepReport>
    where
        H: CollisionHandler + ?Sized,
    {
        let mut report = StepReport::default();
        if !(elapsed > 0.0) {
            return Ok(report);
        }
        if self.config.sensor_policy == SensorPolicy::OncePerAdvance {
            self.suppressed.clear();
        }

        self.update_motions(elapsed);
        self.tree.ensure_entities_are_contained(elapsed);
        self.tree.init_calc_collisions(
            PairFilter::new(&self.groups).with_suppressed(&self.suppressed),
            elapsed,
        );

        let mut current_time = 0.0;
        while let Some(collision) = self.tree.next_collision() {
            if collision.time > elapsed {
                break;
            }
            if report.collisions + report.sensor_events >= self.config.max_events_per_advance {
                log::warn!(
                    "event cap of {} reached at t = {}, finishing the frame without collisions",
                    self.config.max_events_per_advance,
                    current_time
                );
                report.truncated = true;
                break;
            }
            let Some((a, b)) = collision.participants() else {
                break;
            };

            if collision.time > current_time {
                self.tree.update_positions(collision.time - current_time);
                current_time = collision.time;
            }
            log::trace!("collision between {} and {} at t = {}", a, b, collision.time);

            let (remove_a, remove_b) = self.resolve(&collision, a, b, handler, &mut report)?;

            let ctx = CheckContext::new(
                PairFilter::new(&self.groups).with_suppressed(&self.suppressed),
                current_time,
                elapsed - current_time,
            );
            let mut removed: [Option<EntityId>; 2] = [None, None];
            for (slot, (id, remove)) in [(a, remove_a), (b, remove_b)].into_iter().enumerate() {
                if remove {
                    self.tree.remove_entity_during_collision(id, &ctx)?;
                    removed[slot] = Some(id);
                } else {
                    self.tree.entity_updated(id, &ctx)?;
                }
            }
            for id in removed.into_iter().flatten() {
                self.forget(id);
                report.removed += 1;
            }
        }

        if elapsed > current_time {
            self.tree.update_positions(elapsed - current_time);
        }
        self.tree.reset_collisions();
        self.tree.try_resize();
        log::debug!(
            "advanced {}: {} collisions, {} sensor events, {} removed",
            elapsed,
            report.collisions,
            report.sensor_events,
            report.removed
        );
        Ok(report)
    }

    /// Velocity += (own acceleration + world effects) * elapsed. Immovable
    /// entities ignore world effects.
    fn update_motions(&mut self, elapsed: f64) {
        let effects = &self.effects;
        for (_, entity) in self.tree.entities_mut() {
            let mut extra = Vector2D::zeros();
            if entity.affected_by_effects() && entity.inverse_mass() > 0.0 {
                for effect in effects {
                    extra += effect.acceleration(entity);
                }
            }
            entity.update_motion(elapsed, extra);
        }
    }

    /// Hands a body collision to the handler, or records a sensor contact.
    /// Returns which participants the handler asked to remove.
    fn resolve<H>(
        &mut self,
        collision: &Collision,
        a: EntityId,
        b: EntityId,
        handler: &mut H,
        report: &mut StepReport,
    ) -> QuadtreeResult<(bool, bool)>
    where
        H: CollisionHandler + ?Sized,
    {
        let (entity_a, entity_b) = self
            .tree
            .pair_mut(a, b)
            .ok_or(QuadtreeError::UnknownEntity { id: a })?;

        let (a_is_sensor, b_is_sensor) = (entity_a.is_sensor(), entity_b.is_sensor());
        if a_is_sensor || b_is_sensor {
            if a_is_sensor {
                self.sensors.entry(a).or_default().insert(b);
            }
            if b_is_sensor {
                self.sensors.entry(b).or_default().insert(a);
            }
            self.suppressed.insert(pair_key(a, b));
            report.sensor_events += 1;
            return Ok((false, false));
        }

        let normal = collision.normal.unwrap_or_else(Vector2D::zeros);
        let mut contact = Contact::new(collision.time, normal, (a, b), entity_a, entity_b);
        handler.handle(&mut contact);
        report.collisions += 1;
        Ok(contact.removals())
    }

    fn forget(&mut self, id: EntityId) {
        self.sensors.remove(&id);
        for contents in self.sensors.values_mut() {
            contents.remove(&id);
        }
        self.suppressed.retain(|&(a, b)| a != id && b != id);
    }
}
