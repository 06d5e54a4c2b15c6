use super::{Impact, Motion, CONTACT_EPSILON};
use common::shapes::{Aabb, Polygon};
use common::{vec2, Vector2D};

/// Convex hull that takes part in the separating-axis sweep.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Hull<'a> {
    Box(&'a Aabb),
    Polygon(&'a Polygon),
}

impl<'a> Hull<'a> {
    pub(crate) fn axis_count(&self) -> usize {
        match self {
            Hull::Box(_) => 2,
            Hull::Polygon(polygon) => polygon.len(),
        }
    }

    pub(crate) fn axis(&self, index: usize) -> Vector2D {
        match self {
            Hull::Box(_) if index == 0 => vec2(1.0, 0.0),
            Hull::Box(_) => vec2(0.0, 1.0),
            Hull::Polygon(polygon) => polygon.normals()[index],
        }
    }

    /// Projection onto the hull's own axis `index`, relative to its center.
    pub(crate) fn own_interval(&self, index: usize) -> (f64, f64) {
        match self {
            Hull::Box(aabb) if index == 0 => (-aabb.half_width, aabb.half_width),
            Hull::Box(aabb) => (-aabb.half_height, aabb.half_height),
            Hull::Polygon(polygon) => (polygon.normal_min(index), polygon.normal_max(index)),
        }
    }

    /// Projection onto an arbitrary axis, relative to the center.
    pub(crate) fn project(&self, axis: &Vector2D) -> (f64, f64) {
        match self {
            Hull::Box(aabb) => {
                let reach = axis.x.abs() * aabb.half_width + axis.y.abs() * aabb.half_height;
                (-reach, reach)
            }
            Hull::Polygon(polygon) => polygon.project(axis),
        }
    }
}

/// Running entry/exit window of a per-axis sweep.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepState {
    entry: f64,
    exit: f64,
    normal: Option<Vector2D>,
}

impl SweepState {
    pub(crate) fn new() -> Self {
        Self {
            entry: f64::NEG_INFINITY,
            exit: f64::INFINITY,
            normal: None,
        }
    }

    /// Folds one axis into the window. `speed` is the velocity of B relative
    /// to A along `axis`. Returns false when the axis proves the pair never
    /// touches. Intervals overlapping by less than `CONTACT_EPSILON` count as
    /// touching when approaching and as overlapping otherwise.
    pub(crate) fn axis(
        &mut self,
        (a_lo, a_hi): (f64, f64),
        (b_lo, b_hi): (f64, f64),
        speed: f64,
        axis: Vector2D,
    ) -> bool {
        let above = b_lo - a_hi;
        let below = a_lo - b_hi;
        if above >= 0.0 || (above >= -CONTACT_EPSILON && speed < 0.0) {
            if speed >= 0.0 {
                return false;
            }
            let t = (above / -speed).max(0.0);
            if t > self.entry {
                self.entry = t;
                self.normal = Some(axis);
            }
            self.exit = self.exit.min((a_lo - b_hi) / speed);
        } else if below >= 0.0 || (below >= -CONTACT_EPSILON && speed > 0.0) {
            if speed <= 0.0 {
                return false;
            }
            let t = (below / speed).max(0.0);
            if t > self.entry {
                self.entry = t;
                self.normal = Some(-axis);
            }
            self.exit = self.exit.min((a_hi - b_lo) / speed);
        } else if speed < 0.0 {
            self.exit = self.exit.min((a_lo - b_hi) / speed);
        } else if speed > 0.0 {
            self.exit = self.exit.min((a_hi - b_lo) / speed);
        }
        true
    }

    /// An impact exists only if some axis was separated and the latest entry
    /// precedes the earliest exit.
    pub(crate) fn finish(self) -> Option<Impact> {
        let normal = self.normal?;
        if self.entry > self.exit {
            return None;
        }
        Some(Impact::new(self.entry.max(0.0), normal))
    }
}

pub(crate) fn hull_sweep(a: Hull<'_>, ma: Motion, b: Hull<'_>, mb: Motion) -> Option<Impact> {
    let relative = mb.velocity - ma.velocity;
    let mut state = SweepState::new();
    for (owner, other, owner_is_a) in [(&a, &b, true), (&b, &a, false)] {
        for index in 0..owner.axis_count() {
            let axis = owner.axis(index);
            let own = owner.own_interval(index);
            let projected = other.project(&axis);
            let (a_local, b_local) = if owner_is_a {
                (own, projected)
            } else {
                (projected, own)
            };
            let a_offset = ma.position.dot(&axis);
            let b_offset = mb.position.dot(&axis);
            let a_interval = (a_local.0 + a_offset, a_local.1 + a_offset);
            let b_interval = (b_local.0 + b_offset, b_local.1 + b_offset);
            if !state.axis(a_interval, b_interval, relative.dot(&axis), axis) {
                return None;
            }
        }
    }
    state.finish()
}
