use super::sweep::SweepState;
use super::{Impact, Motion};
use common::shapes::Aabb;
use common::vec2;

/// Swept AABB test, one axis at a time.
pub(crate) fn aabb_aabb(a: Motion, ha: &Aabb, b: Motion, hb: &Aabb) -> Option<Impact> {
    let relative = b.velocity - a.velocity;
    let mut state = SweepState::new();
    let axes = [
        (vec2(1.0, 0.0), ha.half_width, hb.half_width),
        (vec2(0.0, 1.0), ha.half_height, hb.half_height),
    ];
    for (index, (axis, a_half, b_half)) in axes.into_iter().enumerate() {
        let (pa, pb) = (a.position[index], b.position[index]);
        if !state.axis(
            (pa - a_half, pa + a_half),
            (pb - b_half, pb + b_half),
            relative[index],
            axis,
        ) {
            return None;
        }
    }
    state.finish()
}
