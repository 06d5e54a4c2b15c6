pub mod collision;
pub mod groups;
pub mod narrow_phase;

pub use collision::{Collision, EntityId, NO_COLLISION};
pub use groups::CollisionGroups;
pub use narrow_phase::{intersects, time_to_collision, Impact};
