pub mod config;
pub mod effects;
pub mod handler;
pub mod world;

pub use config::{SensorPolicy, WorldConfig};
pub use effects::{Gravity, PointAttractor, WorldEffect};
pub use handler::{CollisionHandler, Contact};
pub use world::{StepReport, World};
