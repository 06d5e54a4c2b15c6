pub mod error;
pub mod shapes;
pub mod vector;

pub use error::{ShapeError, ShapeResult};
pub use vector::{vec2, Vector2D};
