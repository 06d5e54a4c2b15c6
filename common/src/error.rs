use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeError {
    InvalidRadius { radius: f64 },
    InvalidHalfExtents { half_width: f64, half_height: f64 },
    NonFinite,
    TooFewPoints { count: usize },
    DegenerateEdge { index: usize },
    NonConvex { index: usize },
    ZeroArea,
}

pub type ShapeResult<T> = Result<T, ShapeError>;

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::InvalidRadius { radius } => {
                write!(
                    f,
                    "circle radius must be finite and non-negative (radius: {})",
                    radius
                )
            }
            ShapeError::InvalidHalfExtents {
                half_width,
                half_height,
            } => {
                write!(
                    f,
                    "box half extents must be finite and non-negative (half_width: {}, half_height: {})",
                    half_width, half_height
                )
            }
            ShapeError::NonFinite => write!(f, "shape position and velocity must be finite"),
            ShapeError::TooFewPoints { count } => {
                write!(f, "polygon needs at least 3 points (got: {})", count)
            }
            ShapeError::DegenerateEdge { index } => {
                write!(f, "polygon edge ending at point {} has zero length", index)
            }
            ShapeError::NonConvex { index } => {
                write!(f, "polygon is not convex at point {}", index)
            }
            ShapeError::ZeroArea => write!(f, "polygon encloses no area"),
        }
    }
}

impl std::error::Error for ShapeError {}
