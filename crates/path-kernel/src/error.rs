/// Errors from path editing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("control point index {index} out of range (path has {count} points)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("control point has non-finite coordinates: {0:?}")]
    NonFiniteCoordinate([f64; 3]),

    #[error("tension {0} outside [-1, 1]")]
    InvalidTension(f64),

    #[error("path needs at least 2 control points, has {count}")]
    DegeneratePath { count: usize },
}
