use thiserror::Error;

/// Errors raised while constructing geometry, lights, cameras or tracer settings.
///
/// Only construction can fail. Degenerate cases met while tracing a ray are
/// resolved locally and never surface as errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("zero vector has no direction")]
    ZeroVector,

    #[error("vector components must be finite")]
    NonFiniteVector,

    #[error("points are collinear and do not define a plane")]
    CollinearPoints,

    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon vertices {0} and {1} coincide")]
    CoincidentVertices(usize, usize),

    #[error("polygon vertex {0} does not lie in the plane of the first three")]
    NonCoplanar(usize),

    #[error("polygon is not convex or its vertices are out of order at vertex {0}")]
    NonConvex(usize),

    #[error("radius must be positive and finite, got {0}")]
    NonPositiveRadius(f64),

    #[error("height must be positive and finite, got {0}")]
    NonPositiveHeight(f64),

    #[error("camera direction vectors are not orthogonal")]
    NonOrthogonalBasis,

    #[error("invalid view plane: {0}")]
    InvalidViewPlane(&'static str),

    #[error("invalid material: {0}")]
    InvalidMaterial(&'static str),

    #[error("invalid light: {0}")]
    InvalidLight(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
