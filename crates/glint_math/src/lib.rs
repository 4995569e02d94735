//! glint math: strongly typed 3D algebra for the ray tracer.
//!
//! [`Point`] and [`Vector`] wrap `glam::DVec3`. A `Vector` can never be the
//! zero vector, so any value of that type has a usable direction.

// Re-export glam for convenience
pub use glam::DVec3;

mod aabb;
mod color;
mod error;
mod interval;
mod point;
mod ray;
pub mod tolerance;
mod vector;

pub use aabb::Aabb;
pub use color::{Coefficients, Color};
pub use error::GeometryError;
pub use interval::Interval;
pub use point::Point;
pub use ray::Ray;
pub use vector::Vector;
