//! Jittered grid sampling for glossy reflection, diffuse refraction and
//! anti-aliasing.

use glint_math::tolerance::{align_zero, check_sign};
use glint_math::{Point, Ray, Vector};
use rand::{Rng, RngCore};

/// An `n × n` grid over a square sampling region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterGrid {
    cells: u32,
}

impl JitterGrid {
    /// The smallest square grid with at least `target` cells.
    ///
    /// A target of 0 or 1 gives the trivial single-cell grid.
    pub fn for_sample_count(target: u32) -> Self {
        let cells = (f64::from(target).sqrt().ceil() as u32).max(1);
        Self { cells }
    }

    /// Cells along one side.
    pub fn cells(&self) -> u32 {
        self.cells
    }

    /// Total number of cells.
    pub fn sample_count(&self) -> usize {
        (self.cells * self.cells) as usize
    }

    /// True for a single-cell grid, which samples only the center.
    pub fn is_trivial(&self) -> bool {
        self.cells == 1
    }

    /// One random offset per cell, row by row.
    ///
    /// Offsets are in units of the region side, centered on zero, so every
    /// value lies in `[-0.5, 0.5]`.
    pub fn jittered_offsets(&self, rng: &mut dyn RngCore) -> Vec<(f64, f64)> {
        let n = f64::from(self.cells);
        let mut offsets = Vec::with_capacity(self.sample_count());
        for row in 0..self.cells {
            for col in 0..self.cells {
                let x = (f64::from(col) + rng.gen::<f64>()) / n - 0.5;
                let y = (f64::from(row) + rng.gen::<f64>()) / n - 0.5;
                offsets.push((x, y));
            }
        }
        offsets
    }
}

/// Expand an ideal secondary ray into a jittered bundle.
///
/// The sampling region is a square orthogonal to the ideal ray, centered on
/// it at `distance` from its origin, with side `spread × distance`. One ray
/// is aimed at a jittered target in each grid cell. Rays that would leave
/// the surface on the other side from the ideal one are dropped. The ideal
/// ray always comes first.
///
/// Returns just the ideal ray when `spread` is zero, the grid is trivial or
/// `distance` is not a usable length.
pub fn soft_rays(
    ideal: &Ray,
    normal: &Vector,
    spread: f64,
    distance: f64,
    grid: &JitterGrid,
    rng: &mut dyn RngCore,
) -> Vec<Ray> {
    let mut rays = vec![*ideal];
    if spread <= 0.0 || grid.is_trivial() || !(distance.is_finite() && distance > 0.0) {
        return rays;
    }

    let side = spread * distance;
    let leaving = align_zero(normal.dot(&ideal.direction()));
    let origin = ideal.origin().to_dvec3();
    let direction = ideal.direction().to_dvec3();

    let u = ideal.direction().any_orthogonal().to_dvec3();
    let w = direction.cross(u);
    let center = origin + direction * distance;

    for (ox, oy) in grid.jittered_offsets(rng) {
        let target = center + u * (ox * side) + w * (oy * side);
        let Ok(v) = Vector::try_from_dvec3(target - origin) else {
            continue;
        };
        if check_sign(align_zero(normal.dot(&v)), leaving) {
            rays.push(Ray::new(ideal.origin(), v));
        }
    }

    rays
}

/// Target point of a jittered sample, for callers that build their own rays.
pub(crate) fn jittered_target(
    center: Point,
    right: Vector,
    up: Vector,
    width: f64,
    height: f64,
    offset: (f64, f64),
) -> Point {
    Point::from_dvec3(
        center.to_dvec3()
            + right.to_dvec3() * (offset.0 * width)
            + up.to_dvec3() * (offset.1 * height),
    )
}
