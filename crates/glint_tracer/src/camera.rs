//! Pinhole camera for primary ray generation.

use crate::sampling::{jittered_target, JitterGrid};
use glint_math::tolerance::{align_zero, is_zero};
use glint_math::{GeometryError, Point, Ray, Vector};
use rand::RngCore;

/// A pinhole camera looking through a rectangular view plane.
///
/// The view plane sits `distance` in front of the camera along `v_to`, is
/// centered on that axis, and spans `width` along `v_right` and `height`
/// along `v_up`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    location: Point,
    v_to: Vector,
    v_up: Vector,
    v_right: Vector,

    // View plane
    width: f64,
    height: f64,
    distance: f64,
}

impl Camera {
    /// Create a camera with a unit view plane one unit away.
    ///
    /// `v_to` and `v_up` must be orthogonal; both are normalized and
    /// `v_right = v_to × v_up`.
    pub fn new(location: Point, v_to: Vector, v_up: Vector) -> Result<Self, GeometryError> {
        let v_to = v_to.normalize();
        let v_up = v_up.normalize();
        if !is_zero(v_to.dot(&v_up)) {
            return Err(GeometryError::NonOrthogonalBasis);
        }
        let v_right = v_to
            .cross(&v_up)
            .map_err(|_| GeometryError::NonOrthogonalBasis)?
            .normalize();

        Ok(Self {
            location,
            v_to,
            v_up,
            v_right,
            width: 1.0,
            height: 1.0,
            distance: 1.0,
        })
    }

    /// Set the view plane size.
    pub fn with_view_plane(mut self, width: f64, height: f64) -> Result<Self, GeometryError> {
        if !(align_zero(width) > 0.0 && align_zero(height) > 0.0) {
            return Err(GeometryError::InvalidViewPlane("view plane size must be positive"));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Set the distance from the camera to the view plane.
    pub fn with_distance(mut self, distance: f64) -> Result<Self, GeometryError> {
        if !(align_zero(distance) > 0.0) {
            return Err(GeometryError::InvalidViewPlane("view plane distance must be positive"));
        }
        self.distance = distance;
        Ok(self)
    }

    /// Move the camera in its own frame, keeping its orientation.
    pub fn moved(mut self, right: f64, up: f64, forward: f64) -> Self {
        self.location = Point::from_dvec3(
            self.location.to_dvec3()
                + self.v_right.to_dvec3() * right
                + self.v_up.to_dvec3() * up
                + self.v_to.to_dvec3() * forward,
        );
        self
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn v_to(&self) -> Vector {
        self.v_to
    }

    pub fn v_up(&self) -> Vector {
        self.v_up
    }

    pub fn v_right(&self) -> Vector {
        self.v_right
    }

    /// Center of pixel `(j, i)` on the view plane, column `j` of `nx` and
    /// row `i` of `ny`, row 0 at the top.
    fn pixel_center(&self, nx: u32, ny: u32, j: u32, i: u32) -> Point {
        let rx = self.width / f64::from(nx);
        let ry = self.height / f64::from(ny);

        let xj = (f64::from(j) - (f64::from(nx) - 1.0) / 2.0) * rx;
        let yi = -(f64::from(i) - (f64::from(ny) - 1.0) / 2.0) * ry;

        Point::from_dvec3(
            self.location.to_dvec3()
                + self.v_to.to_dvec3() * self.distance
                + self.v_right.to_dvec3() * xj
                + self.v_up.to_dvec3() * yi,
        )
    }

    fn ray_through(&self, target: Point) -> Ray {
        // The view plane is in front of the camera, so this never fails
        let direction = target.subtract(&self.location).unwrap_or(self.v_to);
        Ray::new(self.location, direction)
    }

    /// Ray through the center of pixel `(j, i)` of an `nx × ny` image.
    pub fn construct_ray(&self, nx: u32, ny: u32, j: u32, i: u32) -> Ray {
        self.ray_through(self.pixel_center(nx, ny, j, i))
    }

    /// Anti-aliasing bundle for pixel `(j, i)`: one jittered ray per grid
    /// cell over the pixel's area. A trivial grid gives the center ray.
    pub fn construct_rays(
        &self,
        nx: u32,
        ny: u32,
        j: u32,
        i: u32,
        grid: &JitterGrid,
        rng: &mut dyn RngCore,
    ) -> Vec<Ray> {
        let center = self.pixel_center(nx, ny, j, i);
        if grid.is_trivial() {
            return vec![self.ray_through(center)];
        }

        let pixel_width = self.width / f64::from(nx);
        let pixel_height = self.height / f64::from(ny);
        grid.jittered_offsets(rng)
            .into_iter()
            .map(|offset| {
                self.ray_through(jittered_target(
                    center,
                    self.v_right,
                    self.v_up,
                    pixel_width,
                    pixel_height,
                    offset,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera() -> Camera {
        Camera::new(Point::ORIGIN, -Vector::Z, Vector::Y)
            .unwrap()
            .with_distance(10.0)
            .unwrap()
            .with_view_plane(6.0, 6.0)
            .unwrap()
    }

    fn direction(x: f64, y: f64, z: f64) -> Vector {
        Vector::new(x, y, z).unwrap().normalize()
    }

    fn assert_close(a: Vector, b: Vector) {
        assert!((a.to_dvec3() - b.to_dvec3()).length() < 1e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn test_basis() {
        let cam = camera();
        assert_eq!(cam.v_right(), Vector::X);
        assert_eq!(cam.v_up(), Vector::Y);
        assert_eq!(cam.location(), Point::ORIGIN);
    }

    #[test]
    fn test_non_orthogonal() {
        let result = Camera::new(Point::ORIGIN, -Vector::Z, Vector::new(0.0, 1.0, 1.0).unwrap());
        assert_eq!(result, Err(GeometryError::NonOrthogonalBasis));
    }

    #[test]
    fn test_invalid_view_plane() {
        let cam = Camera::new(Point::ORIGIN, -Vector::Z, Vector::Y).unwrap();
        assert!(cam.clone().with_view_plane(0.0, 1.0).is_err());
        assert!(cam.clone().with_view_plane(1.0, -1.0).is_err());
        assert!(cam.clone().with_view_plane(f64::NAN, 1.0).is_err());
        assert!(cam.with_distance(0.0).is_err());
    }

    #[test]
    fn test_construct_ray_odd_grid() {
        let cam = camera();

        // Center pixel looks straight ahead
        assert_close(cam.construct_ray(3, 3, 1, 1).direction(), -Vector::Z);
        // Top left corner
        assert_close(cam.construct_ray(3, 3, 0, 0).direction(), direction(-2.0, 2.0, -10.0));
        // Bottom right corner
        assert_close(cam.construct_ray(3, 3, 2, 2).direction(), direction(2.0, -2.0, -10.0));
        // Middle of the top row
        assert_close(cam.construct_ray(3, 3, 1, 0).direction(), direction(0.0, 2.0, -10.0));
    }

    #[test]
    fn test_construct_ray_even_grid() {
        let cam = camera();
        assert_close(cam.construct_ray(4, 4, 0, 0).direction(), direction(-2.25, 2.25, -10.0));
        assert_close(cam.construct_ray(4, 4, 2, 1).direction(), direction(0.75, 0.75, -10.0));
        assert_eq!(cam.construct_ray(4, 4, 2, 1).origin(), Point::ORIGIN);
    }

    #[test]
    fn test_moved() {
        let cam = camera().moved(1.0, 2.0, 3.0);
        assert_eq!(cam.location(), Point::new(1.0, 2.0, -3.0));
        assert_close(cam.construct_ray(3, 3, 1, 1).direction(), -Vector::Z);
    }

    #[test]
    fn test_construct_rays_stays_in_pixel() {
        let cam = camera();
        let grid = JitterGrid::for_sample_count(4);
        let mut rng = StdRng::seed_from_u64(42);

        let rays = cam.construct_rays(3, 3, 0, 0, &grid, &mut rng);
        assert_eq!(rays.len(), 4);
        for ray in &rays {
            // Scale to the view plane at z = -10
            let d = ray.direction().to_dvec3() * (10.0 / -ray.direction().z());
            assert!((-3.0..=-1.0).contains(&d.x), "x out of pixel: {}", d.x);
            assert!((1.0..=3.0).contains(&d.y), "y out of pixel: {}", d.y);
        }

        let single = cam.construct_rays(3, 3, 0, 0, &JitterGrid::for_sample_count(1), &mut rng);
        assert_eq!(single, vec![cam.construct_ray(3, 3, 0, 0)]);
    }
}
