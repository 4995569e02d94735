use crate::tolerance::align_zero;
use crate::{Interval, Point, Ray};

/// Axis-Aligned Bounding Box used to reject rays before exact intersection.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = Interval::new(a.x().min(b.x()), a.x().max(b.x()));
        let y = Interval::new(a.y().min(b.y()), a.y().max(b.y()));
        let z = Interval::new(a.z().min(b.z()), a.z().max(b.z()));
        Self::new(x, y, z)
    }

    /// Smallest AABB containing every point. Returns `None` for no points.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?.to_dvec3();
        let (low, high) = points.fold((first, first), |(low, high), p| {
            (low.min(p.to_dvec3()), high.max(p.to_dvec3()))
        });
        Some(Self::from_points(low.into(), high.into()))
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Corner with the smallest coordinates.
    pub fn low(&self) -> Point {
        Point::new(self.x.min, self.y.min, self.z.min)
    }

    /// Corner with the largest coordinates.
    pub fn high(&self) -> Point {
        Point::new(self.x.max, self.y.max, self.z.max)
    }

    /// Test if a ray can reach this box (slab method).
    ///
    /// Each axis yields the parameter range over which the ray is inside that
    /// axis' slab. The ray misses when the ranges do not overlap or the box is
    /// entirely behind the origin. An axis the ray runs parallel to contributes
    /// no range: the ray is either always inside that slab or never.
    ///
    /// Never rejects a ray that actually reaches the box.
    pub fn hit(&self, ray: &Ray) -> bool {
        let origin = ray.origin().to_dvec3();
        let direction = ray.direction().to_dvec3();

        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let o = origin[axis];
            let d = direction[axis];

            if d == 0.0 {
                if !slab.contains(o) {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (slab.min - o) * inv;
            let mut t1 = (slab.max - o) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
        }

        !(align_zero(t_near - t_far) > 0.0 || align_zero(t_far) < 0.0)
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// True if any axis extends to infinity.
    pub fn is_unbounded(&self) -> bool {
        self.x.is_unbounded() || self.y.is_unbounded() || self.z.is_unbounded()
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    fn unit_box() -> Aabb {
        Aabb::from_points(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Point::new(10.0, 0.0, 10.0), Point::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.low(), Point::ORIGIN);
        assert_eq!(aabb.high(), Point::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_aabb_enclosing() {
        let points = [
            Point::new(1.0, 0.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
            Point::new(0.0, 1.0, 1.0),
        ];
        let aabb = Aabb::enclosing(&points).unwrap();

        assert_eq!(aabb.x, Interval::new(0.0, 1.0));
        assert_eq!(aabb.y, Interval::new(0.0, 1.0));
        // Flat axis gets padded so it stays hittable
        assert!(aabb.z.size() > 0.0);
        assert!(aabb.z.contains(1.0));

        assert!(Aabb::enclosing(&[]).is_none());
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Point::ORIGIN, Point::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Point::new(3.0, 3.0, 3.0), Point::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.low(), Point::ORIGIN);
        assert_eq!(surrounding.high(), Point::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        // Ray pointing at center
        let ray = Ray::new(Point::new(0.0, 0.0, -5.0), Vector::Z);
        assert!(aabb.hit(&ray));

        // Ray pointing away
        let ray = Ray::new(Point::new(0.0, 0.0, -5.0), -Vector::Z);
        assert!(!aabb.hit(&ray));

        // Ray missing the box
        let ray = Ray::new(Point::new(10.0, 0.0, 0.0), Vector::Z);
        assert!(!aabb.hit(&ray));

        // Diagonal ray through a corner region
        let ray = Ray::new(Point::new(-3.0, -3.0, -3.0), Vector::new(1.0, 1.0, 1.0).unwrap());
        assert!(aabb.hit(&ray));
    }

    #[test]
    fn test_aabb_hit_origin_inside() {
        let ray = Ray::new(Point::ORIGIN, Vector::new(0.3, -0.2, 0.9).unwrap());
        assert!(unit_box().hit(&ray));
    }

    #[test]
    fn test_aabb_hit_parallel_axes() {
        let aabb = unit_box();

        // Parallel to x and y, inside both slabs
        let ray = Ray::new(Point::new(0.5, 0.5, -5.0), Vector::Z);
        assert!(aabb.hit(&ray));

        // Parallel to x and y, outside the x slab
        let ray = Ray::new(Point::new(1.5, 0.5, -5.0), Vector::Z);
        assert!(!aabb.hit(&ray));

        // Running exactly along a face
        let ray = Ray::new(Point::new(1.0, 0.0, -5.0), Vector::Z);
        assert!(aabb.hit(&ray));
    }

    #[test]
    fn test_aabb_hit_unbounded_axis() {
        let aabb = Aabb::new(
            Interval::UNIVERSE,
            Interval::new(-1.0, 1.0),
            Interval::new(-1.0, 1.0),
        );
        assert!(aabb.is_unbounded());

        let ray = Ray::new(Point::new(1e6, 0.0, -5.0), Vector::new(-1.0, 0.0, 1.0).unwrap());
        assert!(aabb.hit(&ray));
    }
}
