use crate::{Interval, Point3, Ray, Vec3};

/// Minimum thickness of every axis of a constructed [`Aabb`].
pub const AABB_PADDING: f64 = 0.0001;

/// One of the three coordinate axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Boxes built through [`Aabb::new`] or [`Aabb::from_points`] are padded so no
/// axis is thinner than [`AABB_PADDING`]; planar primitives would otherwise
/// produce zero-volume boxes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
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

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points, in either order.
    pub fn from_points(a: Point3, b: Point3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    pub fn axis_interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. `ray_t` is taken by value and narrowed locally;
    /// the caller's interval is never modified.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in Axis::ALL {
            let slab = self.axis_interval(axis);
            let origin = ray.origin[axis.index()];
            let direction = ray.direction[axis.index()];

            // A zero direction yields +-inf, which the comparisons below handle.
            let mut t0 = (slab.min - origin) / direction;
            let mut t1 = (slab.max - origin) / direction;

            // 0/0: the ray runs parallel to this slab and inside one of its
            // faces, so this axis places no constraint on t.
            if t0.is_nan() || t1.is_nan() {
                continue;
            }

            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > ray_t.min {
                ray_t.min = t0;
            }
            if t1 < ray_t.max {
                ray_t.max = t1;
            }
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < AABB_PADDING {
            self.x = self.x.expand(AABB_PADDING);
        }
        if self.y.size() < AABB_PADDING {
            self.y = self.y.expand(AABB_PADDING);
        }
        if self.z.size() < AABB_PADDING {
            self.z = self.z.expand(AABB_PADDING);
        }
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.offset(offset.x),
            self.y.offset(offset.y),
            self.z.offset(offset.z),
        )
    }

    /// Returns the axis with the longest extent.
    pub fn longest_axis(&self) -> Axis {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            Axis::X
        } else if y_size > z_size {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Point3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// The eight corners, ordered by the (x, y, z) bits of the index.
    pub fn corners(&self) -> [Point3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.x.min } else { self.x.max },
                if i & 2 == 0 { self.y.min } else { self.y.max },
                if i & 4 == 0 { self.z.min } else { self.z.max },
            );
        }
        corners
    }

    pub fn contains_point(&self, p: Point3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_pads_flat_axes() {
        // A box around a quad lying in the z = 2 plane
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));

        assert!(aabb.z.size() >= AABB_PADDING - 1e-12);
        assert!(aabb.z.contains(2.0));
        assert_eq!(aabb.x.size(), 1.0);
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, -1.0, 3.0), Vec3::new(10.0, 4.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x, Interval::new(0.0, 10.0));
        assert_eq!(surrounding.y, Interval::new(-1.0, 5.0));
        assert_eq!(surrounding.z, Interval::new(0.0, 10.0));

        for corner in box1.corners().iter().chain(box2.corners().iter()) {
            assert!(surrounding.contains_point(*corner));
        }
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Box is beyond the interval
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_parallel_on_face() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::splat(1.0));

        // Travels along x while sitting exactly on the y = 0 face: 0/0 in y
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.5), Vec3::X, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, f64::INFINITY)));

        // Parallel to y but outside the y slab
        let ray = Ray::new(Vec3::new(-1.0, 2.0, 0.5), Vec3::X, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, f64::INFINITY)));
    }

    #[test]
    fn test_aabb_hit_leaves_interval_untouched() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let ray_t = Interval::new(0.0, 100.0);

        assert!(aabb.hit(&ray, ray_t));
        assert_eq!(ray_t, Interval::new(0.0, 100.0));
    }

    #[test]
    fn test_aabb_longest_axis() {
        let cases = [
            (Vec3::new(10.0, 1.0, 1.0), Axis::X),
            (Vec3::new(1.0, 10.0, 1.0), Axis::Y),
            (Vec3::new(1.0, 1.0, 10.0), Axis::Z),
        ];
        for (extent, axis) in cases {
            assert_eq!(Aabb::from_points(Vec3::ZERO, extent).longest_axis(), axis);
        }
    }

    #[test]
    fn test_aabb_translate() {
        let translated =
            Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.x, Interval::new(5.0, 6.0));
        assert_eq!(translated.y, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_aabb_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::splat(10.0));
        assert_eq!(aabb.centroid(), Vec3::splat(5.0));
    }
}
