//! Instancing decorators: translate and rotate a wrapped object.
//!
//! Both decorators move the incoming ray into the object's local space,
//! delegate the hit, then move the hit point (and normal) back out. The
//! wrapped object is shared, so the same geometry can be placed many times.

use std::sync::Arc;

use lumen_math::{Aabb, Axis, Interval, Point3, Ray, Vec3};
use rand::RngCore;

use crate::{HitRecord, Hittable};

/// An object displaced by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        let mut rec = self.object.hit(&local, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// An object rotated about one coordinate axis through the origin.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    axis: Axis,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Aabb,
}

impl Rotate {
    /// Rotate `object` by `degrees` about `axis`, counter-clockwise when
    /// looking down the positive axis.
    pub fn new(object: Arc<dyn Hittable>, axis: Axis, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        let mut rotate = Self {
            object,
            axis,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
            bbox: Aabb::EMPTY,
        };
        rotate.bbox = rotate.rotated_bbox();
        rotate
    }

    pub fn x(object: Arc<dyn Hittable>, degrees: f64) -> Self {
        Self::new(object, Axis::X, degrees)
    }

    pub fn y(object: Arc<dyn Hittable>, degrees: f64) -> Self {
        Self::new(object, Axis::Y, degrees)
    }

    pub fn z(object: Arc<dyn Hittable>, degrees: f64) -> Self {
        Self::new(object, Axis::Z, degrees)
    }

    /// Indices of the two coordinates that change, in right-handed order.
    fn plane(&self) -> (usize, usize) {
        match self.axis {
            Axis::X => (1, 2),
            Axis::Y => (2, 0),
            Axis::Z => (0, 1),
        }
    }

    fn turn(&self, v: Vec3, sin_theta: f64) -> Vec3 {
        let (i, j) = self.plane();
        let mut out = v;
        out[i] = self.cos_theta * v[i] - sin_theta * v[j];
        out[j] = sin_theta * v[i] + self.cos_theta * v[j];
        out
    }

    fn to_world(&self, v: Vec3) -> Vec3 {
        self.turn(v, self.sin_theta)
    }

    fn to_local(&self, v: Vec3) -> Vec3 {
        self.turn(v, -self.sin_theta)
    }

    /// Box around the eight rotated corners of the object's box.
    fn rotated_bbox(&self) -> Aabb {
        let bbox = self.object.bounding_box();
        if bbox.x.is_empty() || bbox.y.is_empty() || bbox.z.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Point3::splat(f64::INFINITY);
        let mut max = Point3::splat(f64::NEG_INFINITY);
        for corner in bbox.corners() {
            let rotated = self.to_world(corner);
            min = min.min(rotated);
            max = max.max(rotated);
        }

        Aabb::from_points(min, max)
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(
            self.to_local(ray.origin),
            self.to_local(ray.direction),
            ray.time,
        );

        // Rotation preserves the normal's orientation against the ray
        let mut rec = self.object.hit(&local, ray_t, rng)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
