//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

use crate::{Bvh, Material};

/// Record of a ray-object intersection.
///
/// Created fresh by every successful `hit` and dropped once the integrator has
/// consumed it.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates
    pub u: f64,
    pub v: f64,
    /// Ray parameter where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record, orienting `outward_normal` against `ray`.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        (u, v): (f64, f64),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        debug_assert!((outward_normal.length_squared() - 1.0).abs() < 1e-6);

        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
///
/// `rng` is only consumed by stochastic geometry (participating media); every
/// other primitive ignores it.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `ray` whose parameter lies in `ray_t`.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore)
        -> Option<HitRecord<'a>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// A flat list of hittable objects, tested one by one.
#[derive(Clone)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Build a BVH over the objects in this list.
    pub fn into_bvh(self) -> Bvh {
        Bvh::new(self.objects)
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if let Some(rec) = object.hit(ray, interval, rng) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use lumen_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_set_face_normal() {
        let material = Lambertian::new(Color::ONE);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        let front = HitRecord::new(&ray, 1.0, Vec3::Z, (0.0, 0.0), &material);
        assert!(front.front_face);
        assert_eq!(front.normal, Vec3::Z);

        let back = HitRecord::new(&ray, 1.0, -Vec3::Z, (0.0, 0.0), &material);
        assert!(!back.front_face);
        assert_eq!(back.normal, Vec3::Z);
    }

    #[test]
    fn test_list_returns_closest() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, gray())));
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, gray())));
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -6.0), 1.0, gray())));
        assert_eq!(list.len(), 3);

        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let rec = list
            .hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_list_bounding_box() {
        let mut list = HittableList::new();
        assert_eq!(list.bounding_box(), Aabb::EMPTY);

        list.add(Arc::new(Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0, gray())));
        list.add(Arc::new(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0, gray())));

        let bbox = list.bounding_box();
        assert_eq!(bbox.x, Interval::new(-3.0, 3.0));
        assert_eq!(bbox.y, Interval::new(-1.0, 1.0));
    }
}
