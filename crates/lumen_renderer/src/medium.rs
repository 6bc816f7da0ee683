//! Constant-density participating medium (fog, smoke).

use std::sync::Arc;

use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::distributions::Open01;
use rand::{Rng, RngCore};

use crate::texture::Texture;
use crate::{HitRecord, Hittable, Isotropic, Material};

/// Gap past the entry point before searching for the exit point.
const EXIT_SEARCH_OFFSET: f64 = 0.0001;

/// Volume of uniform density bounded by a closed surface.
///
/// A ray travelling through the boundary scatters at an exponentially
/// distributed distance. The scatter point is returned as a hit with an
/// arbitrary normal and an isotropic phase function as its material.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f64,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self::with_phase(boundary, density, Arc::new(Isotropic::new(albedo)))
    }

    pub fn from_texture(
        boundary: Arc<dyn Hittable>,
        density: f64,
        texture: Arc<dyn Texture>,
    ) -> Self {
        Self::with_phase(boundary, density, Arc::new(Isotropic::from_texture(texture)))
    }

    fn with_phase(
        boundary: Arc<dyn Hittable>,
        density: f64,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        // A non-positive density would flip the sampled distance negative
        let density = if density > 0.0 {
            density
        } else {
            log::warn!("Medium density {} is not positive, clamping", density);
            f64::MIN_POSITIVE
        };

        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?.t;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry + EXIT_SEARCH_OFFSET, f64::INFINITY), rng)?
            .t;

        let mut t_enter = entry.max(ray_t.min);
        let t_exit = exit.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        // The ray starts inside the volume
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction.length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let u: f64 = rng.sample(Open01);
        let hit_distance = self.neg_inv_density * u.ln();

        if hit_distance > distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: self.phase_function.as_ref(),
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
