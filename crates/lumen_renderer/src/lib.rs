//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering of small
//! analytic scenes: spheres, planar shapes, participating media and their
//! instanced transforms, organized in a BVH.
//!
//! All randomness is drawn from an explicit `&mut dyn RngCore`, so a render
//! seeded with the same value is reproducible.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod medium;
mod output;
mod perlin;
mod planar;
mod renderer;
mod sphere;
mod texture;
mod transform;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::Bvh;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    random_unit_vector, reflect, refract, Dielectric, DiffuseLight, Isotropic, Lambertian,
    Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use output::{color_to_rgb8, linear_to_gamma, write_ppm};
pub use perlin::Perlin;
pub use planar::{cuboid, Planar, PlanarShape};
pub use renderer::{
    ray_color, render, render_pixel, Background, ImageBuffer, RenderConfig, SHADOW_ACNE_EPSILON,
};
pub use sphere::Sphere;
pub use texture::{
    CheckerTexture, ImageTexture, NoiseStyle, NoiseTexture, SolidColor, Texture,
    MISSING_TEXTURE_COLOR,
};
pub use transform::{Rotate, Translate};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Axis, Color, Interval, Point3, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform sample in [min, max).
#[inline]
pub fn gen_range_f64(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}
