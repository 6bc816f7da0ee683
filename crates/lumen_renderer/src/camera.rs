//! Camera for ray generation.

use lumen_math::{near_zero, Point3, Ray, Vec3};
use rand::RngCore;

use crate::{gen_f64, gen_range_f64};

/// Camera for generating rays into the scene.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before generating rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f64,          // Vertical field of view in degrees
    defocus_angle: f64, // Variation angle of rays through each pixel
    focus_dist: f64,    // Distance from camera to plane of perfect focus

    // Shutter interval; ray times are drawn uniformly from it
    shutter_open: f64,
    shutter_close: f64,

    // Cached computed values (set by initialize())
    center: Point3,
    viewport_upper_left: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            shutter_open: 0.0,
            shutter_close: 1.0,
            // Cached values (initialized to defaults)
            center: Point3::ZERO,
            viewport_upper_left: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set the width and derive the height from an aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, width: u32, aspect_ratio: f64) -> Self {
        self.image_width = width.max(1);
        self.image_height = ((self.image_width as f64 / aspect_ratio) as u32).max(1);
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the shutter interval for motion blur.
    pub fn with_shutter(mut self, open: f64, close: f64) -> Self {
        self.shutter_open = open;
        self.shutter_close = close;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        let back = self.look_from - self.look_at;
        if near_zero(back) {
            log::warn!(
                "Camera look_from and look_at coincide at {:?}, looking down -Z",
                self.look_from
            );
            self.w = Vec3::Z;
            self.u = Vec3::X;
        } else {
            self.w = back.normalize();
            let side = self.vup.cross(self.w);
            self.u = if near_zero(side) {
                let up = if self.w.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
                log::warn!(
                    "Camera vup {:?} is parallel to the view direction, using {:?} as up",
                    self.vup,
                    up
                );
                up.cross(self.w).normalize()
            } else {
                side.normalize()
            };
        }
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        self.viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera initialized: {}x{}, vfov {:.1}, center {:?}",
            self.image_width,
            self.image_height,
            self.vfov,
            self.center
        );
    }

    /// Deterministic pinhole ray through continuous pixel coordinates.
    ///
    /// `(0, 0)` is the top-left corner of the image and
    /// `(image_width, image_height)` the bottom-right; the center of pixel
    /// `(i, j)` is `(i + 0.5, j + 0.5)`.
    pub fn pixel_ray(&self, px: f64, py: f64, time: f64) -> Ray {
        let target = self.viewport_point(px, py);
        Ray::new(self.center, target - self.center, time)
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);
        let pixel_sample =
            self.viewport_point(i as f64 + 0.5 + offset.x, j as f64 + 0.5 + offset.y);

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_time = self.shutter_open + (self.shutter_close - self.shutter_open) * gen_f64(rng);

        Ray::new(ray_origin, pixel_sample - ray_origin, ray_time)
    }

    fn viewport_point(&self, px: f64, py: f64) -> Point3 {
        self.viewport_upper_left + px * self.pixel_delta_u + py * self.pixel_delta_v
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f64(rng) - 0.5, gen_f64(rng) - 0.5, 0.0)
}

/// Sample a random point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f64(rng, -1.0, 1.0),
            gen_range_f64(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
