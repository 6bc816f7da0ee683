//! Procedural and image-backed textures.
//!
//! A texture maps a surface coordinate `(u, v)` and a world-space point to a
//! color. Materials hold them behind `Arc<dyn Texture>` so one texture can be
//! shared by many surfaces.

use std::sync::Arc;

use lumen_core::ImageData;
use lumen_math::{Color, Interval, Point3};
use rand::RngCore;

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};

/// Color returned by an [`ImageTexture`] with no image data.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two textures in cells of `scale` units.
#[derive(Clone)]
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Texture sampled from a decoded image.
#[derive(Clone)]
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image: Some(image) }
    }

    /// Wrap the result of an image load; a failed load yields the magenta
    /// debug color everywhere.
    pub fn from_load<E: std::fmt::Display>(result: Result<Arc<ImageData>, E>) -> Self {
        match result {
            Ok(image) => Self::new(image),
            Err(e) => {
                log::warn!("Image texture has no data, rendering as magenta: {}", e);
                Self { image: None }
            }
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_TEXTURE_COLOR;
        };

        // Image rows run top to bottom, v runs bottom to top
        let u = Interval::UNIT.clamp(u);
        let v = 1.0 - Interval::UNIT.clamp(v);

        let i = (u * image.width() as f64) as u32;
        let j = (v * image.height() as f64) as u32;
        let [r, g, b] = image.pixel(i, j);

        let scale = 1.0 / 255.0;
        Color::new(r as f64 * scale, g as f64 * scale, b as f64 * scale)
    }
}

/// How a [`NoiseTexture`] turns Perlin noise into a gray level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseStyle {
    /// Single octave, remapped from [-1, 1] to [0, 1]
    Smooth,
    /// Summed octaves
    Turbulence,
    /// Phase-shifted sine bands along z
    #[default]
    Marble,
}

#[derive(Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
    style: NoiseStyle,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self::with_style(scale, NoiseStyle::default(), rng)
    }

    pub fn with_style(scale: f64, style: NoiseStyle, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
            style,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        match self.style {
            NoiseStyle::Smooth => Color::ONE * 0.5 * (1.0 + self.noise.noise(self.scale * p)),
            NoiseStyle::Turbulence => {
                Color::ONE * self.noise.turbulence(self.scale * p, DEFAULT_TURBULENCE_DEPTH)
            }
            NoiseStyle::Marble => {
                let turb = self.noise.turbulence(p, DEFAULT_TURBULENCE_DEPTH);
                Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * turb).sin())
            }
        }
    }
}
