//! Decoded image buffers and a path-keyed cache for them.
//!
//! Image textures in the renderer sample an [`ImageData`]. Pixels are stored
//! as packed 8-bit RGB triples in row-major order, already converted from the
//! file's sRGB encoding to linear values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Number of bytes per pixel (R, G, B).
pub const BYTES_PER_PIXEL: usize = 3;

/// Errors that can occur while building or loading image data.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid image dimensions {width}x{height} for {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A decoded image: width, height and row-major RGB bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap an already decoded buffer.
    ///
    /// Fails if either dimension is zero or `bytes` is not exactly
    /// `width * height * 3` long.
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> ImageResult<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if width == 0 || height == 0 || bytes.len() != expected {
            return Err(ImageError::InvalidDimensions {
                width,
                height,
                len: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Decode an image file and convert it to linear RGB bytes.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let bytes: Vec<u8> = rgb
            .into_raw()
            .into_iter()
            .map(|b| linear_to_byte(srgb_to_linear(b)))
            .collect();

        let data = Self::new(width, height, bytes)?;
        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            data.size_bytes() as f64 / 1024.0
        );
        Ok(data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes at `(x, y)`. Out-of-range coordinates clamp to the edge.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;
        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Cache for loaded images, keyed by the path they were requested with.
pub struct ImageCache {
    images: HashMap<String, Arc<ImageData>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> ImageResult<Arc<ImageData>> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }

        let image = Arc::new(ImageData::load(self.resolve_path(path))?);
        self.images.insert(path.to_string(), image.clone());
        Ok(image)
    }

    /// Get a cached image without loading.
    pub fn get(&self, path: &str) -> Option<Arc<ImageData>> {
        self.images.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_byte(value: f64) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}
