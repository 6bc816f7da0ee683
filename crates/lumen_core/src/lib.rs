//! Lumen Core - external asset boundary for the renderer.
//!
//! The path tracer never decodes files itself. It consumes an [`ImageData`]
//! (width, height, packed RGB bytes) built here, either from raw bytes handed
//! over by a caller or by decoding a file with the `image` crate.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::ImageCache;
//!
//! let mut cache = ImageCache::with_base_dir("assets");
//! let earth = cache.load("earthmap.jpg")?;
//! println!("{}x{}", earth.width(), earth.height());
//! ```

pub mod image_data;

pub use image_data::{ImageCache, ImageData, ImageError, ImageResult};
