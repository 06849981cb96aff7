//! Image processing in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decode** | `image::ImageReader` → RGBA8 |
//! | **Draw** | [`RasterSurface`] over `image::RgbaImage`, Lanczos3 / Triangle resampling |
//! | **Encode** | JPEG (opaque frames) or PNG (transparent frames) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for layout math (unit testable)
//! - **Parameters**: Encoding format and quality
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Surface**: [`Surface`] trait + [`RasterSurface`]

pub mod backend;
pub mod calculations;
mod params;
pub mod rust_backend;
pub mod surface;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{DrawRect, Rect};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_backend::{RustBackend, is_supported_photo, supported_input_extensions};
pub use surface::{RasterSurface, Surface};
