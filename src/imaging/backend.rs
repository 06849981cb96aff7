//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the host "decode service" and "surface
//! encoder": every backend must be able to identify, decode and encode, so
//! the layout, compositing and export code is backend-agnostic.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::EncodeParams;
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    /// Probing an empty path is a caller bug, never retried or defaulted.
    #[error("empty image path")]
    EmptyPath,
}

/// Natural pixel dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_pair(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decode and encode operations consumed by the engine.
pub trait ImageBackend {
    /// Read natural dimensions without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Fully decode a source image to 8-bit RGBA.
    fn decode(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Encode a rendered surface buffer into file bytes.
    fn encode(&self, pixels: &RgbaImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
