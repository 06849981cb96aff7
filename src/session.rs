//! Per-session image caches.
//!
//! Redrawing the preview and exporting a batch touch the same photos over
//! and over. A [`Session`] memoizes the two expensive lookups:
//!
//! - **dimension probes**: header reads used by `auto` ratio resolution.
//!   Tiny, never evicted.
//! - **decoded images**: full RGBA buffers used by the compositing
//!   pipeline. Large, so the cache holds at most `max_decoded` images and
//!   evicts the oldest insert first.
//!
//! Failed lookups are not cached; the next call asks the backend again.
//! The session is owned by the caller and passed by `&mut` reference, so a
//! test (or a new editing session) starts from empty caches.

use crate::imaging::{BackendError, Dimensions, ImageBackend};
use image::RgbaImage;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default number of decoded photos kept in memory.
pub const DEFAULT_MAX_DECODED: usize = 32;

#[derive(Debug)]
pub struct Session {
    dimensions: HashMap<PathBuf, Dimensions>,
    decoded: HashMap<PathBuf, Arc<RgbaImage>>,
    decode_order: VecDeque<PathBuf>,
    max_decoded: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_decode_capacity(DEFAULT_MAX_DECODED)
    }

    pub fn with_decode_capacity(max_decoded: usize) -> Self {
        Self {
            dimensions: HashMap::new(),
            decoded: HashMap::new(),
            decode_order: VecDeque::new(),
            max_decoded: max_decoded.max(1),
        }
    }

    /// Natural dimensions of `path`, probed once per session.
    ///
    /// An empty path is rejected with [`BackendError::EmptyPath`] before the
    /// backend is consulted.
    pub fn probe_dimensions(
        &mut self,
        backend: &impl ImageBackend,
        path: &Path,
    ) -> Result<Dimensions, BackendError> {
        if path.as_os_str().is_empty() {
            return Err(BackendError::EmptyPath);
        }
        if let Some(dims) = self.dimensions.get(path) {
            return Ok(*dims);
        }
        let dims = backend.identify(path)?;
        self.dimensions.insert(path.to_path_buf(), dims);
        Ok(dims)
    }

    /// Decoded RGBA image for `path`, served from the cache when present.
    pub fn decode(
        &mut self,
        backend: &impl ImageBackend,
        path: &Path,
    ) -> Result<Arc<RgbaImage>, BackendError> {
        if path.as_os_str().is_empty() {
            return Err(BackendError::EmptyPath);
        }
        if let Some(img) = self.decoded.get(path) {
            tracing::debug!(path = %path.display(), "decode cache hit");
            return Ok(Arc::clone(img));
        }

        let img = Arc::new(backend.decode(path)?);
        self.dimensions.insert(
            path.to_path_buf(),
            Dimensions {
                width: img.width(),
                height: img.height(),
            },
        );

        while self.decode_order.len() >= self.max_decoded {
            if let Some(oldest) = self.decode_order.pop_front() {
                tracing::debug!(path = %oldest.display(), "evicting decoded image");
                self.decoded.remove(&oldest);
            }
        }
        self.decode_order.push_back(path.to_path_buf());
        self.decoded.insert(path.to_path_buf(), Arc::clone(&img));
        Ok(img)
    }

    pub fn cached_dimensions(&self, path: &Path) -> Option<Dimensions> {
        self.dimensions.get(path).copied()
    }

    pub fn decoded_len(&self) -> usize {
        self.decoded.len()
    }

    /// Drop every cached probe and decoded image.
    pub fn clear(&mut self) {
        self.dimensions.clear();
        self.decoded.clear();
        self.decode_order.clear();
    }
}
