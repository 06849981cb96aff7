//! Batch export of framed photos.
//!
//! [`export_all`] renders every selected photo at full export size, encodes
//! it, and hands the bytes to a [`PhotoStore`]. The loop is strictly serial
//! and draws on a single reusable surface, which is only reallocated when
//! the target size changes (a fixed ratio keeps one surface for the whole
//! batch; `auto` may need a new one per photo).
//!
//! ## Failure model
//!
//! | Situation | Result |
//! |---|---|
//! | empty selection | `Err(ExportError::NoImages)`, nothing is written |
//! | store refuses authorization | `Err(ExportError::PermissionDenied)`, nothing is written |
//! | photo can't be decoded | placeholder frame is saved, counted as saved |
//! | encode or save fails | recorded in [`ExportSummary::failures`], batch continues |
//!
//! Progress is reported after every item through an optional
//! `mpsc::Sender<ExportEvent>`; the caller decides how to display it.

use crate::composite::{self, RenderOutcome};
use crate::config::FrameConfig;
use crate::imaging::calculations::target_size;
use crate::imaging::{
    BackendError, EncodeParams, ImageBackend, OutputFormat, Quality, RasterSurface, Surface,
};
use crate::ratio::{self, Orientation, RatioSpec};
use crate::session::Session;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no photos selected")]
    NoImages,
    #[error("saving is not permitted: {0}")]
    PermissionDenied(String),
    #[error("output unavailable: {0}")]
    Store(StoreError),
}

/// Where exported frames end up.
pub trait PhotoStore {
    /// Ask once, before any save, whether persisting is allowed.
    fn authorize(&mut self) -> Result<(), StoreError>;

    /// Persist one encoded frame derived from the source stem `name`.
    fn save(&mut self, name: &str, format: OutputFormat, bytes: &[u8])
    -> Result<PathBuf, StoreError>;
}

/// Writes `<stem>-framed.<ext>` files into a directory, never overwriting.
///
/// On a name collision a counter is appended: `a-framed-2.jpg`,
/// `a-framed-3.jpg`, ...
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PhotoStore for DirectoryStore {
    fn authorize(&mut self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => {
                StoreError::PermissionDenied(format!("{}: {}", self.dir.display(), e))
            }
            _ => StoreError::Write(e),
        })?;
        let meta = fs::metadata(&self.dir)?;
        if meta.permissions().readonly() {
            return Err(StoreError::PermissionDenied(format!(
                "{} is read-only",
                self.dir.display()
            )));
        }
        Ok(())
    }

    fn save(
        &mut self,
        name: &str,
        format: OutputFormat,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let ext = format.extension();
        for n in 1u32.. {
            let file_name = match n {
                1 => format!("{name}-framed.{ext}"),
                n => format!("{name}-framed-{n}.{ext}"),
            };
            let path = self.dir.join(file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    write_or_remove(&path, file, bytes)?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(StoreError::Write(io::Error::other("no free output name")))
    }
}

/// Write `bytes` to the freshly created file at `path`. On failure the file
/// is closed and removed so no truncated output keeps the name.
fn write_or_remove(path: &Path, mut file: impl Write, bytes: &[u8]) -> io::Result<()> {
    let result = file.write_all(bytes).and_then(|()| file.flush());
    if result.is_err() {
        drop(file);
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
    result
}

/// Everything one batch export needs, fixed for the whole batch.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub images: &'a [PathBuf],
    pub frame: &'a FrameConfig,
    pub long_edge: u32,
    pub ratio: RatioSpec,
    pub orientation: Orientation,
    pub quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Saved { path: PathBuf, placeholder: bool },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    Started {
        total: usize,
    },
    ItemFinished {
        /// 1-based position in the batch.
        current: usize,
        total: usize,
        source: PathBuf,
        status: ItemStatus,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportFailure {
    pub source: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutcome {
    AllSaved,
    PartialFailure,
    AllFailed,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ExportSummary {
    pub saved: usize,
    pub failed: usize,
    /// Saved frames whose photo could not be decoded.
    pub placeholders: usize,
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<ExportFailure>,
    /// Times the export surface had to be (re)allocated.
    pub surface_allocations: usize,
}

impl ExportSummary {
    pub fn outcome(&self) -> ExportOutcome {
        if self.failed == 0 {
            ExportOutcome::AllSaved
        } else if self.saved == 0 {
            ExportOutcome::AllFailed
        } else {
            ExportOutcome::PartialFailure
        }
    }
}

#[derive(Error, Debug)]
enum ItemError {
    #[error("encode: {0}")]
    Encode(#[from] BackendError),
    #[error("save: {0}")]
    Store(#[from] StoreError),
}

/// Export every image in `request`, in order.
#[tracing::instrument(skip_all, fields(images = request.images.len(), long_edge = request.long_edge))]
pub fn export_all(
    backend: &impl ImageBackend,
    session: &mut Session,
    store: &mut impl PhotoStore,
    request: &ExportRequest<'_>,
    events: Option<Sender<ExportEvent>>,
) -> Result<ExportSummary, ExportError> {
    if request.images.is_empty() {
        return Err(ExportError::NoImages);
    }
    store.authorize().map_err(|e| match e {
        StoreError::PermissionDenied(msg) => ExportError::PermissionDenied(msg),
        other => ExportError::Store(other),
    })?;

    let emit = |event: ExportEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let total = request.images.len();
    emit(ExportEvent::Started { total });

    let style = request.frame.style();
    let params = EncodeParams {
        format: OutputFormat::for_background(style.background.is_some()),
        quality: request.quality,
    };
    let fixed_target = match request.ratio {
        RatioSpec::Fixed(w, h) => {
            Some(target_size(request.orientation.normalize((w, h)), request.long_edge))
        }
        RatioSpec::Auto => None,
    };

    let mut summary = ExportSummary::default();
    let mut canvas: Option<RasterSurface> = None;

    for (index, source) in request.images.iter().enumerate() {
        let (w, h) = fixed_target.unwrap_or_else(|| {
            let ratio = ratio::resolve(
                backend,
                session,
                RatioSpec::Auto,
                request.orientation,
                Some(source),
            );
            target_size(ratio, request.long_edge)
        });

        let surface = canvas.get_or_insert_with(|| {
            summary.surface_allocations += 1;
            RasterSurface::new(w, h)
        });
        if (surface.width(), surface.height()) != (w, h) {
            tracing::debug!(width = w, height = h, "resizing export surface");
            surface.resize(w, h);
            summary.surface_allocations += 1;
        }

        let rendered = composite::render(backend, session, surface, source, &style);
        let placeholder = rendered == RenderOutcome::Placeholder;
        let status = match save_one(backend, store, surface, source, &params) {
            Ok(path) => {
                tracing::info!(source = %source.display(), output = %path.display(), "saved frame");
                summary.saved += 1;
                if placeholder {
                    summary.placeholders += 1;
                }
                summary.outputs.push(path.clone());
                ItemStatus::Saved { path, placeholder }
            }
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "export failed");
                summary.failed += 1;
                summary.failures.push(ExportFailure {
                    source: source.clone(),
                    error: e.to_string(),
                });
                ItemStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        emit(ExportEvent::ItemFinished {
            current: index + 1,
            total,
            source: source.clone(),
            status,
        });
    }

    Ok(summary)
}

fn save_one(
    backend: &impl ImageBackend,
    store: &mut impl PhotoStore,
    surface: &RasterSurface,
    source: &Path,
    params: &EncodeParams,
) -> Result<PathBuf, ItemError> {
    let bytes = backend.encode(surface.pixels(), params)?;
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    Ok(store.save(&stem, params.format, &bytes)?)
}
