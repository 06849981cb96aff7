//! Interactive editing session.
//!
//! [`Editor`] holds what the user is working on (the photo list, the current
//! selection, ratio, orientation, export size, and frame settings) together
//! with a down-scaled preview surface. Every user action follows the same
//! path: validate and commit state, recompute the preview canvas size if
//! the working ratio may have changed, then schedule a redraw. Redraws are
//! debounced and only happen when [`Editor::tick`] observes the deadline, so
//! a burst of changes paints once.
//!
//! ```text
//! action ──► commit ──► preview size ──► schedule ──(50ms)──► tick ──► render
//! typing ──► NumericField ──(600ms / blur / step)──► commit ──► ...
//! ```

use crate::composite::{self, RenderOutcome};
use crate::config::{FrameConfig, MAX_BORDER_PX, MAX_ZOOM_PCT, MIN_ZOOM_PCT, Settings};
use crate::export::{self, ExportError, ExportEvent, ExportRequest, ExportSummary, PhotoStore};
use crate::imaging::calculations::{MAX_LONG_EDGE, preview_border, preview_size};
use crate::imaging::{ImageBackend, Quality, RasterSurface, Surface};
use crate::input::{Debouncer, NumericField};
use crate::palette;
use crate::ratio::{self, Orientation, RatioSpec};
use crate::session::Session;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

pub struct Editor<B: ImageBackend> {
    backend: B,
    session: Session,
    images: Vec<PathBuf>,
    selected: usize,
    ratio: RatioSpec,
    orientation: Orientation,
    long_edge: u32,
    quality: Quality,
    frame: FrameConfig,
    preview_long_side: u32,
    preview: RasterSurface,
    border_field: NumericField,
    zoom_field: NumericField,
    redraw: Debouncer,
    color_presets: Vec<String>,
    last_render: Option<RenderOutcome>,
}

impl<B: ImageBackend> Editor<B> {
    pub fn new(backend: B, settings: &Settings) -> Self {
        let commit_delay = Duration::from_millis(settings.preview.input_commit_delay_ms);
        let frame = settings.frame.clone();
        let mut editor = Self {
            backend,
            session: Session::with_decode_capacity(settings.cache.max_decoded_images),
            images: Vec::new(),
            selected: 0,
            ratio: settings.ratio,
            orientation: settings.orientation,
            long_edge: settings.export.long_edge.clamp(1, MAX_LONG_EDGE),
            quality: Quality::new(settings.export.quality),
            preview_long_side: settings.preview.long_side.max(1),
            preview: RasterSurface::with_filter(1, 1, FilterType::Triangle),
            border_field: NumericField::with_delay(
                frame.border_px() as i64,
                0,
                MAX_BORDER_PX as i64,
                commit_delay,
            ),
            zoom_field: NumericField::with_delay(
                frame.zoom_pct() as i64,
                MIN_ZOOM_PCT as i64,
                MAX_ZOOM_PCT as i64,
                commit_delay,
            ),
            frame,
            redraw: Debouncer::new(Duration::from_millis(settings.preview.redraw_delay_ms)),
            color_presets: palette::color_presets(&palette::fallback_palette()),
            last_render: None,
        };
        editor.update_preview_size();
        editor
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.images.get(self.selected).map(PathBuf::as_path)
    }

    pub fn ratio(&self) -> RatioSpec {
        self.ratio
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn long_edge(&self) -> u32 {
        self.long_edge
    }

    pub fn frame(&self) -> &FrameConfig {
        &self.frame
    }

    pub fn border_field(&self) -> &NumericField {
        &self.border_field
    }

    pub fn zoom_field(&self) -> &NumericField {
        &self.zoom_field
    }

    pub fn color_presets(&self) -> &[String] {
        &self.color_presets
    }

    pub fn preview(&self) -> &RasterSurface {
        &self.preview
    }

    pub fn preview_size(&self) -> (u32, u32) {
        (self.preview.width(), self.preview.height())
    }

    /// Outcome of the most recent redraw; `None` before the first one or when
    /// there was no photo to draw.
    pub fn last_render(&self) -> Option<RenderOutcome> {
        self.last_render
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.redraw.deadline(),
            self.border_field.deadline(),
            self.zoom_field.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // =========================================================================
    // Photos
    // =========================================================================

    /// Replace the photo list and select the first photo.
    pub fn load_images(&mut self, paths: Vec<PathBuf>, now: Instant) {
        self.images = paths;
        self.selected = 0;
        self.refresh_color_presets();
        self.update_preview_size();
        self.redraw.schedule(now);
    }

    /// Select the photo at `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.images.len() {
            return false;
        }
        self.selected = index;
        self.refresh_color_presets();
        self.update_preview_size();
        self.redraw.schedule(now);
        true
    }

    // =========================================================================
    // Ratio, orientation, size
    // =========================================================================

    /// Apply a ratio token; malformed tokens become `3:4`.
    pub fn set_ratio(&mut self, token: &str, now: Instant) {
        self.ratio = RatioSpec::parse(token);
        self.update_preview_size();
        self.redraw.schedule(now);
    }

    pub fn toggle_orientation(&mut self, now: Instant) {
        self.orientation = self.orientation.toggled();
        self.update_preview_size();
        self.redraw.schedule(now);
    }

    /// Export long edge, clamped to `1..=MAX_LONG_EDGE`. Only the preview
    /// border scaling depends on it.
    pub fn set_long_edge(&mut self, long_edge: u32, now: Instant) {
        self.long_edge = long_edge.clamp(1, MAX_LONG_EDGE);
        self.redraw.schedule(now);
    }

    // =========================================================================
    // Border and zoom fields
    // =========================================================================

    pub fn border_input(&mut self, text: &str, now: Instant) {
        self.border_field.input(text, now);
    }

    pub fn border_blur(&mut self, now: Instant) {
        if let Some(v) = self.border_field.blur() {
            self.apply_border(v, now);
        }
    }

    pub fn border_step(&mut self, delta: i64, now: Instant) {
        let v = self.border_field.step(delta);
        self.apply_border(v, now);
    }

    pub fn zoom_input(&mut self, text: &str, now: Instant) {
        self.zoom_field.input(text, now);
    }

    pub fn zoom_blur(&mut self, now: Instant) {
        if let Some(v) = self.zoom_field.blur() {
            self.apply_zoom(v, now);
        }
    }

    pub fn zoom_step(&mut self, delta: i64, now: Instant) {
        let v = self.zoom_field.step(delta);
        self.apply_zoom(v, now);
    }

    fn apply_border(&mut self, v: i64, now: Instant) {
        self.frame.set_border_px(v);
        self.redraw.schedule(now);
    }

    fn apply_zoom(&mut self, v: i64, now: Instant) {
        self.frame.set_zoom_pct(v);
        self.redraw.schedule(now);
    }

    // =========================================================================
    // Background and border fills
    // =========================================================================

    pub fn set_outer_background(&mut self, enabled: bool, now: Instant) {
        self.frame.outer_background.enabled = enabled;
        self.redraw.schedule(now);
    }

    pub fn set_inner_border(&mut self, enabled: bool, now: Instant) {
        self.frame.inner_border.enabled = enabled;
        self.redraw.schedule(now);
    }

    /// Returns `false` (and changes nothing) for an invalid hex color.
    pub fn set_outer_color(&mut self, hex: &str, now: Instant) -> bool {
        let accepted = self.frame.outer_background.set_color(hex);
        if accepted {
            self.redraw.schedule(now);
        }
        accepted
    }

    /// Returns `false` (and changes nothing) for an invalid hex color.
    pub fn set_inner_color(&mut self, hex: &str, now: Instant) -> bool {
        let accepted = self.frame.inner_border.set_color(hex);
        if accepted {
            self.redraw.schedule(now);
        }
        accepted
    }

    // =========================================================================
    // Timers and rendering
    // =========================================================================

    /// Run whatever is due at `now`: field commits first, then a redraw.
    ///
    /// Returns `true` if the preview was redrawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(v) = self.border_field.poll(now) {
            self.apply_border(v, now);
        }
        if let Some(v) = self.zoom_field.poll(now) {
            self.apply_zoom(v, now);
        }
        if self.redraw.fire(now) {
            self.redraw_now();
            return true;
        }
        false
    }

    /// Render the preview immediately, bypassing the debounce.
    pub fn redraw_now(&mut self) -> Option<RenderOutcome> {
        self.redraw.cancel();
        let scaled = preview_border(
            self.frame.border_px(),
            self.preview_long_side,
            self.long_edge,
        );
        let style = self.frame.style().with_border_px(scaled);

        let outcome = match self.images.get(self.selected) {
            Some(path) => Some(composite::render(
                &self.backend,
                &mut self.session,
                &mut self.preview,
                path,
                &style,
            )),
            None => {
                composite::paint_background(&mut self.preview, &style);
                None
            }
        };
        self.last_render = outcome;
        outcome
    }

    /// Export every loaded photo with the committed settings, then refresh
    /// the preview.
    pub fn export_all(
        &mut self,
        store: &mut impl PhotoStore,
        events: Option<Sender<ExportEvent>>,
    ) -> Result<ExportSummary, ExportError> {
        let request = ExportRequest {
            images: &self.images,
            frame: &self.frame,
            long_edge: self.long_edge,
            ratio: self.ratio,
            orientation: self.orientation,
            quality: self.quality,
        };
        let result = export::export_all(&self.backend, &mut self.session, store, &request, events);
        self.redraw_now();
        result
    }

    fn update_preview_size(&mut self) {
        let working = ratio::resolve(
            &self.backend,
            &mut self.session,
            self.ratio,
            self.orientation,
            self.images.get(self.selected).map(PathBuf::as_path),
        );
        let (w, h) = preview_size(working, self.preview_long_side);
        if self.preview_size() != (w, h) {
            tracing::debug!(width = w, height = h, "preview canvas resized");
            self.preview.resize(w, h);
        }
    }

    fn refresh_color_presets(&mut self) {
        let extracted = match self.images.get(self.selected) {
            Some(path) => palette::extract(&self.backend, &mut self.session, path),
            None => palette::fallback_palette(),
        };
        self.color_presets = palette::color_presets(&extracted);
    }
}
