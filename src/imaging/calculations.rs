//! Pure layout calculations for framing a photo.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! ```text
//! ┌──────────────── target (out_w × out_h) ────────────────┐
//! │   margin = max(border + 6, 18)                          │
//! │   ┌────── border (filled, painted first) ──────┐        │
//! │   │ ┌──────── photo (dw × dh, centered) ─────┐ │        │
//! │   │ │                                        │ │        │
//! │   │ └────────────────────────────────────────┘ │        │
//! │   └────────────────────────────────────────────┘        │
//! └─────────────────────────────────────────────────────────┘
//! ```

/// Smallest gap between the frame edge and the photo.
pub const MIN_MARGIN: u32 = 18;
/// Extra clearance kept outside the border.
pub const BORDER_CLEARANCE: u32 = 6;
pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 1.5;
/// Width of the interactive preview canvas.
pub const PREVIEW_LONG_SIDE: u32 = 680;
/// Largest side of any rendered surface. Larger requests are clamped.
pub const MAX_LONG_EDGE: u32 = 8192;

/// A pixel rectangle that may start left of / above the surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }
}

/// Where the photo lands inside the target, and the border painted around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Border thickness in pixels (0 = no border).
    pub border: u32,
    /// Margin that was reserved on every side.
    pub margin: u32,
}

impl DrawRect {
    pub fn photo_rect(&self) -> Rect {
        Rect::new(self.x as i64, self.y as i64, self.width, self.height)
    }

    /// The filled border rectangle, inflated by `border` on every side.
    pub fn border_rect(&self) -> Option<Rect> {
        if self.border == 0 {
            return None;
        }
        let b = self.border;
        Some(Rect::new(
            self.x as i64 - b as i64,
            self.y as i64 - b as i64,
            self.width + 2 * b,
            self.height + 2 * b,
        ))
    }
}

/// Margin reserved between the frame edge and any border/photo content.
pub fn frame_margin(border_px: u32) -> u32 {
    (border_px + BORDER_CLEARANCE).max(MIN_MARGIN)
}

/// Fit a photo of `image` pixels into an `out` target.
///
/// The photo is scaled to the largest size that fits inside the target minus
/// the margin, then multiplied by `zoom` (clamped to `[0.3, 1.5]`). The photo
/// never grows past the available area, so zooming in beyond the fit is a
/// no-op rather than a protrusion into the margin.
///
/// # Examples
/// ```
/// # use photoframe::imaging::calculations::fit_photo;
/// // 1800×1800 target, 4px border → margin 18, available 1764×1764
/// let rect = fit_photo((1800, 1800), (4000, 3000), 4, 1.0);
/// assert_eq!((rect.width, rect.height), (1764, 1323));
/// assert_eq!((rect.x, rect.y), (18, 238));
/// ```
pub fn fit_photo(out: (u32, u32), image: (u32, u32), border_px: u32, zoom: f64) -> DrawRect {
    let (out_w, out_h) = out;
    let (img_w, img_h) = (image.0.max(1), image.1.max(1));

    let margin = frame_margin(border_px);
    let avail_w = out_w.saturating_sub(2 * margin).max(1);
    let avail_h = out_h.saturating_sub(2 * margin).max(1);

    let fit = (avail_w as f64 / img_w as f64).min(avail_h as f64 / img_h as f64);
    let zoom = if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    };
    let scale = (fit * zoom).min(fit);

    // The epsilon keeps an exact fit (e.g. 0.441 × 4000) from flooring to 1763.
    let width = ((img_w as f64 * scale + 1e-9).floor() as u32).clamp(1, avail_w);
    let height = ((img_h as f64 * scale + 1e-9).floor() as u32).clamp(1, avail_h);

    DrawRect {
        x: out_w.saturating_sub(width) / 2,
        y: out_h.saturating_sub(height) / 2,
        width,
        height,
        border: border_px,
        margin,
    }
}

/// Border thickness for a down-scaled preview of an export.
///
/// Scales `border_px` by `preview_long / export_long` so the border reads the
/// same in the preview as in the exported file. A non-zero border never
/// rounds away to nothing.
pub fn preview_border(border_px: u32, preview_long: u32, export_long: u32) -> u32 {
    if border_px == 0 {
        return 0;
    }
    let scaled = border_px as f64 * preview_long as f64 / export_long.max(1) as f64;
    (scaled.round() as u32).max(1)
}

/// Output dimensions for a working ratio with `long_edge` on its longer side.
///
/// `long_edge` is clamped to `1..=MAX_LONG_EDGE`.
///
/// # Examples
/// ```
/// # use photoframe::imaging::calculations::target_size;
/// assert_eq!(target_size((3, 4), 1800), (1350, 1800));
/// assert_eq!(target_size((16, 9), 1200), (1200, 675));
/// ```
pub fn target_size(ratio: (u32, u32), long_edge: u32) -> (u32, u32) {
    let (rw, rh) = (ratio.0.max(1), ratio.1.max(1));
    let long = long_edge.clamp(1, MAX_LONG_EDGE);
    if rw >= rh {
        let h = (long as f64 * rh as f64 / rw as f64).round() as u32;
        (long, h.max(1))
    } else {
        let w = (long as f64 * rw as f64 / rh as f64).round() as u32;
        (w.max(1), long)
    }
}

/// Preview canvas dimensions: fixed width, height following the ratio.
///
/// Both sides are capped at [`MAX_LONG_EDGE`].
pub fn preview_size(ratio: (u32, u32), width: u32) -> (u32, u32) {
    let (rw, rh) = (ratio.0.max(1), ratio.1.max(1));
    let width = width.clamp(1, MAX_LONG_EDGE);
    let h = (width as f64 * rh as f64 / rw as f64).round() as u32;
    (width, h.clamp(1, MAX_LONG_EDGE))
}
