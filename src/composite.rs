//! One frame render: background → border → photo.
//!
//! [`render`] paints onto any [`Surface`] in a fixed order:
//!
//! 1. clear the surface
//! 2. optional background fill plus a 1px `#e5e5e5` outline at the edge
//! 3. decode the photo (through the [`Session`] decode cache)
//! 4. lay it out with [`fit_photo`]
//! 5. optional filled border rectangle
//! 6. the photo itself, which covers the border's center
//!
//! A photo that fails to decode is not an error: the surface is filled with
//! a neutral placeholder and the render completes, so one unreadable file
//! shows up as a blank frame instead of aborting a preview or a batch.

use crate::color::Rgb;
use crate::imaging::calculations::{DrawRect, Rect, fit_photo};
use crate::imaging::{ImageBackend, Surface};
use crate::session::Session;
use std::path::Path;

/// Edge outline painted over an enabled background.
pub const OUTLINE_COLOR: Rgb = Rgb::new(0xe5, 0xe5, 0xe5);
/// Fill used when the photo can't be decoded.
pub const PLACEHOLDER_COLOR: Rgb = Rgb::new(0xee, 0xee, 0xee);

/// Resolved paint parameters for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    /// Background fill, or `None` to leave the surface transparent.
    pub background: Option<Rgb>,
    /// Border fill, or `None` for no border.
    pub border: Option<Rgb>,
    pub border_px: u32,
    /// Multiplier on the fit scale.
    pub zoom: f64,
}

impl FrameStyle {
    /// Border thickness that takes part in layout. A disabled border
    /// contributes nothing, not even to the margin.
    pub fn effective_border(&self) -> u32 {
        if self.border.is_some() { self.border_px } else { 0 }
    }

    pub fn with_border_px(self, border_px: u32) -> Self {
        Self { border_px, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The photo was drawn at this rectangle.
    Framed(DrawRect),
    /// The photo could not be decoded; a placeholder was painted instead.
    Placeholder,
}

/// Clear the surface and paint the optional background and outline.
pub fn paint_background(surface: &mut impl Surface, style: &FrameStyle) {
    surface.clear();
    if let Some(color) = style.background {
        let full = Rect::new(0, 0, surface.width(), surface.height());
        surface.fill_rect(full, color);
        surface.stroke_rect(full, OUTLINE_COLOR);
    }
}

/// Render `source` framed by `style` onto the whole of `surface`.
pub fn render(
    backend: &impl ImageBackend,
    session: &mut Session,
    surface: &mut impl Surface,
    source: &Path,
    style: &FrameStyle,
) -> RenderOutcome {
    paint_background(surface, style);
    let (out_w, out_h) = (surface.width(), surface.height());

    let photo = match session.decode(backend, source) {
        Ok(photo) => photo,
        Err(e) => {
            tracing::warn!(path = %source.display(), error = %e, "photo decode failed, drawing placeholder");
            surface.fill_rect(Rect::new(0, 0, out_w, out_h), PLACEHOLDER_COLOR);
            return RenderOutcome::Placeholder;
        }
    };

    let rect = fit_photo(
        (out_w, out_h),
        photo.dimensions(),
        style.effective_border(),
        style.zoom,
    );

    if let (Some(color), Some(border_rect)) = (style.border, rect.border_rect()) {
        surface.fill_rect(border_rect, color);
    }
    surface.draw_image(&photo, rect.photo_rect());

    RenderOutcome::Framed(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RasterSurface;
    use crate::imaging::backend::tests::MockBackend;

    const RED: Rgb = Rgb::new(200, 30, 30);

    fn style() -> FrameStyle {
        FrameStyle {
            background: Some(Rgb::WHITE),
            border: Some(Rgb::BLACK),
            border_px: 4,
            zoom: 1.0,
        }
    }

    fn px(s: &RasterSurface, x: u32, y: u32) -> [u8; 4] {
        s.pixels().get_pixel(x, y).0
    }

    #[test]
    fn paints_background_border_then_photo() {
        let backend = MockBackend::new().with_solid("/p.jpg", 200, 100, RED);
        let mut session = Session::new();
        let mut surface = RasterSurface::new(300, 300);

        let outcome = render(&backend, &mut session, &mut surface, Path::new("/p.jpg"), &style());
        let RenderOutcome::Framed(rect) = outcome else {
            panic!("expected framed render, got {outcome:?}");
        };

        // margin 18 → available 264×264, photo 264×132 centered
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (18, 84, 264, 132));
        // Outline on the edge, white background inside it
        assert_eq!(px(&surface, 0, 150), [0xe5, 0xe5, 0xe5, 255]);
        assert_eq!(px(&surface, 5, 150), [255, 255, 255, 255]);
        // Border band just outside the photo
        assert_eq!(px(&surface, 15, 150), [0, 0, 0, 255]);
        assert_eq!(px(&surface, 150, 81), [0, 0, 0, 255]);
        // Photo covers the border's center
        assert_eq!(px(&surface, 150, 150), [200, 30, 30, 255]);
        // Outside border stays background
        assert_eq!(px(&surface, 150, 70), [255, 255, 255, 255]);
    }

    #[test]
    fn disabled_background_leaves_transparency() {
        let backend = MockBackend::new().with_solid("/p.jpg", 100, 100, RED);
        let mut session = Session::new();
        let mut surface = RasterSurface::new(200, 200);
        let style = FrameStyle {
            background: None,
            ..style()
        };

        render(&backend, &mut session, &mut surface, Path::new("/p.jpg"), &style);
        assert_eq!(px(&surface, 0, 0), [0, 0, 0, 0]);
        assert_eq!(px(&surface, 100, 100), [200, 30, 30, 255]);
    }

    #[test]
    fn disabled_border_does_not_widen_margin() {
        let backend = MockBackend::new().with_solid("/p.jpg", 100, 100, RED);
        let mut session = Session::new();
        let mut surface = RasterSurface::new(200, 200);
        let style = FrameStyle {
            border: None,
            border_px: 50,
            ..style()
        };

        let outcome = render(&backend, &mut session, &mut surface, Path::new("/p.jpg"), &style);
        let RenderOutcome::Framed(rect) = outcome else {
            panic!("expected framed render");
        };
        assert_eq!(rect.margin, 18);
        assert_eq!(rect.border, 0);
        assert_eq!(px(&surface, 17, 100), [255, 255, 255, 255]);
    }

    #[test]
    fn decode_failure_paints_placeholder() {
        let backend = MockBackend::new();
        let mut session = Session::new();
        let mut surface = RasterSurface::new(50, 40);

        let outcome = render(&backend, &mut session, &mut surface, Path::new("/gone.jpg"), &style());
        assert_eq!(outcome, RenderOutcome::Placeholder);
        assert!(surface.pixels().pixels().all(|p| p.0 == [0xee, 0xee, 0xee, 255]));
    }

    #[test]
    fn render_is_idempotent() {
        let backend = MockBackend::new().with_solid("/p.jpg", 640, 480, RED);
        let mut session = Session::new();
        let mut first = RasterSurface::new(300, 400);
        let mut second = RasterSurface::new(300, 400);
        let style = FrameStyle { zoom: 0.7, ..style() };

        render(&backend, &mut session, &mut first, Path::new("/p.jpg"), &style);
        render(&backend, &mut session, &mut second, Path::new("/p.jpg"), &style);
        // Rendering again over a dirty surface gives the same pixels too
        render(&backend, &mut session, &mut first, Path::new("/p.jpg"), &style);
        assert_eq!(first.pixels().as_raw(), second.pixels().as_raw());
    }

    #[test]
    fn repeated_renders_decode_once() {
        let backend = MockBackend::new().with_image("/p.jpg", 10, 10);
        let mut session = Session::new();
        let mut surface = RasterSurface::new(100, 100);
        for _ in 0..3 {
            render(&backend, &mut session, &mut surface, Path::new("/p.jpg"), &style());
        }
        assert_eq!(backend.decode_count("/p.jpg"), 1);
    }

    #[test]
    fn effective_border_follows_border_toggle() {
        assert_eq!(style().effective_border(), 4);
        assert_eq!(FrameStyle { border: None, ..style() }.effective_border(), 0);
        assert_eq!(style().with_border_px(9).effective_border(), 9);
    }
}
