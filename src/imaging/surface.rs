//! Drawing surfaces.
//!
//! [`Surface`] is the small 2D raster interface the compositing pipeline
//! paints through: clear, fill, 1px stroke, scaled image draw, and RGBA
//! read-back. [`RasterSurface`] implements it over an `image::RgbaImage` and
//! serves both the interactive preview and the offscreen export target.
//!
//! Rectangles may hang off the surface; every operation clips.

use super::calculations::Rect;
use crate::color::Rgb;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::borrow::Cow;

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reallocate to a new size. Contents are cleared.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to transparent black.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Paint a 1px outline along the inside edge of `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: Rgb);

    /// Draw `image` scaled into `rect`, alpha-composited over the surface.
    fn draw_image(&mut self, image: &RgbaImage, rect: Rect);

    /// Read back the surface as RGBA.
    fn pixels(&self) -> &RgbaImage;
}

/// CPU raster surface.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    buffer: RgbaImage,
    filter: FilterType,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_filter(width, height, FilterType::Lanczos3)
    }

    /// A surface that resamples with `filter` (the preview trades quality for speed).
    pub fn with_filter(width: u32, height: u32, filter: FilterType) -> Self {
        Self {
            buffer: RgbaImage::new(width.max(1), height.max(1)),
            filter,
        }
    }

    /// Intersect `rect` with the surface: `(x0, y0, x1, y1)` exclusive.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.buffer.width() as i64);
        let y1 = rect.bottom().min(self.buffer.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Source-over compositing of one straight-alpha pixel.
fn blend(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 255 {
        *dst = *src;
        return;
    }
    if sa == 0 {
        return;
    }
    let da = dst[3] as u32 * (255 - sa) / 255;
    let out_a = sa + da;
    for c in 0..3 {
        dst[c] = ((src[c] as u32 * sa + dst[c] as u32 * da) / out_a) as u8;
    }
    dst[3] = out_a as u8;
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.buffer = RgbaImage::new(width.max(1), height.max(1));
    }

    fn clear(&mut self) {
        self.buffer.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let px = Rgba(color.to_rgba());
        for y in y0..y1 {
            for x in x0..x1 {
                self.buffer.put_pixel(x, y, px);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let (w, h) = (rect.width, rect.height);
        self.fill_rect(Rect::new(rect.x, rect.y, w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, h), color);
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, h), color);
    }

    fn draw_image(&mut self, image: &RgbaImage, rect: Rect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let scaled: Cow<'_, RgbaImage> = if image.dimensions() == (rect.width, rect.height) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(image::imageops::resize(image, rect.width, rect.height, self.filter))
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let sx = (x as i64 - rect.x) as u32;
                let sy = (y as i64 - rect.y) as u32;
                let src = scaled.get_pixel(sx, sy);
                blend(self.buffer.get_pixel_mut(x, y), src);
            }
        }
    }

    fn pixels(&self) -> &RgbaImage {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn px(s: &RasterSurface, x: u32, y: u32) -> [u8; 4] {
        s.pixels().get_pixel(x, y).0
    }

    #[test]
    fn new_surface_is_transparent() {
        let s = RasterSurface::new(4, 3);
        assert_eq!((s.width(), s.height()), (4, 3));
        assert!(s.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn fill_rect_clips_to_surface() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_rect(Rect::new(-5, -5, 8, 8), RED);
        assert_eq!(px(&s, 0, 0), [255, 0, 0, 255]);
        assert_eq!(px(&s, 2, 2), [255, 0, 0, 255]);
        assert_eq!(px(&s, 3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn fill_rect_fully_outside_is_noop() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_rect(Rect::new(20, 20, 5, 5), RED);
        assert!(s.pixels().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn stroke_paints_only_edges() {
        let mut s = RasterSurface::new(5, 5);
        s.stroke_rect(Rect::new(0, 0, 5, 5), RED);
        for i in 0..5 {
            assert_eq!(px(&s, i, 0)[0], 255);
            assert_eq!(px(&s, i, 4)[0], 255);
            assert_eq!(px(&s, 0, i)[0], 255);
            assert_eq!(px(&s, 4, i)[0], 255);
        }
        assert_eq!(px(&s, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_same_size_is_exact_copy() {
        let src = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
        let mut s = RasterSurface::new(5, 5);
        s.draw_image(&src, Rect::new(1, 1, 3, 2));
        assert_eq!(px(&s, 1, 1), [0, 0, 7, 255]);
        assert_eq!(px(&s, 3, 2), [20, 20, 7, 255]);
        assert_eq!(px(&s, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_scales_into_rect() {
        let src = RgbaImage::from_pixel(50, 50, Rgba([10, 20, 30, 255]));
        let mut s = RasterSurface::new(20, 20);
        s.draw_image(&src, Rect::new(5, 5, 10, 10));
        assert_eq!(px(&s, 5, 5), [10, 20, 30, 255]);
        assert_eq!(px(&s, 14, 14), [10, 20, 30, 255]);
        assert_eq!(px(&s, 15, 15), [0, 0, 0, 0]);
    }

    #[test]
    fn translucent_pixels_blend_over_background() {
        let mut s = RasterSurface::new(1, 1);
        s.fill_rect(Rect::new(0, 0, 1, 1), Rgb::new(0, 0, 0));
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0]));
        s.draw_image(&src, Rect::new(0, 0, 1, 1));
        assert_eq!(px(&s, 0, 0), [0, 0, 0, 255]);

        let half = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        s.draw_image(&half, Rect::new(0, 0, 1, 1));
        let p = px(&s, 0, 0);
        assert_eq!(p[3], 255);
        assert!((127..=129).contains(&p[0]));
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_rect(Rect::new(0, 0, 4, 4), RED);
        s.resize(6, 2);
        assert_eq!((s.width(), s.height()), (6, 2));
        assert_eq!(px(&s, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn clear_resets_pixels() {
        let mut s = RasterSurface::new(2, 2);
        s.fill_rect(Rect::new(0, 0, 2, 2), RED);
        s.clear();
        assert!(s.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
