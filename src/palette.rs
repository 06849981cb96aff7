//! Dominant color extraction for the color presets.
//!
//! The photo is drawn into a 100×100 thumbnail, every fourth pixel is
//! sampled, near-white and near-black pixels are skipped, and the rest are
//! quantized to 16 levels per channel. The three most frequent buckets are
//! returned as `#rrggbb`, most frequent first. Equal counts are ordered by
//! ascending color so the result is deterministic.

use crate::color::{Rgb, rgb_to_hex};
use crate::imaging::calculations::Rect;
use crate::imaging::{ImageBackend, RasterSurface, Surface};
use crate::session::Session;
use image::imageops::FilterType;
use std::collections::BTreeMap;
use std::path::Path;

const THUMB_SIDE: u32 = 100;
/// Byte stride through RGBA data: one pixel in four.
const SAMPLE_STRIDE: usize = 16;
const QUANT_STEP: u8 = 16;
const TOP_N: usize = 3;

/// Palette reported when the photo can't be read.
pub const FALLBACK_PALETTE: [&str; 3] = ["#FF6B6B", "#4ECDC4", "#45B7D1"];
/// Always offered ahead of extracted colors.
pub const BASE_PRESETS: [&str; 3] = ["#000000", "#666666", "#FFFFFF"];

/// Up to three dominant colors of the photo at `path`.
///
/// May return fewer than three (or none) when the photo is mostly near-white
/// or near-black. A decode failure returns [`FALLBACK_PALETTE`].
pub fn extract(backend: &impl ImageBackend, session: &mut Session, path: &Path) -> Vec<String> {
    let photo = match session.decode(backend, path) {
        Ok(photo) => photo,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "palette extraction failed, using fallback");
            return fallback_palette();
        }
    };

    let mut thumb = RasterSurface::with_filter(THUMB_SIDE, THUMB_SIDE, FilterType::Triangle);
    thumb.draw_image(&photo, Rect::new(0, 0, THUMB_SIDE, THUMB_SIDE));
    dominant_colors(thumb.pixels().as_raw())
}

/// Count quantized buckets over raw RGBA bytes and return the top three.
pub fn dominant_colors(rgba: &[u8]) -> Vec<String> {
    let mut counts: BTreeMap<Rgb, u32> = BTreeMap::new();
    for px in rgba.chunks_exact(4).step_by(SAMPLE_STRIDE / 4) {
        let (r, g, b) = (px[0], px[1], px[2]);
        if r > 240 && g > 240 && b > 240 {
            continue;
        }
        if r < 15 && g < 15 && b < 15 {
            continue;
        }
        *counts.entry(Rgb::new(quantize(r), quantize(g), quantize(b))).or_default() += 1;
    }

    // BTreeMap iterates in ascending color order; the stable sort keeps it for ties.
    let mut ranked: Vec<(Rgb, u32)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|(color, _)| rgb_to_hex(color))
        .collect()
}

fn quantize(v: u8) -> u8 {
    v / QUANT_STEP * QUANT_STEP
}

pub fn fallback_palette() -> Vec<String> {
    FALLBACK_PALETTE.iter().map(|s| s.to_string()).collect()
}

/// Preset list shown to users: the base colors followed by `extracted`.
pub fn color_presets(extracted: &[String]) -> Vec<String> {
    BASE_PRESETS
        .iter()
        .map(|s| s.to_string())
        .chain(extracted.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;

    fn pixels(colors: &[[u8; 3]]) -> Vec<u8> {
        colors.iter().flat_map(|c| [c[0], c[1], c[2], 255]).collect()
    }

    #[test]
    fn solid_photo_yields_single_quantized_color() {
        let backend = MockBackend::new().with_solid("/p.jpg", 40, 30, Rgb::new(0x33, 0x66, 0x99));
        let mut session = Session::new();
        assert_eq!(extract(&backend, &mut session, Path::new("/p.jpg")), vec!["#306090"]);
    }

    #[test]
    fn extracts_from_a_real_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("teal.png");
        crate::test_helpers::create_solid_png(&path, 64, 48, [0x20, 0xb0, 0xa0]);
        let mut session = Session::new();
        assert_eq!(
            extract(&crate::imaging::RustBackend::new(), &mut session, &path),
            vec!["#20b0a0"]
        );
    }

    #[test]
    fn decode_failure_returns_fallback() {
        let backend = MockBackend::new();
        let mut session = Session::new();
        assert_eq!(
            extract(&backend, &mut session, Path::new("/missing.jpg")),
            vec!["#FF6B6B", "#4ECDC4", "#45B7D1"]
        );
    }

    #[test]
    fn white_and_black_photos_yield_nothing() {
        let backend = MockBackend::new()
            .with_solid("/w.jpg", 10, 10, Rgb::new(250, 250, 250))
            .with_solid("/b.jpg", 10, 10, Rgb::new(5, 5, 5));
        let mut session = Session::new();
        assert!(extract(&backend, &mut session, Path::new("/w.jpg")).is_empty());
        assert!(extract(&backend, &mut session, Path::new("/b.jpg")).is_empty());
    }

    #[test]
    fn only_every_fourth_pixel_is_sampled() {
        // Sampled positions 0 and 4 are red; the green ones in between are skipped
        let data = pixels(&[
            [200, 0, 0],
            [0, 200, 0],
            [0, 200, 0],
            [0, 200, 0],
            [200, 0, 0],
        ]);
        assert_eq!(dominant_colors(&data), vec!["#c00000"]);
    }

    #[test]
    fn ranks_by_frequency_then_color() {
        let mut colors = Vec::new();
        // Sampled: blue ×3, red ×2, green ×2, gray ×1
        for c in [
            [0, 0, 200],
            [0, 0, 200],
            [0, 0, 200],
            [200, 0, 0],
            [0, 200, 0],
            [200, 0, 0],
            [0, 200, 0],
            [100, 100, 100],
        ] {
            colors.extend([c, c, c, c]);
        }
        let top = dominant_colors(&pixels(&colors));
        // Tie between red and green resolved by ascending color: green first
        assert_eq!(top, vec!["#0000c0", "#00c000", "#c00000"]);
    }

    #[test]
    fn skip_thresholds_are_strict() {
        // 240 is not "near white", 15 is not "near black"
        let data = pixels(&[[240, 240, 240], [0, 0, 0], [0, 0, 0], [0, 0, 0], [15, 15, 15]]);
        let top = dominant_colors(&data);
        assert_eq!(top, vec!["#000000", "#f0f0f0"]);
    }

    #[test]
    fn presets_put_base_colors_first() {
        let presets = color_presets(&["#306090".to_string()]);
        assert_eq!(presets, vec!["#000000", "#666666", "#FFFFFF", "#306090"]);
        assert_eq!(color_presets(&fallback_palette()).len(), 6);
    }
}
