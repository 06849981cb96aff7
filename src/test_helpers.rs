//! Shared test utilities: synthetic photos on disk.
//!
//! Gradient images encode their own coordinates (`r = x`, `g = y`, `b = 128`)
//! so a test can tell where a decoded pixel came from.

use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
}

/// Write a coordinate-gradient JPEG.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let writer = BufWriter::new(File::create(path).unwrap());
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a coordinate-gradient PNG (lossless, so pixels survive exactly).
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let writer = BufWriter::new(File::create(path).unwrap());
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a single-color opaque PNG.
pub fn create_solid_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    let img = RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let writer = BufWriter::new(File::create(path).unwrap());
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}
