//! End-to-end export through the real `image` backend and the filesystem.

use image::{Rgba, RgbaImage};
use photoframe::config::{FrameConfig, Settings};
use photoframe::editor::Editor;
use photoframe::export::{DirectoryStore, ExportOutcome, ExportRequest, export_all};
use photoframe::imaging::{Quality, RustBackend, Surface};
use photoframe::ratio::{Orientation, RatioSpec};
use photoframe::session::Session;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
        .save(path)
        .unwrap();
}

fn request<'a>(images: &'a [PathBuf], frame: &'a FrameConfig, ratio: RatioSpec) -> ExportRequest<'a> {
    ExportRequest {
        images,
        frame,
        long_edge: 600,
        ratio,
        orientation: Orientation::Portrait,
        quality: Quality::new(90),
    }
}

#[test]
fn exports_framed_jpegs_with_placeholder_for_unreadable_input() {
    let tmp = TempDir::new().unwrap();
    let wide = tmp.path().join("wide.png");
    let tall = tmp.path().join("tall.png");
    let broken = tmp.path().join("broken.jpg");
    write_png(&wide, 120, 80, [30, 90, 200]);
    write_png(&tall, 80, 120, [200, 60, 30]);
    std::fs::write(&broken, b"not an image").unwrap();

    let images = vec![wide, tall, broken];
    let frame = FrameConfig::default();
    let out = tmp.path().join("out");
    let mut store = DirectoryStore::new(&out);
    let mut session = Session::new();

    let summary = export_all(
        &RustBackend::new(),
        &mut session,
        &mut store,
        &request(&images, &frame, RatioSpec::Fixed(3, 4)),
        None,
    )
    .unwrap();

    assert_eq!(summary.outcome(), ExportOutcome::AllSaved);
    assert_eq!(summary.saved, 3);
    assert_eq!(summary.placeholders, 1);
    assert_eq!(summary.surface_allocations, 1);

    let names: Vec<String> = summary
        .outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["wide-framed.jpg", "tall-framed.jpg", "broken-framed.jpg"]);

    let framed = image::open(out.join("wide-framed.jpg")).unwrap().into_rgb8();
    assert_eq!(framed.dimensions(), (450, 600));
    // White background near the edge, photo color at the center
    let edge = framed.get_pixel(8, 300).0;
    assert!(edge.iter().all(|&c| c > 240), "edge {edge:?}");
    let center = framed.get_pixel(225, 300).0;
    assert!(center[2] > 170 && center[0] < 60, "center {center:?}");
}

#[test]
fn transparent_background_exports_png_and_keeps_alpha() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.png");
    write_png(&photo, 100, 100, [10, 200, 10]);

    let images = vec![photo];
    let mut frame = FrameConfig::default();
    frame.outer_background.enabled = false;
    let mut store = DirectoryStore::new(tmp.path().join("out"));

    let summary = export_all(
        &RustBackend::new(),
        &mut Session::new(),
        &mut store,
        &request(&images, &frame, RatioSpec::Fixed(1, 1)),
        None,
    )
    .unwrap();

    let saved = &summary.outputs[0];
    assert_eq!(saved.extension().unwrap(), "png");
    let framed = image::open(saved).unwrap().into_rgba8();
    assert_eq!(framed.dimensions(), (600, 600));
    assert_eq!(framed.get_pixel(0, 0).0[3], 0);
    assert_eq!(framed.get_pixel(300, 300).0, [10, 200, 10, 255]);
}

#[test]
fn auto_ratio_follows_each_photo() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.png");
    let b = tmp.path().join("b.png");
    write_png(&a, 200, 100, [100, 100, 100]);
    write_png(&b, 100, 100, [100, 100, 100]);

    let images = vec![a, b];
    let frame = FrameConfig::default();
    let mut store = DirectoryStore::new(tmp.path().join("out"));
    let mut req = request(&images, &frame, RatioSpec::Auto);
    req.orientation = Orientation::Landscape;

    let summary = export_all(&RustBackend::new(), &mut Session::new(), &mut store, &req, None).unwrap();

    let dims: Vec<(u32, u32)> = summary
        .outputs
        .iter()
        .map(|p| image::image_dimensions(p).unwrap())
        .collect();
    assert_eq!(dims, [(600, 300), (600, 600)]);
    assert_eq!(summary.surface_allocations, 2);
}

#[test]
fn repeated_export_never_overwrites() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("p.png");
    write_png(&photo, 50, 50, [90, 90, 90]);
    let images = vec![photo];
    let frame = FrameConfig::default();
    let mut store = DirectoryStore::new(tmp.path().join("out"));
    let backend = RustBackend::new();
    let mut session = Session::new();

    for _ in 0..2 {
        export_all(
            &backend,
            &mut session,
            &mut store,
            &request(&images, &frame, RatioSpec::Fixed(1, 1)),
            None,
        )
        .unwrap();
    }

    assert!(tmp.path().join("out/p-framed.jpg").is_file());
    assert!(tmp.path().join("out/p-framed-2.jpg").is_file());
}

#[test]
fn editor_previews_and_exports_real_files() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("sky.png");
    write_png(&photo, 300, 200, [0x33, 0x66, 0x99]);

    let t0 = Instant::now();
    let mut editor = Editor::new(RustBackend::new(), &Settings::default());
    editor.load_images(vec![photo], t0);
    assert_eq!(editor.color_presets()[3], "#306090");

    assert!(editor.tick(t0 + Duration::from_millis(50)));
    assert_eq!(editor.preview_size(), (680, 680));
    assert_eq!(
        editor.preview().pixels().get_pixel(340, 340).0,
        [0x33, 0x66, 0x99, 255]
    );

    let mut store = DirectoryStore::new(tmp.path().join("out"));
    let summary = editor.export_all(&mut store, None).unwrap();
    assert_eq!(summary.saved, 1);
    assert_eq!(image::image_dimensions(&summary.outputs[0]).unwrap(), (1800, 1800));
}
