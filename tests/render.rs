//! # End-to-end render tests
//!
//! Drive the public entry points and check the produced files: determinism,
//! depth selection as seen in the PNG header, logo placement and failure
//! handling, the buffer contract and batch output.

use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use qiraster::matrix::ModuleMatrix;
use qiraster::{
    generate, generate_batch, generate_to_buffer, render_bytes, try_generate, Color,
    ErrorCorrection, OutputFormat, RenderError, RenderOptions,
};
use std::fs;
use std::path::{Path, PathBuf};

const PAYLOAD: &[u8] = b"https://example.com/qiraster";

/// Unique scratch directory per test, under the system temp dir.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qiraster-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn png_header(bytes: &[u8]) -> (png::ColorType, png::BitDepth, u32, u32) {
    let reader = png::Decoder::new(bytes).read_info().unwrap();
    let info = reader.info();
    (info.color_type, info.bit_depth, info.width, info.height)
}

/// Writes a 40x20 logo: opaque red on the left half, fully transparent on the right.
fn write_logo(dir: &Path) -> PathBuf {
    let mut logo = RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]));
    for y in 0..20 {
        for x in 20..40 {
            logo.put_pixel(x, y, Rgba([0, 255, 0, 0]));
        }
    }
    let path = dir.join("logo.png");
    logo.save(&path).unwrap();
    path
}

#[test]
fn test_rendering_is_idempotent() {
    let dir = scratch("idempotent");
    let options = RenderOptions {
        size: 333,
        foreground: Color::new(20, 40, 160),
        ..Default::default()
    };
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    assert!(generate(PAYLOAD, &a, &options));
    assert!(generate(PAYLOAD, &b, &options));
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn test_default_render_is_one_bit_png() {
    let bytes = render_bytes(PAYLOAD, &RenderOptions::default()).unwrap();
    assert_eq!(
        png_header(&bytes),
        (png::ColorType::Indexed, png::BitDepth::One, 300, 300)
    );
}

#[test]
fn test_pipelines_show_in_png_header() {
    let gray = RenderOptions {
        foreground: Color::new(10, 10, 10),
        background: Color::new(200, 200, 200),
        ..Default::default()
    };
    let bytes = render_bytes(PAYLOAD, &gray).unwrap();
    assert_eq!(png_header(&bytes).0, png::ColorType::Grayscale);

    let red = RenderOptions {
        foreground: Color::new(255, 0, 0),
        ..Default::default()
    };
    let bytes = render_bytes(PAYLOAD, &red).unwrap();
    assert_eq!(png_header(&bytes).0, png::ColorType::Rgb);
}

#[test]
fn test_black_on_white_with_logo_is_rgb() {
    let dir = scratch("bw-logo");
    let options = RenderOptions {
        logo_path: Some(write_logo(&dir)),
        ..Default::default()
    };
    let bytes = render_bytes(PAYLOAD, &options).unwrap();
    assert_eq!(
        png_header(&bytes),
        (png::ColorType::Rgb, png::BitDepth::Eight, 300, 300)
    );
}

#[test]
fn test_logo_is_centered_and_blended() {
    let dir = scratch("logo-center");
    let plain_options = RenderOptions {
        size: 400,
        ..Default::default()
    };
    let options = RenderOptions {
        logo_path: Some(write_logo(&dir)),
        logo_size_percent: 50,
        ..plain_options.clone()
    };
    let decode = |bytes: Vec<u8>| image::load_from_memory(&bytes).unwrap().to_rgb8();
    let img = decode(render_bytes(PAYLOAD, &options).unwrap());
    let plain = decode(render_bytes(PAYLOAD, &plain_options).unwrap());

    // 40x20 logo at 50% of 400px: 200x100, placed at (100, 150).
    assert_eq!(img.get_pixel(100, 150).0, [255, 0, 0]);
    assert_eq!(img.get_pixel(199, 249).0, [255, 0, 0]);

    // The transparent half shows the symbol underneath.
    for (x, y) in [(200, 150), (250, 200), (299, 249)] {
        assert_eq!(img.get_pixel(x, y), plain.get_pixel(x, y), "({}, {})", x, y);
    }
    // Outside the logo the two renders agree.
    assert_eq!(img.get_pixel(99, 150), plain.get_pixel(99, 150));
    assert_eq!(img.get_pixel(100, 250), plain.get_pixel(100, 250));
}

#[test]
fn test_missing_logo_matches_plain_render() {
    let dir = scratch("missing-logo");
    let options = RenderOptions {
        foreground: Color::new(0, 90, 0),
        ..Default::default()
    };
    let with_missing = RenderOptions {
        logo_path: Some(dir.join("does-not-exist.png")),
        ..options.clone()
    };

    let plain_path = dir.join("plain.png");
    let missing_path = dir.join("missing.png");
    assert!(generate(PAYLOAD, &plain_path, &options));
    assert!(generate(PAYLOAD, &missing_path, &with_missing));
    assert_eq!(fs::read(&plain_path).unwrap(), fs::read(&missing_path).unwrap());
}

#[test]
fn test_missing_logo_keeps_one_bit_output() {
    let dir = scratch("missing-logo-bw");
    let with_missing = RenderOptions {
        logo_path: Some(dir.join("does-not-exist.png")),
        ..Default::default()
    };
    let plain_path = dir.join("plain.png");
    let missing_path = dir.join("missing.png");
    assert!(generate(PAYLOAD, &plain_path, &RenderOptions::default()));
    assert!(generate(PAYLOAD, &missing_path, &with_missing));

    let bytes = fs::read(&missing_path).unwrap();
    assert_eq!(png_header(&bytes).0, png::ColorType::Indexed);
    assert_eq!(fs::read(&plain_path).unwrap(), bytes);
}

#[test]
fn test_corrupt_logo_is_not_fatal() {
    let dir = scratch("corrupt-logo");
    let logo = dir.join("logo.png");
    fs::write(&logo, b"definitely not a png").unwrap();
    let options = RenderOptions {
        foreground: Color::new(120, 0, 0),
        logo_path: Some(logo),
        ..Default::default()
    };
    assert!(generate(PAYLOAD, &dir.join("out.png"), &options));
}

#[test]
fn test_buffer_capacity_boundary() {
    let dir = scratch("buffer");
    let options = RenderOptions::default();
    let file = dir.join("file.png");
    assert!(generate(PAYLOAD, &file, &options));
    let expected = fs::read(&file).unwrap();

    let mut small = vec![0u8; expected.len() - 1];
    assert_eq!(generate_to_buffer(PAYLOAD, &mut small, &options), None);

    let mut exact = vec![0u8; expected.len()];
    assert_eq!(
        generate_to_buffer(PAYLOAD, &mut exact, &options),
        Some(expected.len())
    );
    assert_eq!(exact, expected);
}

#[test]
fn test_optimize_size_output_dimensions() {
    let modules = ModuleMatrix::encode(PAYLOAD, ErrorCorrection::Medium)
        .unwrap()
        .width() as u32;
    let options = RenderOptions {
        size: 310,
        optimize_size: true,
        ..Default::default()
    };
    let (_, _, width, height) = png_header(&render_bytes(PAYLOAD, &options).unwrap());
    assert_eq!(width, height);
    assert_eq!(width, 310_u32.div_ceil(modules) * modules);

    let exact = RenderOptions {
        size: modules * 12,
        optimize_size: true,
        ..Default::default()
    };
    let (_, _, width, _) = png_header(&render_bytes(PAYLOAD, &exact).unwrap());
    assert_eq!(width, modules * 12);
}

#[test]
fn test_too_long_payload_writes_nothing() {
    let dir = scratch("too-long");
    let path = dir.join("out.png");
    let data = vec![b'x'; 5000];
    let options = RenderOptions {
        error_level: ErrorCorrection::High,
        ..Default::default()
    };
    let err = try_generate(&data, &path, &options).unwrap_err();
    assert!(matches!(err, RenderError::Encode(_)));
    assert!(!path.exists());
}

#[test]
fn test_oversized_request_fails_cleanly() {
    let dir = scratch("oversized");
    let path = dir.join("out.png");
    let options = RenderOptions {
        size: u32::MAX,
        foreground: Color::new(255, 0, 0),
        ..Default::default()
    };
    assert!(!generate(b"x", &path, &options));
    assert!(!path.exists());

    let rounded = RenderOptions {
        optimize_size: true,
        ..options.clone()
    };
    let mut buffer = vec![0u8; 1024];
    assert_eq!(generate_to_buffer(b"x", &mut buffer, &rounded), None);
    assert!(matches!(
        render_bytes(b"x", &rounded),
        Err(RenderError::InvalidOption(_))
    ));
}

#[test]
fn test_unicode_payload_renders() {
    let bytes = render_bytes("こんにちは世界".as_bytes(), &RenderOptions::default()).unwrap();
    assert_eq!(png_header(&bytes).2, 300);
}

#[test]
fn test_jpeg_output() {
    let dir = scratch("jpeg");
    let path = dir.join("qr.jpg");
    let options = RenderOptions {
        format: OutputFormat::Jpeg,
        quality: 80,
        foreground: Color::new(200, 0, 0),
        ..Default::default()
    };
    assert!(generate(PAYLOAD, &path, &options));
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (300, 300));
}

#[test]
fn test_batch_writes_numbered_files() {
    let dir = scratch("batch").join("out");
    let items = ["first", "second", "third"];
    let report = generate_batch(&items, &dir, &RenderOptions::default()).unwrap();
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 0);
    for name in ["1.png", "2.png", "3.png"] {
        assert!(dir.join(name).is_file(), "{}", name);
    }
    // Each file equals the single render of the same item.
    assert_eq!(
        fs::read(dir.join("2.png")).unwrap(),
        render_bytes(b"second", &RenderOptions::default()).unwrap()
    );
}

#[test]
fn test_batch_reports_failures() {
    let dir = scratch("batch-fail");
    let too_long = "x".repeat(5000);
    let items = vec!["ok".to_string(), too_long, "also ok".to_string()];
    let options = RenderOptions {
        error_level: ErrorCorrection::High,
        ..Default::default()
    };
    let report = generate_batch(&items, &dir, &options).unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed_indices, vec![1]);
    assert!(!dir.join("2.png").exists());
}
