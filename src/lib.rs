//! # qiraster
//!
//! A Rust library for turning QR codes into raster images quickly.
//!
//! `qiraster` encodes text or binary data into a QR symbol and renders it at any pixel size,
//! in any foreground/background color, optionally with a logo composited at the center. The
//! pixel depth of the output is picked from the request so that the common case stays cheap:
//! black-on-white codes are written as 1-bit palette PNGs, gray palettes as 8-bit grayscale,
//! and only true color requests pay for 24-bit RGB.
//!
//! ## Features
//!
//! - Four error correction levels: Low, Medium, Quartile, High.
//! - Integer scaling by row replication, nearest-neighbour fallback for any other size.
//! - Optional size optimization that rounds the output up to a whole number of pixels per module.
//! - Logo overlay with alpha blending, resized to a percentage of the symbol.
//! - PNG (1/8/24-bit), JPEG, BMP, TIFF and WebP output, to a file or to memory.
//! - Parallel batch rendering.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qiraster = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Generate an orange QR code with a logo:
//!
//! ```no_run
//! use qiraster::{generate, Color, ErrorCorrection, RenderOptions};
//! use std::path::{Path, PathBuf};
//!
//! let options = RenderOptions {
//!     size: 600,
//!     foreground: Color::new(255, 165, 0),
//!     error_level: ErrorCorrection::High,
//!     logo_path: Some(PathBuf::from("logo.png")),
//!     logo_size_percent: 25,
//!     ..Default::default()
//! };
//! assert!(generate(b"https://example.com", Path::new("styled_qr.png"), &options));
//! ```
//!
//! Render into memory:
//!
//! ```rust
//! use qiraster::{render_bytes, RenderOptions};
//!
//! let png = render_bytes(b"Hello, World!", &RenderOptions::default()).unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```
//!
//! ## Modules
//!
//! - [`options`]: Render options, colors, levels and formats.
//! - [`matrix`]: QR encoding into a module matrix.
//! - [`pipeline`]: Choosing the output depth.
//! - [`scale`]: Module matrix to pixels.
//! - [`logo`]: Logo compositing.
//! - [`writer`]: Image encoding backends.
//! - [`render`]: Entry points.

pub mod canvas;
pub mod error;
pub mod logo;
pub mod matrix;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod scale;
pub mod writer;

pub use canvas::Canvas;
pub use error::RenderError;
pub use options::{Color, ErrorCorrection, OutputFormat, RenderOptions};
pub use pipeline::{Pipeline, PixelDepth};
pub use render::{
    generate, generate_batch, generate_to_buffer, render_bytes, render_canvas, try_generate,
    try_generate_to_buffer, version, BatchReport,
};
