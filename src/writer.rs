//! Encoding a finished canvas.
//!
//! Two backends share one contract:
//!
//! - [`encode_png`] drives the `png` crate directly. It keeps the canvas depth
//!   as is, including 1-bit palette output, and favours speed (fast
//!   compression, no row filtering).
//! - [`encode_with_image`] goes through the `image` codecs for the other
//!   formats. A 1-bit canvas is widened to 8-bit gray for them since none can
//!   store packed bits; gray and RGB canvases pass through unchanged.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::options::OutputFormat;

/// Palette for 1-bit output: index 0 is light, index 1 is dark.
const MONO_PALETTE: [u8; 6] = [255, 255, 255, 0, 0, 0];

const FILE_BUFFER_SIZE: usize = 64 * 1024;

/// Encodes `canvas` as `format` into `sink`. `quality` only affects lossy formats.
pub fn encode<W: Write + Seek>(
    canvas: &Canvas,
    format: OutputFormat,
    quality: u8,
    sink: &mut W,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Png => encode_png(canvas, sink),
        other => encode_with_image(canvas, other, quality, sink),
    }
}

/// Writes a PNG whose color type and bit depth mirror the canvas.
pub fn encode_png<W: Write>(canvas: &Canvas, sink: W) -> Result<(), RenderError> {
    let size = canvas.size();
    let mut encoder = png::Encoder::new(sink, size, size);
    match canvas {
        Canvas::Indexed(_) => {
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::One);
            encoder.set_palette(&MONO_PALETTE[..]);
        }
        Canvas::Gray(_) => {
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
        }
        Canvas::Rgb(_) => {
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
        }
    }
    encoder.set_compression(png::Compression::Fast);
    encoder.set_filter(png::FilterType::NoFilter);
    encoder.set_adaptive_filter(png::AdaptiveFilterType::NonAdaptive);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(canvas.as_raw())?;
    writer.finish()?;
    Ok(())
}

/// Encodes through the `image` crate codecs.
pub fn encode_with_image<W: Write + Seek>(
    canvas: &Canvas,
    format: OutputFormat,
    quality: u8,
    sink: &mut W,
) -> Result<(), RenderError> {
    let size = canvas.size();
    let widened;
    let (buf, color): (&[u8], ExtendedColorType) = match canvas {
        Canvas::Indexed(bitmap) => {
            widened = bitmap.to_luma8();
            (widened.as_raw(), ExtendedColorType::L8)
        }
        Canvas::Gray(img) => (img.as_raw(), ExtendedColorType::L8),
        Canvas::Rgb(img) => (img.as_raw(), ExtendedColorType::Rgb8),
    };

    match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut *sink, quality).write_image(buf, size, size, color)?
        }
        OutputFormat::Png => PngEncoder::new_with_quality(
            &mut *sink,
            CompressionType::Fast,
            image::codecs::png::FilterType::NoFilter,
        )
        .write_image(buf, size, size, color)?,
        OutputFormat::Bmp => {
            image::write_buffer_with_format(sink, buf, size, size, color, ImageFormat::Bmp)?
        }
        OutputFormat::Tiff => {
            image::write_buffer_with_format(sink, buf, size, size, color, ImageFormat::Tiff)?
        }
        OutputFormat::WebP => {
            image::write_buffer_with_format(sink, buf, size, size, color, ImageFormat::WebP)?
        }
    }
    Ok(())
}

/// Encodes `canvas` into the file at `path`, creating or truncating it.
///
/// The file handle is released on every exit path. If encoding fails after
/// the file was created, the partial file is removed.
///
/// # Arguments
///
/// * `path` - The file to write. Its parent directory must exist.
/// * `canvas` - The finished canvas.
/// * `format` - The container format; PNG keeps the canvas depth.
/// * `quality` - JPEG quality (1..=100), ignored by the other formats.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be created or flushed, and
/// [`RenderError::Png`] or [`RenderError::Image`] if encoding fails.
///
/// # Example
///
/// ```no_run
/// use qiraster::canvas::{Canvas, PackedBitmap};
/// use qiraster::writer::write_file;
/// use qiraster::OutputFormat;
/// use std::path::Path;
///
/// let canvas = Canvas::Indexed(PackedBitmap::new(64));
/// write_file(Path::new("blank.png"), &canvas, OutputFormat::Png, 95).unwrap();
/// ```
pub fn write_file(
    path: &Path,
    canvas: &Canvas,
    format: OutputFormat,
    quality: u8,
) -> Result<(), RenderError> {
    let file = File::create(path)?;
    let mut sink = BufWriter::with_capacity(FILE_BUFFER_SIZE, file);
    let result = encode(canvas, format, quality, &mut sink)
        .and_then(|()| sink.flush().map_err(RenderError::from));

    if let Err(e) = result {
        drop(sink);
        if let Err(rm) = fs::remove_file(path) {
            log::debug!("could not remove partial {}: {}", path.display(), rm);
        }
        return Err(e);
    }
    Ok(())
}
