//! Scaling a module matrix onto a pixel canvas.
//!
//! When the canvas edge is an exact multiple of the symbol width, each module
//! row is expanded once into a template row and the template is block-copied
//! `scale` times. Otherwise every pixel samples its nearest module with
//! `floor(x * N / size)`; modules are binary so there is nothing to interpolate.

use image::{GrayImage, RgbImage};

use crate::canvas::{Canvas, PackedBitmap};
use crate::matrix::ModuleMatrix;
use crate::options::RenderOptions;
use crate::pipeline::{Pipeline, PixelDepth};

/// Renders `matrix` onto a fresh `size`×`size` canvas at the depth chosen by
/// `pipeline`, using the colors in `options`.
pub fn rasterize(
    matrix: &ModuleMatrix,
    size: u32,
    pipeline: Pipeline,
    options: &RenderOptions,
) -> Canvas {
    let integer = size as usize % matrix.width() == 0;
    log::debug!(
        "scaling {}x{} modules to {}px ({})",
        matrix.width(),
        matrix.width(),
        size,
        if integer { "integer" } else { "nearest-neighbour" }
    );

    match pipeline.depth() {
        PixelDepth::Indexed1 => Canvas::Indexed(scale_packed(matrix, size)),
        PixelDepth::Gray8 => {
            // Grayscale colors have r == g == b.
            let mut img = GrayImage::new(size, size);
            fill(
                &mut img,
                matrix,
                size,
                [options.foreground.r],
                [options.background.r],
            );
            Canvas::Gray(img)
        }
        PixelDepth::Rgb8 => {
            let mut img = RgbImage::new(size, size);
            fill(
                &mut img,
                matrix,
                size,
                options.foreground.to_rgb(),
                options.background.to_rgb(),
            );
            Canvas::Rgb(img)
        }
    }
}

/// Fills a byte-addressed buffer of `C` channels per pixel.
fn fill<const C: usize>(
    buf: &mut [u8],
    matrix: &ModuleMatrix,
    size: u32,
    dark: [u8; C],
    light: [u8; C],
) {
    let n = matrix.width();
    let size = size as usize;
    let stride = size * C;

    if size % n == 0 {
        let scale = size / n;
        let mut row = vec![0u8; stride];
        for src_y in 0..n {
            for (src_x, &is_dark) in matrix.row(src_y).iter().enumerate() {
                let color = if is_dark { dark } else { light };
                let start = src_x * scale * C;
                for px in row[start..start + scale * C].chunks_exact_mut(C) {
                    px.copy_from_slice(&color);
                }
            }
            replicate_row(buf, &row, src_y * scale, scale, stride);
        }
    } else {
        for (y, dst) in buf.chunks_exact_mut(stride).enumerate() {
            let src_row = matrix.row(y * n / size);
            for (x, px) in dst.chunks_exact_mut(C).enumerate() {
                let color = if src_row[x * n / size] { dark } else { light };
                px.copy_from_slice(&color);
            }
        }
    }
}

fn scale_packed(matrix: &ModuleMatrix, size: u32) -> PackedBitmap {
    let mut bitmap = PackedBitmap::new(size);
    let n = matrix.width();
    let stride = bitmap.stride();

    if size as usize % n == 0 {
        let scale = size as usize / n;
        let mut row = vec![0u8; stride];
        let data = bitmap.as_raw_mut();
        for src_y in 0..n {
            row.fill(0);
            for (src_x, &is_dark) in matrix.row(src_y).iter().enumerate() {
                if !is_dark {
                    continue;
                }
                for dst_x in src_x * scale..(src_x + 1) * scale {
                    row[dst_x >> 3] |= 0x80 >> (dst_x & 7);
                }
            }
            replicate_row(data, &row, src_y * scale, scale, stride);
        }
    } else {
        let n32 = n as u64;
        let size64 = size as u64;
        for y in 0..size {
            let src_row = matrix.row((y as u64 * n32 / size64) as usize);
            for x in 0..size {
                if src_row[(x as u64 * n32 / size64) as usize] {
                    bitmap.set(x, y, true);
                }
            }
        }
    }
    bitmap
}

/// Writes `row` at `dst_y` and block-copies it into the next `count - 1` rows.
fn replicate_row(buf: &mut [u8], row: &[u8], dst_y: usize, count: usize, stride: usize) {
    let first = dst_y * stride;
    buf[first..first + stride].copy_from_slice(row);
    for dy in 1..count {
        buf.copy_within(first..first + stride, first + dy * stride);
    }
}
