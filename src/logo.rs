//! Logo compositing.
//!
//! The logo is decoded, resized with nearest-neighbour sampling so its longer
//! edge is `logo_size_percent` of the canvas edge, and drawn at the center.
//! Logos with alpha are blended, others replace the covered pixels.

use std::path::Path;

use image::DynamicImage;

use crate::canvas::Canvas;
use crate::error::RenderError;

/// A decoded logo: 1 (gray), 3 (RGB) or 4 (RGBA) interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl LogoBuffer {
    /// Decodes the image file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Logo`] if the file is missing or cannot be decoded.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let img = image::open(path)
            .map_err(|e| RenderError::Logo(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_dynamic(img))
    }

    /// Normalizes any decoded image to 1, 3 or 4 channels of 8 bits.
    /// Gray with alpha is widened to RGBA so the alpha survives.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let color = img.color();
        let (pixels, channels) = if color.has_alpha() {
            (img.into_rgba8().into_raw(), 4)
        } else if color.has_color() {
            (img.into_rgb8().into_raw(), 3)
        } else {
            (img.into_luma8().into_raw(), 1)
        };
        LogoBuffer {
            pixels,
            width,
            height,
            channels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let ch = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * ch;
        &self.pixels[start..start + ch]
    }

    /// Nearest-neighbour resize to `width`×`height`.
    pub fn resize_nearest(&self, width: u32, height: u32) -> LogoBuffer {
        let ch = self.channels as usize;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * ch);
        for y in 0..height {
            let src_y = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let src_x = (x as u64 * self.width as u64 / width as u64) as u32;
                pixels.extend_from_slice(self.pixel(src_x, src_y));
            }
        }
        LogoBuffer {
            pixels,
            width,
            height,
            channels: self.channels,
        }
    }
}

/// Target logo size on a `canvas_size` canvas. The longer source edge becomes
/// `canvas_size * percent / 100`; the shorter one keeps the aspect ratio.
pub fn logo_dimensions(src_width: u32, src_height: u32, canvas_size: u32, percent: u8) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (0, 0);
    }
    let target = canvas_size as u64 * percent as u64 / 100;
    let (w, h) = (src_width as u64, src_height as u64);
    if w > h {
        (target as u32, (h * target / w) as u32)
    } else {
        ((w * target / h) as u32, target as u32)
    }
}

/// Draws `logo` centered on `canvas`, sized to `percent` of the edge.
/// Pixels that would land outside the canvas are skipped.
///
/// # Arguments
///
/// * `canvas` - A gray or RGB canvas. A 1-bit canvas is left unchanged.
/// * `logo` - The decoded logo, alpha-blended when it has an alpha channel.
/// * `percent` - The logo's longer edge as a percentage of the canvas edge.
///
/// # Example
///
/// ```rust
/// use image::{Rgb, RgbImage, Rgba, RgbaImage, DynamicImage};
/// use qiraster::canvas::Canvas;
/// use qiraster::logo::{overlay, LogoBuffer};
///
/// let mut canvas = Canvas::Rgb(RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])));
/// let logo = LogoBuffer::from_dynamic(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
///     4, 4, Rgba([255, 0, 0, 255]),
/// )));
/// overlay(&mut canvas, &logo, 20);
/// assert_eq!(canvas.rgb_at(50, 50), [255, 0, 0]);
/// assert_eq!(canvas.rgb_at(0, 0), [255, 255, 255]);
/// ```
pub fn overlay(canvas: &mut Canvas, logo: &LogoBuffer, percent: u8) {
    let size = canvas.size();
    let (w, h) = logo_dimensions(logo.width, logo.height, size, percent);
    if w == 0 || h == 0 {
        log::debug!("logo scaled to nothing at {}% of {}px, skipped", percent, size);
        return;
    }
    let resized = logo.resize_nearest(w, h);
    let start_x = (size as i64 - w as i64).div_euclid(2);
    let start_y = (size as i64 - h as i64).div_euclid(2);
    log::debug!("placing {}x{} logo at ({}, {})", w, h, start_x, start_y);

    match canvas {
        Canvas::Gray(img) => blend_into::<1>(img, size, &resized, start_x, start_y),
        Canvas::Rgb(img) => blend_into::<3>(img, size, &resized, start_x, start_y),
        Canvas::Indexed(_) => log::warn!("1-bit canvas cannot hold a logo, skipped"),
    }
}

/// Loads the logo at `path`. A logo that cannot be loaded is reported and
/// `None` returned; rendering carries on without it.
pub fn load_logo(path: &Path) -> Option<LogoBuffer> {
    match LogoBuffer::load(path) {
        Ok(logo) => Some(logo),
        Err(e) => {
            log::warn!("{}; rendering without logo", e);
            None
        }
    }
}

fn blend_into<const C: usize>(
    buf: &mut [u8],
    size: u32,
    logo: &LogoBuffer,
    start_x: i64,
    start_y: i64,
) {
    let size = size as i64;
    for y in 0..logo.height {
        let dst_y = start_y + y as i64;
        if dst_y < 0 || dst_y >= size {
            continue;
        }
        for x in 0..logo.width {
            let dst_x = start_x + x as i64;
            if dst_x < 0 || dst_x >= size {
                continue;
            }
            let src = logo.pixel(x, y);
            let color: [u8; C] = convert_channels(src);
            let idx = (dst_y * size + dst_x) as usize * C;
            let dst = &mut buf[idx..idx + C];

            if logo.has_alpha() {
                let alpha = src[3] as f32 / 255.0;
                for (d, &l) in dst.iter_mut().zip(&color) {
                    *d = (l as f32 * alpha + *d as f32 * (1.0 - alpha)) as u8;
                }
            } else {
                dst.copy_from_slice(&color);
            }
        }
    }
}

/// RGB is averaged down to gray; gray is broadcast up to RGB.
fn convert_channels<const C: usize>(src: &[u8]) -> [u8; C] {
    let mut out = [0u8; C];
    let has_color = src.len() >= 3;
    if C == 1 {
        out[0] = if has_color {
            ((src[0] as u16 + src[1] as u16 + src[2] as u16) / 3) as u8
        } else {
            src[0]
        };
    } else {
        for (c, slot) in out.iter_mut().enumerate() {
            *slot = if has_color { src[c] } else { src[0] };
        }
    }
    out
}
