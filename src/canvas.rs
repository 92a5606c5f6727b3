//! Depth-tagged pixel buffers.

use image::{GrayImage, RgbImage};

use crate::pipeline::PixelDepth;

/// A square 1-bit bitmap, 8 pixels per byte, most significant bit first.
/// A set bit is a dark (foreground) pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    size: u32,
    stride: usize,
    data: Vec<u8>,
}

impl PackedBitmap {
    /// Creates an all-light bitmap of `size`×`size` pixels.
    pub fn new(size: u32) -> Self {
        let stride = (size as usize).div_ceil(8);
        PackedBitmap {
            size,
            stride,
            data: vec![0u8; stride * size as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Bytes per row: `ceil(size / 8)`.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        let byte = self.data[y as usize * self.stride + (x as usize >> 3)];
        byte & (0x80 >> (x & 7)) != 0
    }

    pub fn set(&mut self, x: u32, y: u32, dark: bool) {
        let byte = &mut self.data[y as usize * self.stride + (x as usize >> 3)];
        let mask = 0x80 >> (x & 7);
        if dark {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Packed rows, top to bottom.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Widens to 8-bit luminance: dark = 0, light = 255.
    pub fn to_luma8(&self) -> GrayImage {
        GrayImage::from_fn(self.size, self.size, |x, y| {
            image::Luma([if self.get(x, y) { 0 } else { 255 }])
        })
    }
}

/// The render target. Its variant is fixed by the pipeline for the whole render.
#[derive(Debug, Clone, PartialEq)]
pub enum Canvas {
    Indexed(PackedBitmap),
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl Canvas {
    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        match self {
            Canvas::Indexed(bitmap) => bitmap.size(),
            Canvas::Gray(img) => img.width(),
            Canvas::Rgb(img) => img.width(),
        }
    }

    pub fn depth(&self) -> PixelDepth {
        match self {
            Canvas::Indexed(_) => PixelDepth::Indexed1,
            Canvas::Gray(_) => PixelDepth::Gray8,
            Canvas::Rgb(_) => PixelDepth::Rgb8,
        }
    }

    /// Raw buffer as stored: packed bits, luminance bytes or interleaved RGB.
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Canvas::Indexed(bitmap) => bitmap.as_raw(),
            Canvas::Gray(img) => img.as_raw(),
            Canvas::Rgb(img) => img.as_raw(),
        }
    }

    /// Pixel at (x, y) as RGB, for inspection.
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        match self {
            Canvas::Indexed(bitmap) => {
                let v = if bitmap.get(x, y) { 0 } else { 255 };
                [v, v, v]
            }
            Canvas::Gray(img) => {
                let v = img.get_pixel(x, y).0[0];
                [v, v, v]
            }
            Canvas::Rgb(img) => img.get_pixel(x, y).0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_stride_rounds_up() {
        assert_eq!(PackedBitmap::new(8).stride(), 1);
        assert_eq!(PackedBitmap::new(9).stride(), 2);
        assert_eq!(PackedBitmap::new(21).stride(), 3);
        assert_eq!(PackedBitmap::new(21).as_raw().len(), 3 * 21);
    }

    #[test]
    fn test_packed_bits_are_msb_first() {
        let mut bitmap = PackedBitmap::new(10);
        bitmap.set(0, 0, true);
        bitmap.set(9, 0, true);
        bitmap.set(3, 1, true);
        assert_eq!(&bitmap.as_raw()[0..2], &[0b1000_0000, 0b0100_0000]);
        assert_eq!(bitmap.as_raw()[2], 0b0001_0000);
        assert!(bitmap.get(3, 1));

        bitmap.set(3, 1, false);
        assert!(!bitmap.get(3, 1));
    }

    #[test]
    fn test_widen_to_luma() {
        let mut bitmap = PackedBitmap::new(3);
        bitmap.set(1, 2, true);
        let gray = bitmap.to_luma8();
        assert_eq!(gray.get_pixel(1, 2).0, [0]);
        assert_eq!(gray.get_pixel(0, 0).0, [255]);
    }

    #[test]
    fn test_canvas_accessors() {
        let canvas = Canvas::Rgb(RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3])));
        assert_eq!(canvas.size(), 4);
        assert_eq!(canvas.depth(), PixelDepth::Rgb8);
        assert_eq!(canvas.as_raw().len(), 48);
        assert_eq!(canvas.rgb_at(3, 3), [1, 2, 3]);

        let canvas = Canvas::Indexed(PackedBitmap::new(4));
        assert_eq!(canvas.rgb_at(0, 0), [255, 255, 255]);
    }
}
