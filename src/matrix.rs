//! Module matrix source.
//!
//! Wraps the `qrcode` encoder and exposes the finished symbol as an immutable
//! N×N grid of booleans (`true` = dark module = foreground).

use qrcode::bits::Bits;
use qrcode::{EcLevel, QrCode, Version};

use crate::error::RenderError;
use crate::options::ErrorCorrection;

/// Largest normal QR version.
const MAX_VERSION: i16 = 40;

/// An immutable square grid of modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Encodes `data` into a QR symbol.
    ///
    /// Pure ASCII payloads use the encoder's optimal segmentation (numeric and
    /// alphanumeric runs pack denser). Anything containing a byte above 0x7F is
    /// encoded as one 8-bit byte segment so the bytes are stored untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] when the payload does not fit in any
    /// version at the requested level.
    pub fn encode(data: &[u8], level: ErrorCorrection) -> Result<Self, RenderError> {
        let ec: EcLevel = level.into();
        let code = if data.is_ascii() {
            QrCode::with_error_correction_level(data, ec)
                .map_err(|e| RenderError::Encode(e.to_string()))?
        } else {
            encode_bytes(data, ec)?
        };

        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        log::debug!("encoded {} bytes into a {}x{} symbol", data.len(), width, width);
        Ok(ModuleMatrix { width, modules })
    }

    /// Builds a matrix from row-major module values.
    pub fn from_modules(width: usize, modules: Vec<bool>) -> Result<Self, RenderError> {
        if width == 0 || modules.len() != width * width {
            return Err(RenderError::InvalidOption(format!(
                "module grid of {} cells is not {}x{}",
                modules.len(),
                width,
                width
            )));
        }
        Ok(ModuleMatrix { width, modules })
    }

    /// Number of modules along one edge.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns whether the module at (x, y) is dark. Out-of-range
    /// coordinates are light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// One row of modules, left to right.
    pub fn row(&self, y: usize) -> &[bool] {
        &self.modules[y * self.width..(y + 1) * self.width]
    }
}

/// Finds the smallest version holding `data` as a single byte segment.
fn encode_bytes(data: &[u8], ec: EcLevel) -> Result<QrCode, RenderError> {
    for version in 1..=MAX_VERSION {
        let mut bits = Bits::new(Version::Normal(version));
        if bits.push_byte_data(data).is_err() || bits.push_terminator(ec).is_err() {
            continue;
        }
        return QrCode::with_bits(bits, ec).map_err(|e| RenderError::Encode(e.to_string()));
    }
    Err(RenderError::Encode(format!(
        "{} bytes do not fit in any QR version at level {:?}",
        data.len(),
        ec
    )))
}
