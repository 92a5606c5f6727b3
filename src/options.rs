//! Render options.
//!
//! [`RenderOptions`] is a plain value type. Build it with struct-update syntax:
//!
//! ```rust
//! use qiraster::options::{Color, ErrorCorrection, RenderOptions};
//!
//! let options = RenderOptions {
//!     size: 500,
//!     foreground: Color::new(255, 0, 0),
//!     error_level: ErrorCorrection::High,
//!     ..Default::default()
//! };
//! assert!(options.validate().is_ok());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::RenderError;

/// Largest accepted output edge, in pixels.
pub const MAX_SIZE: u32 = 10_000;

/// An RGB color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// True when all three channels are equal, i.e. the color carries no hue.
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Parses `"R,G,B"` with each channel in 0..=255.
impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidOption(format!("invalid color '{}', expected R,G,B", s));
        let channels: Vec<&str> = s.split(',').map(str::trim).collect();
        if channels.len() != 3 {
            return Err(invalid());
        }
        let mut rgb = [0u8; 3];
        for (slot, text) in rgb.iter_mut().zip(&channels) {
            *slot = text.parse::<u8>().map_err(|_| invalid())?;
        }
        Ok(Color::new(rgb[0], rgb[1], rgb[2]))
    }
}

/// QR error correction level, lowest to highest redundancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCorrection {
    /// ~7% of codewords recoverable
    Low,
    /// ~15%
    #[default]
    Medium,
    /// ~25%
    Quartile,
    /// ~30%
    High,
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrection::Low),
            "m" | "medium" => Ok(ErrorCorrection::Medium),
            "q" | "quartile" => Ok(ErrorCorrection::Quartile),
            "h" | "high" => Ok(ErrorCorrection::High),
            _ => Err(RenderError::InvalidOption(format!(
                "invalid error level '{}', expected L, M, Q or H",
                s
            ))),
        }
    }
}

/// Container format of the written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Tiff,
    WebP,
}

impl OutputFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::WebP => "webp",
        }
    }

    /// Infers the format from a file extension. Returns `None` for unknown
    /// or missing extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "bmp" => Ok(OutputFormat::Bmp),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(RenderError::InvalidOption(format!("unsupported format '{}'", s))),
        }
    }
}

/// Options controlling one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Requested edge length of the square output, in pixels.
    pub size: u32,
    /// Round `size` up to the next multiple of the symbol width so every
    /// module maps to a whole number of pixels.
    pub optimize_size: bool,
    /// Color of dark modules.
    pub foreground: Color,
    /// Color of light modules.
    pub background: Color,
    pub error_level: ErrorCorrection,
    /// Logo drawn at the center of the symbol. An empty path means no logo.
    pub logo_path: Option<PathBuf>,
    /// Logo's longer edge as a percentage of the output edge (1..=50).
    pub logo_size_percent: u8,
    pub format: OutputFormat,
    /// Encoder quality for lossy formats (1..=100).
    pub quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            size: 300,
            optimize_size: false,
            foreground: Color::BLACK,
            background: Color::WHITE,
            error_level: ErrorCorrection::Medium,
            logo_path: None,
            logo_size_percent: 20,
            format: OutputFormat::Png,
            quality: 95,
        }
    }
}

impl RenderOptions {
    /// Returns the logo path if one is set and non-empty.
    pub fn logo(&self) -> Option<&Path> {
        self.logo_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// True for the default black-on-white palette.
    pub fn is_black_on_white(&self) -> bool {
        self.foreground == Color::BLACK && self.background == Color::WHITE
    }

    /// Checks every field against its documented range.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.size == 0 {
            return Err(RenderError::InvalidOption("size must be positive".into()));
        }
        if self.size > MAX_SIZE {
            return Err(RenderError::InvalidOption(format!(
                "size must be at most {}, got {}",
                MAX_SIZE, self.size
            )));
        }
        if !(1..=50).contains(&self.logo_size_percent) {
            return Err(RenderError::InvalidOption(format!(
                "logo size must be between 1 and 50, got {}",
                self.logo_size_percent
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(RenderError::InvalidOption(format!(
                "quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Edge length of the canvas for a symbol `modules` wide.
    pub fn final_size(&self, modules: usize) -> Result<u32, RenderError> {
        final_size(self.size, self.optimize_size, modules)
    }
}

/// Applies the optimize-size policy: round up to the next multiple of
/// `modules`, never down. The result is never smaller than `modules`, so
/// every module gets at least one pixel.
///
/// # Errors
///
/// Returns [`RenderError::InvalidOption`] if the rounded size does not fit
/// in a `u32`.
pub fn final_size(requested: u32, optimize_size: bool, modules: usize) -> Result<u32, RenderError> {
    let overflow = || RenderError::InvalidOption(format!("size {} is too large", requested));
    let modules = u32::try_from(modules).map_err(|_| overflow())?;
    let size = if optimize_size && modules > 0 {
        requested
            .div_ceil(modules)
            .checked_mul(modules)
            .ok_or_else(overflow)?
    } else {
        requested
    };
    if size < modules {
        log::warn!(
            "requested size {}px is below the symbol width, using {}px",
            requested,
            modules
        );
        return Ok(modules);
    }
    Ok(size)
}
