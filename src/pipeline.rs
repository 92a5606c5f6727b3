//! Pipeline selection.
//!
//! Picks the cheapest pixel depth that can still represent what was asked
//! for. The precedence is fixed:
//!
//! 1. black on white, no logo: [`Pipeline::Indexed`] (1-bit palette)
//! 2. black on white with a logo: [`Pipeline::MonochromeLogo`] (24-bit, the
//!    logo may carry color)
//! 3. both colors gray: [`Pipeline::Grayscale`] (8-bit)
//! 4. anything else: [`Pipeline::FullColor`] (24-bit)

use crate::options::RenderOptions;

/// Storage depth of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelDepth {
    /// 1 bit per pixel, 8 pixels per byte, MSB first
    Indexed1,
    /// 8-bit luminance
    Gray8,
    /// 8 bits per channel RGB
    Rgb8,
}

/// The four rendering pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    Indexed,
    MonochromeLogo,
    Grayscale,
    FullColor,
}

impl Pipeline {
    /// Chooses the pipeline for `options`. Pure function of the colors and
    /// whether a logo is set.
    pub fn select(options: &RenderOptions) -> Self {
        Self::choose(options, options.logo().is_some())
    }

    /// Like [`Pipeline::select`], with logo presence decided by the caller.
    /// The renderer passes whether the logo actually loaded, so a broken logo
    /// renders exactly like no logo.
    pub fn choose(options: &RenderOptions, has_logo: bool) -> Self {
        let black_on_white = options.is_black_on_white();

        let pipeline = if black_on_white && !has_logo {
            Pipeline::Indexed
        } else if black_on_white {
            Pipeline::MonochromeLogo
        } else if options.foreground.is_gray() && options.background.is_gray() {
            Pipeline::Grayscale
        } else {
            Pipeline::FullColor
        };
        log::debug!("selected {:?} pipeline", pipeline);
        pipeline
    }

    pub fn depth(self) -> PixelDepth {
        match self {
            Pipeline::Indexed => PixelDepth::Indexed1,
            Pipeline::Grayscale => PixelDepth::Gray8,
            Pipeline::MonochromeLogo | Pipeline::FullColor => PixelDepth::Rgb8,
        }
    }
}
