//! Render entry points.
//!
//! Each render runs single-threaded from payload to encoded bytes:
//!
//! ```text
//! data ─► ModuleMatrix ─► load logo ─► Pipeline::choose ─► rasterize ─► overlay ─► encode
//! ```
//!
//! Renders share nothing but the read-only options, so [`generate_batch`]
//! fans them out over rayon's pool without locking.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::logo;
use crate::matrix::ModuleMatrix;
use crate::options::RenderOptions;
use crate::pipeline::Pipeline;
use crate::scale;
use crate::writer;

/// Returns the library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Builds the final canvas for `data`: encode, pick a pipeline, scale and
/// composite the logo if there is one. An unreadable logo is logged and
/// skipped.
pub fn render_canvas(data: &[u8], options: &RenderOptions) -> Result<Canvas, RenderError> {
    options.validate()?;
    let matrix = ModuleMatrix::encode(data, options.error_level)?;
    let size = options.final_size(matrix.width())?;

    // Decoded up front: a logo that fails to load must not change the depth.
    let decoded = options.logo().and_then(logo::load_logo);
    let pipeline = Pipeline::choose(options, decoded.is_some());
    let mut canvas = scale::rasterize(&matrix, size, pipeline, options);

    if let Some(mark) = &decoded {
        logo::overlay(&mut canvas, mark, options.logo_size_percent);
    }
    Ok(canvas)
}

/// Renders `data` and returns the encoded image bytes.
pub fn render_bytes(data: &[u8], options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
    let canvas = render_canvas(data, options)?;
    let mut out = Cursor::new(Vec::new());
    writer::encode(&canvas, options.format, options.quality, &mut out)?;
    Ok(out.into_inner())
}

/// Renders `data` into the file at `output_path`.
///
/// Nothing is created on disk if the payload cannot be encoded.
pub fn try_generate(
    data: &[u8],
    output_path: &Path,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let canvas = render_canvas(data, options)?;
    writer::write_file(output_path, &canvas, options.format, options.quality)
}

/// Renders `data` into the file at `output_path`. Returns `false` on failure,
/// after logging the reason.
///
/// # Arguments
///
/// * `data` - The payload to encode. Non-ASCII bytes are stored as 8-bit data.
/// * `output_path` - The file to create or overwrite.
/// * `options` - Size, colors, error correction, logo and output format.
///
/// # Errors
///
/// Never panics on bad input. An invalid option, an oversized payload or a
/// write failure is logged and reported as `false`; see [`try_generate`] for
/// the error itself.
///
/// # Example
///
/// ```no_run
/// use qiraster::{generate, RenderOptions};
/// use std::path::Path;
///
/// let ok = generate(b"https://example.com", Path::new("qr.png"), &RenderOptions::default());
/// assert!(ok);
/// ```
pub fn generate(data: &[u8], output_path: &Path, options: &RenderOptions) -> bool {
    match try_generate(data, output_path, options) {
        Ok(()) => true,
        Err(e) => {
            log::error!("failed to generate {}: {}", output_path.display(), e);
            false
        }
    }
}

/// Renders `data` into `buffer` and returns the number of bytes written.
///
/// # Errors
///
/// [`RenderError::Capacity`] if the encoded image is larger than `buffer`;
/// `buffer` is left untouched in that case.
pub fn try_generate_to_buffer(
    data: &[u8],
    buffer: &mut [u8],
    options: &RenderOptions,
) -> Result<usize, RenderError> {
    let bytes = render_bytes(data, options)?;
    if bytes.len() > buffer.len() {
        return Err(RenderError::Capacity {
            needed: bytes.len(),
            capacity: buffer.len(),
        });
    }
    buffer[..bytes.len()].copy_from_slice(&bytes);
    Ok(bytes.len())
}

/// Renders `data` into `buffer`. Returns the number of bytes written, or
/// `None` on any failure including insufficient capacity.
///
/// # Arguments
///
/// * `data` - The payload to encode.
/// * `buffer` - Destination for the encoded image. Bytes past the returned
///   length are left as they were.
/// * `options` - The same options [`generate`] takes.
///
/// # Errors
///
/// Failures are logged and reported as `None`; `buffer` is not modified.
/// Use [`try_generate_to_buffer`] to get the [`RenderError`].
///
/// # Example
///
/// ```rust
/// use qiraster::{generate_to_buffer, RenderOptions};
///
/// let mut buffer = vec![0u8; 64 * 1024];
/// let written = generate_to_buffer(b"Hello", &mut buffer, &RenderOptions::default()).unwrap();
/// assert_eq!(&buffer[1..4], b"PNG");
/// assert!(written > 0);
/// ```
pub fn generate_to_buffer(data: &[u8], buffer: &mut [u8], options: &RenderOptions) -> Option<usize> {
    match try_generate_to_buffer(data, buffer, options) {
        Ok(n) => Some(n),
        Err(e) => {
            log::error!("failed to generate into buffer: {}", e);
            None
        }
    }
}

/// Outcome of [`generate_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Zero-based indices of the items that failed, ascending.
    pub failed_indices: Vec<usize>,
}

impl BatchReport {
    /// Turns a report with failures into [`RenderError::Batch`].
    pub fn into_result(self) -> Result<BatchReport, RenderError> {
        if self.failed == 0 {
            return Ok(self);
        }
        Err(RenderError::Batch {
            failed: self.failed,
            total: self.succeeded + self.failed,
            lines: self.failed_indices.iter().map(|i| i + 1).collect(),
        })
    }
}

/// Output path of the `index`-th (zero-based) batch item: `{index + 1}.{ext}`.
pub fn batch_output_path(out_dir: &Path, index: usize, options: &RenderOptions) -> PathBuf {
    out_dir.join(format!("{}.{}", index + 1, options.format.extension()))
}

/// Renders every item into `out_dir` in parallel. Item `i` goes to
/// `out_dir/{i + 1}.{ext}`.
///
/// # Arguments
///
/// * `items` - The payloads, in output order.
/// * `out_dir` - The directory receiving the files. Created if missing.
/// * `options` - Shared by every item; `format` picks the file extension.
///
/// # Errors
///
/// Only failing to create `out_dir` is an error; per-item failures are
/// counted in the report.
///
/// # Example
///
/// ```no_run
/// use qiraster::{generate_batch, RenderOptions};
/// use std::path::Path;
///
/// let report = generate_batch(&["one", "two"], Path::new("out"), &RenderOptions::default()).unwrap();
/// assert_eq!(report.succeeded, 2);
/// ```
pub fn generate_batch<T>(
    items: &[T],
    out_dir: &Path,
    options: &RenderOptions,
) -> Result<BatchReport, RenderError>
where
    T: AsRef<[u8]> + Sync,
{
    fs::create_dir_all(out_dir)?;

    let mut failed_indices: Vec<usize> = items
        .par_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let path = batch_output_path(out_dir, i, options);
            (!generate(item.as_ref(), &path, options)).then_some(i)
        })
        .collect();
    failed_indices.sort_unstable();

    let report = BatchReport {
        succeeded: items.len() - failed_indices.len(),
        failed: failed_indices.len(),
        failed_indices,
    };
    log::debug!(
        "batch into {}: {} ok, {} failed",
        out_dir.display(),
        report.succeeded,
        report.failed
    );
    Ok(report)
}
