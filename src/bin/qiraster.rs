//! # qiraster CLI
//!
//! ```bash
//! # Single code
//! qiraster "Hello World" hello.png
//!
//! # Red, 500px, high error correction
//! qiraster -s 500 -f 255,0,0 -e H "Red QR" red.png
//!
//! # With a logo, written as JPEG
//! qiraster -l logo.png -p 25 -q 90 "Company" company.jpg
//!
//! # One code per line of items.txt, written to out/1.png, out/2.png, ...
//! qiraster -F items.txt out
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use qiraster::options::MAX_SIZE;
use qiraster::{
    generate_batch, try_generate, version, Color, ErrorCorrection, OutputFormat, RenderError,
    RenderOptions,
};

/// qiraster - fast QR code image generator
#[derive(Parser, Debug)]
#[command(name = "qiraster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data to encode, or with --batch the file listing one item per line
    #[arg(required_unless_present = "batch")]
    data: Option<String>,

    /// Output file, or with --batch the output directory
    output: Option<PathBuf>,

    /// Output size in pixels (the image is square)
    #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..=MAX_SIZE as i64))]
    size: u32,

    /// Round size up to a whole number of pixels per module
    #[arg(short, long)]
    optimize_size: bool,

    /// Foreground color as R,G,B
    #[arg(short, long, default_value = "0,0,0")]
    foreground: Color,

    /// Background color as R,G,B
    #[arg(short, long, default_value = "255,255,255")]
    background: Color,

    /// Error correction level: L, M, Q or H
    #[arg(short, long, default_value = "M")]
    error_level: ErrorCorrection,

    /// Logo image drawn at the center
    #[arg(short, long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Logo size as a percentage of the image edge
    #[arg(short = 'p', long, default_value_t = 20, value_parser = clap::value_parser!(u8).range(1..=50))]
    logo_size: u8,

    /// Quality for lossy formats
    #[arg(short, long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Output format (png, jpg, bmp, tiff, webp); defaults to the output extension
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Read items from FILE, one per line, and write them into the output directory
    #[arg(short = 'F', long, value_name = "FILE")]
    batch: Option<PathBuf>,
}

impl Cli {
    fn options(&self, output: Option<&PathBuf>) -> RenderOptions {
        let format = self
            .format
            .or_else(|| output.and_then(|p| OutputFormat::from_path(p)))
            .unwrap_or_default();
        RenderOptions {
            size: self.size,
            optimize_size: self.optimize_size,
            foreground: self.foreground,
            background: self.background,
            error_level: self.error_level,
            logo_path: self.logo.clone(),
            logo_size_percent: self.logo_size,
            format,
            quality: self.quality,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("qiraster {}", version());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), RenderError> {
    if let Some(list) = &cli.batch {
        // In batch mode the first positional, if any, is the output directory.
        let out_dir = cli
            .output
            .clone()
            .or_else(|| cli.data.as_ref().map(PathBuf::from))
            .ok_or_else(|| RenderError::InvalidOption("missing output directory".into()))?;
        let text = fs::read_to_string(list)?;
        let items: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();

        generate_batch(&items, &out_dir, &cli.options(None))?.into_result()?;
        return Ok(());
    }

    let data = cli.data.as_deref().unwrap_or_default();
    let output = cli
        .output
        .as_ref()
        .ok_or_else(|| RenderError::InvalidOption("missing output file".into()))?;
    try_generate(data.as_bytes(), output, &cli.options(Some(output)))
}
