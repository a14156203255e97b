//! fnt2png - Extract bitmap fonts from .FON files into PNG atlases
//!
//! Writes `<name>-<points>pt.png` and `<name>-<points>pt.json` for every
//! font variant with at least one glyph.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fnt_core::{
    extract_font, is_ne_container, EncoderOptions, ExtractOptions, FilterHeuristic, RenderedVariant,
};
use tracing_subscriber::EnvFilter;

/// Extract the bitmap fonts in a .FON container into PNG atlases and JSON indexes
#[derive(Debug, Parser)]
#[command(name = "fnt2png", version)]
struct Args {
    /// Input font container (.fon)
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Font name used in file names and metadata (default: input file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// zlib compression level
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    /// Scanline filter selection heuristic
    #[arg(long, value_enum, default_value_t = Heuristic::SignedDelta)]
    heuristic: Heuristic,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Heuristic {
    SignedDelta,
    WrappedBytes,
}

impl From<Heuristic> for FilterHeuristic {
    fn from(h: Heuristic) -> Self {
        match h {
            Heuristic::SignedDelta => FilterHeuristic::SignedDelta,
            Heuristic::WrappedBytes => FilterHeuristic::WrappedBytes,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let data = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    if !is_ne_container(&data) {
        tracing::warn!("{} does not look like an NE executable", args.input.display());
    }

    let font_name = match &args.name {
        Some(name) => name.clone(),
        None => font_name(&args.input)?,
    };

    let options = ExtractOptions {
        encoder: EncoderOptions {
            compression: args.level,
            heuristic: args.heuristic.into(),
        },
    };

    let report = extract_font(&data, &font_name, &options)
        .with_context(|| format!("no fonts extracted from {}", args.input.display()))?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut written = 0;
    for variant in report.rendered() {
        // A write failure only loses this variant
        match write_variant(&args.out_dir, variant) {
            Ok(()) => written += 1,
            Err(e) => tracing::error!(point_size = variant.header.point_size, "{e:#}"),
        }
    }

    tracing::info!(
        written,
        empty = report.empty_count(),
        failed = report.failures().count(),
        "done"
    );
    Ok(())
}

/// Input file stem, used when no name is given
fn font_name(input: &Path) -> Result<String> {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .context("input path has no file name")
}

fn write_variant(dir: &Path, variant: &RenderedVariant) -> Result<()> {
    let stem = variant.file_stem();
    let json = variant.json()?;

    let png_path = dir.join(format!("{stem}.png"));
    let json_path = dir.join(format!("{stem}.json"));

    fs::write(&png_path, &variant.png)
        .with_context(|| format!("failed to write {}", png_path.display()))?;
    if let Err(e) = fs::write(&json_path, json) {
        // Never leave an atlas without its index
        let _ = fs::remove_file(&png_path);
        return Err(e).with_context(|| format!("failed to write {}", json_path.display()));
    }

    tracing::info!(
        point_size = variant.header.point_size,
        glyphs = variant.metadata.char_count,
        atlas = variant.metadata.atlas_size,
        "wrote {}",
        png_path.display()
    );
    Ok(())
}
