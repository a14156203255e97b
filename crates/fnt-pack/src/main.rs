//! fntpack - Pack per-size font atlases into one container

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Merge <PREFIX>-<N>pt.{json,png} pairs into a single indexed font atlas file
#[derive(Debug, Parser)]
#[command(name = "fntpack", version)]
struct Args {
    /// Font name prefix, as passed to fnt2png
    prefix: String,

    /// Directory holding the per-size files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Output file (default: <PREFIX>.fnta in DIR)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
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
    let variants = fnt_pack::discover(&args.dir, &args.prefix)
        .with_context(|| format!("failed to load variants from {}", args.dir.display()))?;
    for v in &variants {
        tracing::info!(point_size = v.point_size(), glyphs = v.metadata.characters.len(), "packing variant");
    }

    let data = fnt_pack::pack(&variants)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.dir.join(format!("{}.fnta", args.prefix)));
    fs::write(&output, &data).with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(variants = variants.len(), bytes = data.len(), "wrote {}", output.display());
    Ok(())
}
