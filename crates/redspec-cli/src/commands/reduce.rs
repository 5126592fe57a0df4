use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use redspec_core::reduce::{reduce, ReduceMode};

use crate::input::load_frame;

#[derive(Clone, ValueEnum)]
pub enum ModeArg {
    Sum,
    Mean,
    Max,
    RoiMean,
}

#[derive(Args)]
pub struct ReduceArgs {
    /// Input frame file (PNG, PGM, or CSV)
    pub file: PathBuf,

    /// Column-collapse strategy
    #[arg(long, value_enum, default_value = "roi-mean")]
    pub mode: ModeArg,

    /// ROI band height in rows (roi-mean mode)
    #[arg(long, default_value = "32")]
    pub band_rows: usize,

    /// Write the raw spectrum as JSON instead of printing a summary
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ReduceArgs) -> Result<()> {
    let frame = load_frame(&args.file)?;
    let mode = match args.mode {
        ModeArg::Sum => ReduceMode::Sum,
        ModeArg::Mean => ReduceMode::Mean,
        ModeArg::Max => ReduceMode::Max,
        ModeArg::RoiMean => ReduceMode::RoiMean {
            band_rows: args.band_rows,
        },
    };

    let spectrum = reduce(&frame, &mode)?;

    if let Some(ref path) = args.output {
        let json = serde_json::to_string_pretty(&spectrum)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Raw spectrum saved to {}", path.display());
    } else {
        let max = spectrum
            .intensities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        println!("Mode:     {}", mode);
        println!("Columns:  {}", spectrum.len());
        println!("Peak:     {:.1} counts", max);
    }

    Ok(())
}
