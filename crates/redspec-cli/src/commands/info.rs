use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::input::load_frame;

#[derive(Args)]
pub struct InfoArgs {
    /// Input frame file (PNG, PGM, or CSV)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let frame = load_frame(&args.file)?;

    let mut min = u16::MAX;
    let mut max = 0u16;
    let mut sum = 0u64;
    for &v in frame.data.iter() {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let mean = sum as f64 / frame.data.len() as f64;
    let ceiling = frame.saturation_ceiling();
    let saturated = frame.data.iter().filter(|&&v| v >= ceiling).count();

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {} x {} (rows x cols)", frame.rows(), frame.cols());
    println!("Bit depth:   {} ({} ceiling)", frame.bit_depth, ceiling);
    println!("Intensity:   min {} / mean {:.1} / max {}", min, mean, max);
    if saturated > 0 {
        println!("Saturated:   {} pixel(s)", saturated);
    }

    Ok(())
}
