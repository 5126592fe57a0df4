use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use redspec_core::biosig::{Confidence, SignatureLibrary};
use redspec_core::pipeline::{run_pipeline, PipelineConfig, PipelineOutput};

use crate::input::{load_calibration, load_frame, load_library};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input frame files (PNG, PGM, or CSV); each is analyzed independently
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Calibration anchors (TOML)
    #[arg(long)]
    pub calibration: PathBuf,

    /// Signature library (TOML); built-in pigment library if omitted
    #[arg(long)]
    pub library: Option<PathBuf>,

    /// Pipeline config (TOML); defaults if omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for per-frame JSON results
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let calibration = load_calibration(&args.calibration)?;
    let library = match &args.library {
        Some(path) => load_library(path)?,
        None => SignatureLibrary::builtin(),
    };
    let config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid pipeline config")?
        }
        None => PipelineConfig::default(),
    };

    if let Some(ref dir) = args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let pb = ProgressBar::new(args.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Analyzing");

    let mut failures = 0usize;
    for file in &args.files {
        // One bad frame must not stop the batch.
        match analyze_one(file, &calibration, &config, &library) {
            Ok(output) => {
                pb.suspend(|| print_report(file, &output));
                if let Some(ref dir) = args.output {
                    save_json(dir, file, &output)?;
                }
            }
            Err(err) => {
                failures += 1;
                pb.suspend(|| {
                    eprintln!("{} {}: {err:#}", style("error:").red().bold(), file.display())
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if failures > 0 {
        println!(
            "\n{} of {} frame(s) failed",
            failures,
            args.files.len()
        );
    }
    Ok(())
}

fn analyze_one(
    file: &Path,
    calibration: &redspec_core::calibrate::CalibrationMap,
    config: &PipelineConfig,
    library: &SignatureLibrary,
) -> Result<PipelineOutput> {
    let frame = load_frame(file)?;
    run_pipeline(&frame, calibration, config, library).map_err(Into::into)
}

fn print_report(file: &Path, output: &PipelineOutput) {
    println!("\n{}", style(file.display()).bold());
    println!(
        "  {} sample(s), {} peak(s)",
        output.spectrum.len(),
        output.peaks.len()
    );

    if !output.peaks.is_empty() {
        println!("  {:>10}  {:>10}  {:>8}  {:>10}", "nm", "counts", "fwhm", "prominence");
        for peak in &output.peaks {
            let flag = if peak.saturated { " (saturated)" } else { "" };
            println!(
                "  {:>10.2}  {:>10.1}  {:>8.2}  {:>10.1}{}",
                peak.wavelength_nm, peak.intensity, peak.fwhm_nm, peak.prominence, flag
            );
        }
    }

    for (name, sig) in &output.report.signatures {
        let score = format!("{:.3}", sig.score);
        let styled = if sig.score >= 0.5 {
            style(score).green()
        } else {
            style(score).dim()
        };
        println!("  {:<18} {}", name, styled);
    }

    let confidence = match output.report.confidence {
        Confidence::None => style("none").dim(),
        Confidence::Low => style("low").yellow(),
        Confidence::Medium => style("medium").yellow().bold(),
        Confidence::High => style("high").green().bold(),
    };
    println!("  confidence: {} - {}", confidence, output.report.interpretation);
}

fn save_json(dir: &Path, file: &Path, output: &PipelineOutput) -> Result<()> {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    let path = dir.join(format!("{stem}.json"));
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
