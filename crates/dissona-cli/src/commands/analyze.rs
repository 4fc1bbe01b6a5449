//! Offline dissonance analysis of a WAV file.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use dissona_analysis::BlockOutcome;
use dissona_analysis::stft::{AnalysisSettings, FrameFeatures, analyze_signal_with_progress};
use dissona_io::{read_wav, read_wav_channel};
use indicatif::{ProgressBar, ProgressStyle};

use super::common::load_config;

/// Output encoding for per-block features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per block
    Csv,
    /// A single document with settings and frames
    Json,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Analysis config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// FFT block size in samples
    #[arg(long)]
    block_size: Option<usize>,

    /// Hop between blocks in samples
    #[arg(long)]
    step_size: Option<usize>,

    /// Window function (hann, hamming, blackman, blackman-harris, rectangular)
    #[arg(long)]
    window: Option<String>,

    /// Number of partials entering the roughness sum
    #[arg(long)]
    max_partials: Option<usize>,

    /// Analyse one channel (zero-based) instead of the mono mixdown
    #[arg(long)]
    channel: Option<u16>,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    if let Some(step_size) = args.step_size {
        config.step_size = step_size;
    }
    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(max_partials) = args.max_partials {
        config.max_partials = max_partials;
    }
    let settings = config.to_settings()?;

    let (samples, spec) = match args.channel {
        Some(channel) => read_wav_channel(&args.input, channel),
        None => read_wav(&args.input),
    }
    .with_context(|| format!("reading {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;

    let total = settings.frame_count(samples.len());
    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({eta})")?
            .progress_chars("##-"),
    );

    let frames = analyze_signal_with_progress(&samples, sample_rate, &settings, |done, _| {
        pb.set_position(done as u64);
    })?;
    pb.finish_and_clear();

    let rendered = match args.format {
        OutputFormat::Csv => to_csv(&frames),
        OutputFormat::Json => to_json(&frames, &args.input, sample_rate, &settings)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            summarize(&frames);
            println!("Wrote {} blocks to {}", frames.len(), path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn outcome_label(outcome: BlockOutcome) -> &'static str {
    match outcome {
        BlockOutcome::Ok => "ok",
        BlockOutcome::NoPeaks => "no-peaks",
        BlockOutcome::NonFinite => "non-finite",
    }
}

fn to_csv(frames: &[FrameFeatures]) -> String {
    let mut csv = String::from("index,time,linear,log10,partials,outcome\n");
    for f in frames {
        let linear = f.linear.map(|v| v.to_string()).unwrap_or_default();
        let log10 = f.log10.map(|v| v.to_string()).unwrap_or_default();
        let _ = writeln!(
            csv,
            "{},{:.6},{},{},{},{}",
            f.index,
            f.time,
            linear,
            log10,
            f.partials,
            outcome_label(f.outcome)
        );
    }
    csv
}

fn to_json(
    frames: &[FrameFeatures],
    input: &std::path::Path,
    sample_rate: f32,
    settings: &AnalysisSettings,
) -> anyhow::Result<String> {
    let frames: Vec<serde_json::Value> = frames
        .iter()
        .map(|f| {
            serde_json::json!({
                "index": f.index,
                "time": f.time,
                "linear": f.linear,
                "log10": f.log10,
                "partials": f.partials,
                "outcome": outcome_label(f.outcome),
            })
        })
        .collect();

    let json = serde_json::json!({
        "input": input.display().to_string(),
        "sample_rate": sample_rate,
        "block_size": settings.block_size,
        "step_size": settings.step_size,
        "window": settings.window.name(),
        "max_partials": settings.options.max_partials,
        "frames": frames,
    });
    Ok(serde_json::to_string_pretty(&json)? + "\n")
}

fn summarize(frames: &[FrameFeatures]) {
    let values: Vec<f32> = frames.iter().filter_map(|f| f.linear).collect();
    let dropped = frames.len() - values.len();
    if values.is_empty() {
        println!("No finite dissonance values");
        return;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    println!("Dissonance: mean {mean:.4}, max {max:.4} over {} blocks", values.len());
    if dropped > 0 {
        println!("  {dropped} blocks had no finite value");
    }
}
