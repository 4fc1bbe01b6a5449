//! Analyzer metadata and WAV file information.

use clap::Args;
use dissona_analysis::DissonanceAnalyzer;
use dissona_io::{WavFormat, read_wav_info};

/// Display analyzer metadata, or WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// WAV file to describe (analyzer metadata when omitted)
    pub file: Option<std::path::PathBuf>,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    match args.file {
        Some(path) => wav_info(&path),
        None => {
            analyzer_info();
            Ok(())
        }
    }
}

fn analyzer_info() {
    let analyzer = DissonanceAnalyzer::new(44100.0);
    let info = analyzer.info();

    println!("{} ({})", info.name, info.identifier);
    println!("  {}", info.description);
    println!("Maker:       {}", info.maker);
    println!("Copyright:   {}", info.copyright);
    println!("Version:     {}", info.version);
    println!(
        "Channels:    {}..={}",
        analyzer.min_channel_count(),
        analyzer.max_channel_count()
    );
    println!(
        "Preferred:   block {}, step {}",
        analyzer.preferred_block_size(),
        analyzer.preferred_step_size()
    );

    println!("\nOutputs:");
    for (i, out) in analyzer.output_descriptors().iter().enumerate() {
        println!(
            "  [{i}] {:<18} {:<20} unit {}, {} bin(s)",
            out.identifier, out.name, out.unit, out.bin_count
        );
        println!("      {}", out.description);
    }
}

fn wav_info(path: &std::path::Path) -> anyhow::Result<()> {
    let info = read_wav_info(path)?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", path.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    Ok(())
}
