//! Dissona CLI - spectral dissonance analysis from the command line.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dissona")]
#[command(author, version, about = "Spectral dissonance analysis", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-block dissonance of a WAV file
    Analyze(commands::analyze::AnalyzeArgs),

    /// Inspect the controllable-pole smoother and its nudged poles
    Poles(commands::poles::PolesArgs),

    /// Show analyzer metadata, or WAV file information
    Info(commands::info::InfoArgs),
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Logs go to stderr so feature output on stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Poles(args) => commands::poles::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
