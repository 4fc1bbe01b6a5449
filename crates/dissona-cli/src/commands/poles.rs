//! Pole inspection for the controllable-pole smoother.

use std::path::PathBuf;

use clap::Args;
use dissona_core::Complex;

use super::common::load_config;

#[derive(Args)]
pub struct PolesArgs {
    /// Analysis config file (TOML) supplying smoother coefficients and nudge
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Magnitude nudge in [-1, 1] (overrides the config)
    #[arg(long, allow_negative_numbers = true)]
    magnitude: Option<f64>,

    /// Phase nudge in [-1, 1] (overrides the config)
    #[arg(long, allow_negative_numbers = true)]
    phase: Option<f64>,
}

pub fn run(args: PolesArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(magnitude) = args.magnitude {
        config.nudge.magnitude = magnitude;
    }
    if let Some(phase) = args.phase {
        config.nudge.phase = phase;
    }
    config.validate()?;

    let mut filter = config.pole_filter()?;
    let nudge = config.nudge;

    println!(
        "Smoother: {} zeros, {} poles",
        filter.numerator().len() - 1,
        filter.base_poles().len()
    );
    print_poles("Designed poles", filter.base_poles());

    filter.nudge(nudge.magnitude, nudge.phase);
    if nudge.magnitude != 0.0 || nudge.phase != 0.0 {
        println!(
            "\nNudge: magnitude {:+.3}, phase {:+.3}",
            nudge.magnitude, nudge.phase
        );
        print_poles("Nudged poles", filter.poles());
    }

    println!("\nDenominator (a1..aN):");
    for (i, a) in filter.denominator().iter().enumerate() {
        println!("  a{:<3} {:>+.12e}", i + 1, a);
    }

    let radius = filter
        .poles()
        .iter()
        .map(|p| p.abs())
        .fold(0.0f64, f64::max);
    let verdict = if radius < 1.0 { "stable" } else { "UNSTABLE" };
    println!("\nPole radius: {radius:.6} ({verdict})");

    Ok(())
}

fn print_poles(title: &str, poles: &[Complex]) {
    println!("\n{title}:");
    println!(
        "  {:>3}  {:>12}  {:>12}  {:>10}  {:>10}",
        "#", "re", "im", "|p|", "angle"
    );
    for (i, p) in poles.iter().enumerate() {
        println!(
            "  {:>3}  {:>12.8}  {:>12.8}  {:>10.6}  {:>10.6}",
            i,
            p.re,
            p.im,
            p.abs(),
            p.arg()
        );
    }
}
