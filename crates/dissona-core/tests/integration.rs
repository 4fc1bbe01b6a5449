//! Integration tests for dissona-core filter primitives.
//!
//! Verifies filter behaviour with signal-level measurements: sine wave
//! analysis for the built-in smoother, resonance gain and centre frequency
//! for nudged pole filters, and continuity when poles move mid-stream.

use dissona_core::{Complex, Filter, IirFilter, PoleFilter, expand_roots, find_roots};

const TAU: f64 = core::f64::consts::TAU;

/// Generate a sine wave at a normalised frequency (cycles per sample).
fn generate_sine(freq: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples).map(|n| (TAU * freq * n as f64).sin()).collect()
}

fn rms(signal: &[f64]) -> f64 {
    let sum_sq: f64 = signal.iter().map(|&s| s * s).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

/// Steady-state gain of `filter` for a sine at `freq`.
fn measure_gain(filter: &mut impl Filter, freq: f64) -> f64 {
    let num_samples = 4000;
    let settle = 2000;
    let input = generate_sine(freq, num_samples);
    let mut output = vec![0.0; num_samples];
    filter.reset();
    filter.process_block(&input, &mut output);
    rms(&output[settle..]) / rms(&input[settle..])
}

fn resonator(r: f64, theta: f64) -> PoleFilter {
    PoleFilter::new(&[1.0], &[-2.0 * r * theta.cos(), r * r]).unwrap()
}

// ============================================================================
// 1. Spectral smoother
// ============================================================================

#[test]
fn spectral_lowpass_passes_low_frequencies() {
    let mut lp = IirFilter::spectral_lowpass();
    let gain = measure_gain(&mut lp, 0.02);
    assert!((gain - 1.0).abs() < 1e-3, "passband gain {gain}");
}

#[test]
fn spectral_lowpass_rejects_high_frequencies() {
    let mut lp = IirFilter::spectral_lowpass();
    let gain = measure_gain(&mut lp, 0.4);
    assert!(gain < 1e-6, "stopband gain {gain}");
}

#[test]
fn packed_and_split_constructors_agree() {
    let mut packed = vec![0.2, 0.3, 0.1];
    packed.extend_from_slice(&[-0.4, 0.2]);
    let mut a = IirFilter::from_packed(3, 2, &packed).unwrap();
    let mut b = IirFilter::new(&[0.2, 0.3, 0.1], &[-0.4, 0.2]).unwrap();

    let input = generate_sine(0.05, 256);
    let mut out_a = vec![0.0; 256];
    let mut out_b = vec![0.0; 256];
    a.process_block(&input, &mut out_a);
    b.process_block(&input, &mut out_b);
    assert_eq!(out_a, out_b);
}

// ============================================================================
// 2. Pole filter
// ============================================================================

#[test]
fn magnitude_nudge_sharpens_resonance() {
    let theta = 0.5;
    let freq = theta / TAU;

    let mut f = resonator(0.9, theta);
    let base_gain = measure_gain(&mut f, freq);

    // 0.9 -> 0.95
    f.nudge(0.5, 0.0);
    let sharp_gain = measure_gain(&mut f, freq);
    assert!(
        sharp_gain > 1.5 * base_gain,
        "base {base_gain}, nudged {sharp_gain}"
    );

    f.nudge(-0.5, 0.0);
    let damped_gain = measure_gain(&mut f, freq);
    assert!(damped_gain < base_gain);
}

#[test]
fn phase_nudge_moves_resonance_up() {
    let theta = 0.5;
    let mut f = resonator(0.9, theta);
    f.nudge(0.0, 1.0);

    let new_theta = f.poles()[0].arg().abs();
    assert!(new_theta > theta);

    let at_new = measure_gain(&mut f, new_theta / TAU);
    let at_old = measure_gain(&mut f, theta / TAU);
    assert!(at_new > 2.0 * at_old, "new {at_new}, old {at_old}");
}

#[test]
fn nudging_mid_stream_stays_bounded() {
    let mut f = resonator(0.9, 0.5);
    let input = generate_sine(0.08, 4096);
    let mut output = vec![0.0; 4096];

    for (i, (inp, out)) in input.chunks(256).zip(output.chunks_mut(256)).enumerate() {
        let m = (i as f64 / 8.0).sin() * 0.9;
        let p = (i as f64 / 5.0).cos() * 0.9;
        f.process_block_nudged(m, p, inp, out);
    }

    assert!(output.iter().all(|s| s.is_finite()));
    assert!(output.iter().all(|s| s.abs() < 1e3));
}

#[test]
fn identity_nudge_matches_unmodified_filter() {
    let a = [-2.0 * 0.9 * 0.5f64.cos(), 0.81];
    let mut plain = IirFilter::new(&[1.0], &a).unwrap();
    let mut f = PoleFilter::new(&[1.0], &a).unwrap();

    let input = generate_sine(0.05, 512);
    let mut expected = vec![0.0; 512];
    plain.process_block(&input, &mut expected);

    let mut got = vec![0.0; 512];
    f.nudge(0.7, 0.0);
    f.nudge(0.0, 0.0);
    f.process_block(&input, &mut got);
    assert_eq!(expected, got);
}

// ============================================================================
// 3. Root solver on a real design
// ============================================================================

#[test]
fn spectral_lowpass_poles_are_stable() {
    let lp = IirFilter::spectral_lowpass();
    let f = PoleFilter::new(lp.numerator(), lp.denominator()).unwrap();
    assert_eq!(f.poles().len(), 10);
    for p in f.poles() {
        assert!(p.abs() < 1.0, "unstable pole {p:?}");
    }
}

#[test]
fn solved_poles_rebuild_denominator() {
    let lp = IirFilter::spectral_lowpass();
    let mut ascending: Vec<Complex> = lp
        .denominator()
        .iter()
        .rev()
        .map(|&a| Complex::real(a))
        .collect();
    ascending.push(Complex::ONE);

    let roots = find_roots(&ascending, true).unwrap();
    let rebuilt = expand_roots(&roots);
    for (got, &want) in rebuilt[1..].iter().zip(lp.denominator()) {
        assert!((got.re - want).abs() < 5e-2, "{} vs {want}", got.re);
        assert!(got.im.abs() < 5e-3);
    }
}
