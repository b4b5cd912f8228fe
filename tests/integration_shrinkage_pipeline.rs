//! Integration tests for the subject-level shrinkage estimator.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path a caller takes: four split-half estimates
//!   of a per-subject statistic in, shrunk estimates and weights out.
//! - Exercise realistic regimes (noise-dominated vs signal-dominated slots,
//!   correlation-like matrices with a fixed diagonal, dynamic rank) rather
//!   than single hand-computed slots.
//!
//! Coverage
//! --------
//! - `shrinkage::ShrinkageEstimator` with default and population options.
//! - `shrinkage::shrink` as a shorthand for the default estimator.
//! - `ShrinkageOutcome` accessors: `lambda`, `group_mean`, `components`,
//!   `diagnostics`, `into_parts`.
//!
//! Exclusions
//! ----------
//! - Branch-level validation and the lambda clamp rules: unit tests.
//! - Python bindings: tested from Python.
//! - Random-input invariants: `tests/shrinkage_properties.rs`.
use ndarray::{Array2, Array3, ArrayD, IxDyn};
use subject_shrinkage::shrinkage::{
    ShrinkageEstimator, ShrinkageOptions, VarianceNormalization, shrink,
};

/// Deterministic, zero-centred-ish jitter in [−1, 1] for `(stream, subject)`.
fn jitter(stream: usize, subject: usize) -> f64 {
    ((stream * 7919 + subject * 104_729) as f64 * 0.618_033_988_7).sin()
}

/// Build one 1×n input: `truth[s] + scale · jitter(stream, s)`.
fn noisy_row(truth: &[f64], scale: f64, stream: usize) -> Array2<f64> {
    let n = truth.len();
    Array2::from_shape_fn((1, n), |(_, s)| truth[s] + scale * jitter(stream, s))
}

/// Enable `tracing` output for a test run (`RUST_LOG`-style filter).
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().try_init();
}

#[test]
// Purpose
// -------
// When every subject shares the same true value, shrinkage can only move
// estimates toward a better guess: the mean squared error against the truth
// must not increase.
//
// Given
// -----
// - 12 subjects, one slot, common truth 0.3.
// - x1, x2 with independent jitter of scale 0.5; x_odd, x_even with jitter
//   of scale 0.2.
//
// Expect
// ------
// - lambda > 0 (some shrinkage happens).
// - MSE(x_shrink, truth) ≤ MSE(X, truth).
fn shrinkage_does_not_increase_error_when_subjects_share_truth() {
    // Arrange
    init_tracing();
    let n = 12;
    let truth = vec![0.3; n];
    let x1 = noisy_row(&truth, 0.5, 1);
    let x2 = noisy_row(&truth, 0.5, 2);
    let x_odd = noisy_row(&truth, 0.2, 3);
    let x_even = noisy_row(&truth, 0.2, 4);

    // Act
    let outcome = ShrinkageEstimator::default()
        .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())
        .expect("simulated inputs are valid");

    // Assert
    let x = (&x1 + &x2) / 2.0;
    let mse = |a: &Array2<f64>| a.iter().map(|v| (v - 0.3).powi(2)).sum::<f64>() / n as f64;
    assert!(outcome.lambda()[0] > 0.0, "expected some shrinkage, lambda = {}", outcome.lambda()[0]);
    assert!(
        mse(outcome.x_shrink()) <= mse(&x) + 1e-15,
        "shrinkage increased error: {} > {}",
        mse(outcome.x_shrink()),
        mse(&x)
    );
}

#[test]
// Purpose
// -------
// A slot with strong between-subject signal and negligible measurement
// noise should be left almost untouched.
//
// Given
// -----
// - 8 subjects with truth s = 0..7 and jitter of scale 0.01 on all inputs.
//
// Expect
// ------
// - lambda < 0.01 and every shrunk value within 0.05 of X.
fn signal_dominated_slot_is_barely_shrunk() {
    // Arrange
    let truth: Vec<f64> = (0..8).map(|s| s as f64).collect();
    let x1 = noisy_row(&truth, 0.01, 5);
    let x2 = noisy_row(&truth, 0.01, 6);
    let x_odd = noisy_row(&truth, 0.01, 7);
    let x_even = noisy_row(&truth, 0.01, 8);

    // Act
    let (x_shrink, lambda) = shrink(x1.view(), x2.view(), x_odd.view(), x_even.view())
        .expect("simulated inputs are valid");

    // Assert
    let x = (&x1 + &x2) / 2.0;
    assert!(lambda[0] < 0.01, "lambda should be small, got {}", lambda[0]);
    for (a, b) in x_shrink.iter().zip(x.iter()) {
        assert!((a - b).abs() < 0.05, "shrunk {a} drifted from {b}");
    }
}

#[test]
// Purpose
// -------
// Run a full correlation-like block through the estimator and check the
// structure a downstream clustering step relies on.
//
// Given
// -----
// - 4×4 symmetric "correlation" matrices for 10 subjects, unit diagonal,
//   off-diagonal entries built from a subject effect plus split noise.
//
// Expect
// ------
// - lambda has shape (4, 4), zero on the diagonal, symmetric, in [0, 1].
// - x_shrink keeps the unit diagonal and stays symmetric.
// - Diagnostics count exactly the 4 diagonal slots as zero-variance.
fn correlation_block_keeps_structure_after_shrinkage() {
    // Arrange
    let (v, n) = (4, 10);
    let make = |stream: usize, scale: f64| {
        Array3::from_shape_fn((v, v, n), |(i, j, s)| {
            if i == j {
                1.0
            } else {
                let (lo, hi) = if i < j { (i, j) } else { (j, i) };
                let slot = lo * v + hi;
                0.2 * jitter(100 + slot, s) + scale * jitter(stream + slot, s)
            }
        })
    };
    let x1 = make(10, 0.1);
    let x2 = make(20, 0.1);
    let x_odd = make(30, 0.05);
    let x_even = make(40, 0.05);

    // Act
    let outcome = ShrinkageEstimator::default()
        .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())
        .expect("simulated inputs are valid");

    // Assert
    let lambda = outcome.lambda();
    assert_eq!(lambda.shape(), &[v, v]);
    for i in 0..v {
        assert_eq!(lambda[[i, i]], 0.0);
        for j in 0..v {
            assert!((0.0..=1.0).contains(&lambda[[i, j]]));
            assert_eq!(lambda[[i, j]], lambda[[j, i]]);
            for s in 0..n {
                assert_eq!(outcome.x_shrink()[[i, j, s]], outcome.x_shrink()[[j, i, s]]);
            }
        }
        for s in 0..n {
            assert_eq!(outcome.x_shrink()[[i, i, s]], 1.0);
        }
    }
    assert_eq!(outcome.diagnostics().n_zero_total_variance, v);
    assert_eq!(outcome.diagnostics().n_slots, v * v);
}

#[test]
// Purpose
// -------
// Dynamic-rank inputs behave exactly like their statically-typed
// counterparts.
//
// Given
// -----
// - The same 3×5 data as `Array2` and as `ArrayD`.
//
// Expect
// ------
// - Identical lambda and x_shrink values; `IxDyn` shapes [3] and [3, 5].
fn dynamic_rank_matches_static_rank() {
    // Arrange
    let build = |stream: usize| {
        Array2::from_shape_fn((3, 5), |(i, s)| i as f64 + 0.3 * jitter(stream + i, s))
    };
    let (x1, x2, x_odd, x_even) = (build(1), build(2), build(3), build(4));
    let dyn_of = |a: &Array2<f64>| -> ArrayD<f64> { a.clone().into_dyn() };
    let (d1, d2, d_odd, d_even) = (dyn_of(&x1), dyn_of(&x2), dyn_of(&x_odd), dyn_of(&x_even));

    // Act
    let (s_shrink, s_lambda) = shrink(x1.view(), x2.view(), x_odd.view(), x_even.view()).unwrap();
    let (d_shrink, d_lambda) =
        shrink(d1.view(), d2.view(), d_odd.view(), d_even.view()).unwrap();

    // Assert
    assert_eq!(d_lambda.shape(), &[3]);
    assert_eq!(d_shrink.shape(), &[3, 5]);
    assert_eq!(d_lambda, s_lambda.into_dimensionality::<IxDyn>().unwrap());
    assert_eq!(d_shrink, s_shrink.into_dimensionality::<IxDyn>().unwrap());
}

#[test]
// Purpose
// -------
// The weights do not depend on the shared variance normalization.
//
// Given
// -----
// - A 3×6 block run with sample and population normalization.
//
// Expect
// ------
// - Lambdas agree to 1e-12; group means agree exactly.
fn normalization_choice_leaves_lambda_unchanged() {
    // Arrange
    let build = |stream: usize| {
        Array2::from_shape_fn((3, 6), |(i, s)| (s as f64) * 0.1 * i as f64 + 0.2 * jitter(stream, s))
    };
    let (x1, x2, x_odd, x_even) = (build(11), build(12), build(13), build(14));
    let population =
        ShrinkageEstimator::new(ShrinkageOptions::new(VarianceNormalization::Population));

    // Act
    let a = ShrinkageEstimator::default()
        .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())
        .unwrap();
    let b = population.estimate(x1.view(), x2.view(), x_odd.view(), x_even.view()).unwrap();

    // Assert
    for (la, lb) in a.lambda().iter().zip(b.lambda().iter()) {
        assert!((la - lb).abs() < 1e-12, "lambda differs: {la} vs {lb}");
    }
    assert_eq!(a.group_mean(), b.group_mean());
}
