//! shrinkage::variance — split-half decomposition of across-subject variance.
//!
//! Purpose
//! -------
//! Separate the across-subject variability of a subject-level estimate into
//! a within-subject part (measurement noise plus drift between the two
//! halves of a session) and the total variance of the point estimate. The
//! ratio of the two is the shrinkage weight computed in
//! [`lambda`](crate::shrinkage::lambda).
//!
//! Model
//! -----
//! With `X = (X1 + X2) / 2` and all variances taken across subjects:
//!
//! ```text
//! varU       = var(Xodd − Xeven) / 4          (noise)
//! varSR      = var(X2 − X1)                   (pseudo scan-rescan, = 2(varW + varU))
//! varW       = (varSR − 4·varU) / 2           (within-subject signal drift)
//! var_within = max(varW + varU, 0)
//! var_total  = var(X)
//! ```
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs have been through
//!   [`validate_inputs`](crate::shrinkage::validation::validate_inputs): same
//!   shape, finite, at least two subjects on the last axis.
//! - One `ddof` is shared by every variance below.
//! - `var_within` and `var_total` are non-negative; `varW` may be negative.
//!
//! Testing notes
//! -------------
//! - Unit tests compare each component against hand-computed values on a
//!   single-slot example and check the clamp on `var_within`.

use ndarray::{Array, ArrayView, Axis, Dimension, RemoveAxis, Zip};

use crate::shrinkage::inputs::ShrinkageInputs;

/// Per-slot variance components; every array has the input shape with the
/// subject axis removed.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceComponents<E: Dimension> {
    /// Within-subject noise variance `varU`.
    pub var_u: Array<f64, E>,
    /// Pseudo scan-rescan variance `varSR`.
    pub var_sr: Array<f64, E>,
    /// Within-subject signal variance `varW` (unclamped, may be negative).
    pub var_w: Array<f64, E>,
    /// `max(varW + varU, 0)`.
    pub var_within: Array<f64, E>,
    /// Variance across subjects of the point estimate `X`.
    pub var_total: Array<f64, E>,
}

/// The subject axis: always the last one.
#[inline]
pub fn subject_axis<D: Dimension>(x: &ArrayView<'_, f64, D>) -> Axis {
    Axis(x.ndim() - 1)
}

/// Variance along the subject axis with the given delta degrees of freedom.
#[inline]
pub fn variance_over_subjects<D: RemoveAxis>(
    x: &ArrayView<'_, f64, D>, ddof: f64,
) -> Array<f64, D::Smaller> {
    x.var_axis(subject_axis(x), ddof)
}

/// Mean along the subject axis.
///
/// Terms are scaled by `1/n` before summing; finite inputs give a finite mean.
#[inline]
pub fn mean_over_subjects<D: RemoveAxis>(x: &ArrayView<'_, f64, D>) -> Array<f64, D::Smaller> {
    let axis = subject_axis(x);
    let n = x.len_of(axis) as f64;
    x.map_axis(axis, |lane| lane.iter().fold(0.0, |acc, &v| acc + v / n))
}

/// Per-subject point estimate `X = (X1 + X2) / 2`, halved before adding.
pub fn point_estimate<D: Dimension>(inputs: &ShrinkageInputs<'_, D>) -> Array<f64, D> {
    Zip::from(&inputs.x1).and(&inputs.x2).map_collect(|&a, &b| 0.5 * a + 0.5 * b)
}

/// Decompose across-subject variance into noise, drift and total parts.
///
/// Parameters
/// ----------
/// - `inputs`: validated views of `x1`, `x2`, `x_odd`, `x_even`.
/// - `x`: the point estimate produced by [`point_estimate`].
/// - `ddof`: delta degrees of freedom shared by all variances.
///
/// Returns
/// -------
/// `(VarianceComponents<D::Smaller>, usize)`
///   The components and the number of slots where `varW + varU` was
///   negative and `var_within` was clamped to zero.
pub fn decompose<D: RemoveAxis>(
    inputs: &ShrinkageInputs<'_, D>, x: &ArrayView<'_, f64, D>, ddof: f64,
) -> (VarianceComponents<D::Smaller>, usize) {
    let noise_diff = Zip::from(&inputs.x_odd).and(&inputs.x_even).map_collect(|&o, &e| o - e);
    let var_u = variance_over_subjects(&noise_diff.view(), ddof) / 4.0;

    let rescan_diff = Zip::from(&inputs.x2).and(&inputs.x1).map_collect(|&b, &a| b - a);
    let var_sr = variance_over_subjects(&rescan_diff.view(), ddof);

    let var_w = Zip::from(&var_sr).and(&var_u).map_collect(|&sr, &u| (sr - 4.0 * u) / 2.0);

    let n_within_clamped =
        Zip::from(&var_w).and(&var_u).fold(0, |acc, &w, &u| acc + usize::from(w + u < 0.0));
    let var_within = Zip::from(&var_w).and(&var_u).map_collect(|&w, &u| (w + u).max(0.0));

    let var_total = variance_over_subjects(x, ddof);

    tracing::trace!(
        n_slots = var_total.len(),
        n_within_clamped,
        "decomposed across-subject variance"
    );

    (VarianceComponents { var_u, var_sr, var_w, var_within, var_total }, n_within_clamped)
}
