//! shrinkage::lambda — per-slot shrinkage weights.
//!
//! `lambda = var_within / var_total`, elementwise, with two rules:
//! - `lambda = 0` wherever `var_total == 0` (nothing varies across subjects,
//!   so there is nothing to correct);
//! - the ratio is clamped into `[0, 1]`, since sampling noise can push
//!   `var_within` above `var_total`.
//!
//! With the `parallel` feature the elementwise map runs on rayon through
//! `ndarray`'s `Zip::par_map_collect`.

use ndarray::{Array, Dimension, Zip};

use crate::shrinkage::variance::VarianceComponents;

/// Shrinkage weight for a single parameter slot.
///
/// Returns a value in `[0, 1]` for any non-negative inputs. A ratio that is
/// not a number (both variances infinite) maps to `0`.
#[inline]
pub fn shrinkage_weight(var_within: f64, var_total: f64) -> f64 {
    if var_total == 0.0 {
        return 0.0;
    }
    let ratio = var_within / var_total;
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

/// Per-slot shrinkage weights for a set of variance components.
pub fn compute_lambda<E: Dimension>(components: &VarianceComponents<E>) -> Array<f64, E> {
    let zip = Zip::from(&components.var_within).and(&components.var_total);

    #[cfg(feature = "parallel")]
    let lambda = zip.par_map_collect(|&w, &t| shrinkage_weight(w, t));
    #[cfg(not(feature = "parallel"))]
    let lambda = zip.map_collect(|&w, &t| shrinkage_weight(w, t));

    lambda
}

/// Number of slots whose raw ratio `var_within / var_total` exceeded 1 and
/// was clamped to 1. Slots with zero total variance are not counted.
pub fn count_clamped_above<E: Dimension>(components: &VarianceComponents<E>) -> usize {
    Zip::from(&components.var_within)
        .and(&components.var_total)
        .fold(0, |acc, &w, &t| acc + usize::from(t > 0.0 && w > t))
}
