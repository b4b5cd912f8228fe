//! shrinkage::validation — input guards for the shrinkage estimator.
//!
//! Purpose
//! -------
//! Centralize the checks that must pass before any variance is computed, so
//! that the numerical stage can assume four finite arrays of identical shape
//! with a usable subject axis.
//!
//! Key behaviors
//! -------------
//! - Reject empty arrays, shape disagreements, non-finite elements, and
//!   inputs without at least two subjects on the trailing axis.
//! - Report the first violation found, checking in a fixed order:
//!   emptiness, shape, finiteness, subject count.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x1` is the reference shape; every other input is compared against it.
//! - The subject axis is always the last axis. Rank-0 arrays have no subject
//!   axis and are rejected as having insufficient subjects.
//!
//! Conventions
//! -----------
//! - Validation is read-only and allocates only to build error payloads.
//! - Callers (the estimator and the Python bridge) call [`validate_inputs`]
//!   exactly once per estimate.
//!
//! Testing notes
//! -------------
//! - Unit tests cover every error branch plus the success path.

use ndarray::{ArrayView, Dimension};

use crate::shrinkage::{
    errors::{ShrinkageError, ShrinkageResult},
    inputs::ShrinkageInputs,
};

/// Validate the four estimator inputs.
///
/// Parameters
/// ----------
/// - `inputs`: `&ShrinkageInputs<'_, D>`
///   Borrowed views of `x1`, `x2`, `x_odd`, `x_even`.
///
/// Returns
/// -------
/// `ShrinkageResult<usize>`
///   - `Ok(n)` with the number of subjects (length of the last axis) when all
///     checks pass.
///   - `Err(ShrinkageError)` describing the first violation.
///
/// Errors
/// ------
/// - `ShrinkageError::EmptyInput`
///   Any array has zero elements.
/// - `ShrinkageError::ShapeMismatch`
///   An array's shape differs from `x1`'s.
/// - `ShrinkageError::NonFiniteData`
///   An element is NaN or ±∞.
/// - `ShrinkageError::InsufficientSubjects`
///   The arrays are rank 0 or the last axis has length ≤ 1.
///
/// Panics
/// ------
/// - Never panics.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use subject_shrinkage::shrinkage::{ShrinkageInputs, ShrinkageError, validate_inputs};
/// let x = array![[0.1_f64, 0.4, 0.2]];
/// let inputs = ShrinkageInputs::new(x.view(), x.view(), x.view(), x.view());
/// assert_eq!(validate_inputs(&inputs), Ok(3));
///
/// let single = array![[0.1_f64]];
/// let inputs = ShrinkageInputs::new(single.view(), single.view(), single.view(), single.view());
/// assert_eq!(
///     validate_inputs(&inputs),
///     Err(ShrinkageError::InsufficientSubjects { n_subjects: 1 })
/// );
/// ```
pub fn validate_inputs<D: Dimension>(inputs: &ShrinkageInputs<'_, D>) -> ShrinkageResult<usize> {
    for (role, view) in inputs.iter() {
        if view.is_empty() {
            return Err(ShrinkageError::EmptyInput { input: role });
        }
    }

    let reference = inputs.x1.shape();
    for (role, view) in inputs.iter().skip(1) {
        if view.shape() != reference {
            return Err(ShrinkageError::ShapeMismatch {
                input: role,
                expected: reference.to_vec(),
                actual: view.shape().to_vec(),
            });
        }
    }

    for (role, view) in inputs.iter() {
        if let Some((index, value)) = first_non_finite(view) {
            return Err(ShrinkageError::NonFiniteData { input: role, index, value });
        }
    }

    let n_subjects = reference.last().copied().unwrap_or(0);
    if n_subjects < 2 {
        return Err(ShrinkageError::InsufficientSubjects { n_subjects });
    }

    Ok(n_subjects)
}

/// Locate the first NaN/±∞ in logical (row-major) order.
fn first_non_finite<D: Dimension>(view: &ArrayView<'_, f64, D>) -> Option<(Vec<usize>, f64)> {
    view.iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
        .map(|(flat, &value)| (unravel_index(flat, view.shape()), value))
}

/// Convert a row-major flat position into a multi-index for `shape`.
fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for (slot, &len) in index.iter_mut().zip(shape).rev() {
        *slot = flat % len;
        flat /= len;
    }
    index
}
