//! shrinkage — reliability-weighted shrinkage of subject-level estimates.
//!
//! Purpose
//! -------
//! Denoise per-subject summary statistics (e.g. connectivity matrices) by
//! pulling each subject's estimate toward the group mean, weighted by how
//! much of the across-subject variability is within-subject noise rather
//! than between-subject signal. The weight is estimated from two split-half
//! re-measurements of every subject.
//!
//! Key behaviors
//! -------------
//! - Bundle the four surrogate measurements in [`ShrinkageInputs`] and check
//!   them once with [`validate_inputs`].
//! - Decompose variance ([`VarianceComponents`]), derive per-slot weights
//!   (`lambda`) and apply them via [`ShrinkageEstimator::estimate`], or the
//!   shorthand [`shrink`].
//! - Report failures through [`ShrinkageError`] / [`ShrinkageResult`], with a
//!   conversion to Python exceptions when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs share one shape `(p1, …, pk, n)`; the last axis indexes `n ≥ 2`
//!   subjects and every element is finite.
//! - Every returned `lambda` is in `[0, 1]` and equals `0` wherever the total
//!   variance across subjects is `0`.
//! - All computations are pure: inputs are borrowed and never mutated, and
//!   the only side effects are `tracing` events.
//!
//! Conventions
//! -----------
//! - Variances use one shared normalization, [`VarianceNormalization::Sample`]
//!   (`n − 1`) unless configured otherwise through [`ShrinkageOptions`].
//! - Arrays of any rank are accepted through `ndarray`'s `RemoveAxis`
//!   dimensions, including `IxDyn`.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use subject_shrinkage::shrinkage::prelude::*;
//!   # use ndarray::array;
//!   # let x1 = array![[0.2_f64, 0.5, 0.1]];
//!   # let (x2, x_odd, x_even) = (x1.clone(), x1.clone(), x1.clone());
//!
//!   let outcome = ShrinkageEstimator::default()
//!       .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())?;
//!   let (x_shrink, lambda) = outcome.into_parts();
//!   # Ok::<(), ShrinkageError>(())
//!   ```
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own branch logic.
//! - `tests/integration_shrinkage_pipeline.rs` runs the estimator on
//!   simulated split-half data; `tests/shrinkage_properties.rs` checks the
//!   invariants above with `proptest`.

pub mod errors;
pub mod estimator;
pub mod inputs;
pub mod lambda;
pub mod options;
pub mod validation;
pub mod variance;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ShrinkageError, ShrinkageResult};
pub use self::estimator::{ShrinkageDiagnostics, ShrinkageEstimator, ShrinkageOutcome, shrink};
pub use self::inputs::{InputRole, ShrinkageInputs};
pub use self::options::{ShrinkageOptions, VarianceNormalization};
pub use self::validation::validate_inputs;
pub use self::variance::VarianceComponents;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use subject_shrinkage::shrinkage::prelude::*;
//
// to import the main shrinkage surface in a single line.

pub mod prelude {
    pub use super::errors::{ShrinkageError, ShrinkageResult};
    pub use super::estimator::{ShrinkageEstimator, ShrinkageOutcome, shrink};
    pub use super::options::{ShrinkageOptions, VarianceNormalization};
}
