//! subject_shrinkage — reliability-weighted shrinkage of subject-level
//! estimates, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the shrinkage estimator to Python via the `_subject_shrinkage`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing class, function and submodule used by the
//! `subject_shrinkage` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module (`shrinkage`) as the public crate surface.
//! - Define a `#[pyclass]` wrapper, a `#[pyfunction]` shorthand and the
//!   `#[pymodule]` initializer for the `_subject_shrinkage` extension.
//! - Register the `shrinkage` submodule in `sys.modules` so that dotted
//!   imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in [`shrinkage`]; this file performs only FFI
//!   glue, array extraction, and error mapping.
//! - Python inputs are converted to float64 n-d arrays; the subject axis is
//!   the last axis, exactly as in the Rust API.
//!
//! Conventions
//! -----------
//! - Errors from the core are [`shrinkage::ShrinkageError`] values and become
//!   `TypeError` (dtype problems) or `ValueError` (everything else) at the
//!   PyO3 boundary.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in [`shrinkage`] and by
//!   the integration and property tests under `tests/`.
//! - The PyO3 layer is exercised by Python-level tests of the extension.

pub mod shrinkage;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::{ArrayViewD, IxDyn};

#[cfg(feature = "python-bindings")]
use numpy::{PyArrayDyn, PyReadonlyArrayDyn, ToPyArray};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyTuple};

#[cfg(feature = "python-bindings")]
use crate::{
    shrinkage::{
        InputRole, ShrinkageEstimator, ShrinkageInputs, ShrinkageOptions, ShrinkageOutcome,
        VarianceNormalization, inputs::check_arity,
    },
    utils::extract_f64_array_dyn,
};

/// SubjectShrinkage — Python-facing wrapper around [`ShrinkageEstimator`].
///
/// Purpose
/// -------
/// Run the shrinkage estimator on four array-likes supplied from Python and
/// keep the full [`ShrinkageOutcome`] for inspection through properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `SubjectShrinkage(x1, x2, x_odd, x_even, normalization="sample")`:
/// - `x1`, `x2`, `x_odd`, `x_even`: array-likes of identical shape
///   `(p1, …, pk, n)` with `n ≥ 2` subjects on the last axis and a real
///   numeric dtype.
/// - `normalization`: `"sample"` (default, `n − 1`) or `"population"` (`n`).
///
/// Fields
/// ------
/// - `inner`: [`ShrinkageOutcome<IxDyn>`]
///
/// Notes
/// -----
/// - Native Rust code should call [`ShrinkageEstimator::estimate`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "subject_shrinkage.shrinkage")]
pub struct SubjectShrinkage {
    inner: ShrinkageOutcome<IxDyn>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SubjectShrinkage {
    #[new]
    #[pyo3(
        signature = (*arrays, normalization = None),
        text_signature = "(x1, x2, x_odd, x_even, /, normalization='sample')"
    )]
    pub fn new<'py>(
        py: Python<'py>, arrays: &Bound<'py, PyTuple>, normalization: Option<&str>,
    ) -> PyResult<Self> {
        let inner = run_estimator(py, arrays, normalization)?;
        Ok(SubjectShrinkage { inner })
    }

    /// Shrunk estimates, same shape as the inputs.
    #[getter]
    pub fn x_shrink<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.x_shrink().to_pyarray(py)
    }

    /// Shrinkage weight per parameter slot, in [0, 1].
    #[getter]
    pub fn lambda_<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.lambda().to_pyarray(py)
    }

    /// `1 − lambda` per parameter slot: the weight kept on each subject's own estimate.
    #[getter]
    pub fn reliability<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.reliability().to_pyarray(py)
    }

    /// Mean of the point estimate over subjects, per parameter slot.
    #[getter]
    pub fn group_mean<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.group_mean().to_pyarray(py)
    }

    /// Within-subject noise variance `varU`.
    #[getter]
    pub fn var_u<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.components().var_u.to_pyarray(py)
    }

    /// Pseudo scan-rescan variance `varSR`.
    #[getter]
    pub fn var_sr<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.components().var_sr.to_pyarray(py)
    }

    /// Within-subject signal variance `varW`, unclamped.
    #[getter]
    pub fn var_w<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.components().var_w.to_pyarray(py)
    }

    /// `max(varW + varU, 0)` per parameter slot.
    #[getter]
    pub fn var_within<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.components().var_within.to_pyarray(py)
    }

    /// Variance of the point estimate across subjects.
    #[getter]
    pub fn var_total<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<f64>> {
        self.inner.components().var_total.to_pyarray(py)
    }

    /// Length of the subject axis.
    #[getter]
    pub fn n_subjects(&self) -> usize {
        self.inner.diagnostics().n_subjects
    }

    /// Slots where a negative `varW + varU` was clamped to zero.
    #[getter]
    pub fn n_within_clamped(&self) -> usize {
        self.inner.diagnostics().n_within_clamped
    }

    /// Slots where the raw ratio exceeded one and lambda was clamped.
    #[getter]
    pub fn n_lambda_clamped(&self) -> usize {
        self.inner.diagnostics().n_lambda_clamped
    }

    /// Slots with zero total variance, where lambda is zero.
    #[getter]
    pub fn n_zero_total_variance(&self) -> usize {
        self.inner.diagnostics().n_zero_total_variance
    }
}

/// shrink(x1, x2, x_odd, x_even, /, normalization='sample') -> (x_shrink, lambda)
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (*arrays, normalization = None),
    text_signature = "(x1, x2, x_odd, x_even, /, normalization='sample')"
)]
fn shrink<'py>(
    py: Python<'py>, arrays: &Bound<'py, PyTuple>, normalization: Option<&str>,
) -> PyResult<(Bound<'py, PyArrayDyn<f64>>, Bound<'py, PyArrayDyn<f64>>)> {
    let outcome = run_estimator(py, arrays, normalization)?;
    Ok((outcome.x_shrink().to_pyarray(py), outcome.lambda().to_pyarray(py)))
}

#[cfg(feature = "python-bindings")]
fn run_estimator<'py>(
    py: Python<'py>, arrays: &Bound<'py, PyTuple>, normalization: Option<&str>,
) -> PyResult<ShrinkageOutcome<IxDyn>> {
    check_arity(arrays.len())?;

    let normalization = match normalization {
        Some(name) => name.parse::<VarianceNormalization>()?,
        None => VarianceNormalization::default(),
    };
    let estimator = ShrinkageEstimator::new(ShrinkageOptions::new(normalization));

    let readonly: Vec<PyReadonlyArrayDyn<'py, f64>> = arrays
        .iter()
        .zip(InputRole::ALL)
        .map(|(raw, role)| extract_f64_array_dyn(py, &raw, role))
        .collect::<PyResult<_>>()?;
    let views: Vec<ArrayViewD<'_, f64>> = readonly.iter().map(|arr| arr.as_array()).collect();

    let inputs = ShrinkageInputs::from_slice(&views)?;
    Ok(estimator.estimate_inputs(&inputs)?)
}

/// _subject_shrinkage — PyO3 module initializer for the Python extension.
///
/// Creates the `shrinkage` submodule, attaches it to the parent module and
/// registers it in `sys.modules` as `subject_shrinkage.shrinkage` so that it
/// is importable via a dotted path.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _subject_shrinkage<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let shrinkage_mod = PyModule::new(_py, "shrinkage")?;
    shrinkage_submodule(_py, m, &shrinkage_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("subject_shrinkage.shrinkage", shrinkage_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn shrinkage_submodule<'py>(
    _py: Python, parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<SubjectShrinkage>()?;
    m.add_function(wrap_pyfunction!(shrink, m)?)?;
    parent.add_submodule(m)?;
    Ok(())
}
