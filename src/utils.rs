#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArrayDyn;

#[cfg(feature = "python-bindings")]
use crate::shrinkage::{InputRole, ShrinkageError};

/// Extract an n-d float64 array from any array-like Python object.
///
/// Float64 `numpy.ndarray`s are borrowed as-is. Anything else goes through
/// `numpy.asarray` and is accepted only if its dtype is a signed/unsigned
/// integer or a float, in which case it is cast to float64. Other dtypes
/// (bool, complex, object, strings) raise `TypeError` via
/// [`ShrinkageError::NotRealNumeric`].
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array_dyn<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, role: InputRole,
) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr_ro);
    }

    let not_numeric = |dtype: String| -> PyErr {
        ShrinkageError::NotRealNumeric { input: role, dtype }.into()
    };

    let numpy = py.import("numpy")?;
    let converted = numpy.call_method1("asarray", (raw_data,)).map_err(|_| {
        let type_name = raw_data
            .get_type()
            .name()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        not_numeric(type_name)
    })?;

    let dtype = converted.getattr("dtype")?;
    let kind: String = dtype.getattr("kind")?.extract()?;
    if !matches!(kind.as_str(), "i" | "u" | "f") {
        return Err(not_numeric(dtype.str()?.to_string()));
    }

    converted.call_method1("astype", ("float64",))?.extract::<PyReadonlyArrayDyn<f64>>()
}
