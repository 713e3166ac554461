//! Conversion helpers for the Python boundary.
//!
//! Only compiled with the `python-bindings` feature. Inputs are accepted as
//! a 2-D `numpy.ndarray` of `float64`, anything with a `to_numpy` method
//! (pandas frames), or a nested sequence of floats.
#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    PyArray2,
    PyArrayMethods, // .readonly()
    PyReadonlyArray2,
    PyUntypedArrayMethods, // .is_contiguous()
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_matrix<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray2<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        if arr_ro.is_contiguous() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro);
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let arr = PyArray2::from_vec2(py, &rows)
        .map_err(|_| PyValueError::new_err("rows must all have the same length"))?;
    Ok(arr.readonly())
}

/// Owned copy of a Python matrix, plus column names defaulting to `x0, x1, …`.
#[cfg(feature = "python-bindings")]
pub fn owned_matrix<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, names: Option<Vec<String>>,
) -> PyResult<(Array2<f64>, Vec<String>)> {
    let arr = extract_f64_matrix(py, raw_data)?;
    let owned = arr.as_array().to_owned();
    let names = names.unwrap_or_else(|| (0..owned.ncols()).map(|i| format!("x{i}")).collect());
    if names.len() != owned.ncols() {
        return Err(PyValueError::new_err(format!(
            "got {} names for {} columns",
            names.len(),
            owned.ncols()
        )));
    }
    Ok((owned, names))
}
