//! stream_ml — mixture likelihoods for stream-membership modelling, with
//! optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge exposing
//! the scaler and mixture reduction to Python via the `_stream_ml`
//! extension module.
//!
//! Key behaviors
//! -------------
//! - Hierarchical parameter names, values and bounds (`params`).
//! - Priors and interval bounds with log-density and forward transforms
//!   (`prior`).
//! - Invertible column scalers, composable over disjoint columns (`scale`).
//! - Likelihood components and their mixture (`model`).
//! - A pluggable array namespace (`xp`) threaded through every numeric call.
//!
//! Invariants & assumptions
//! ------------------------
//! - All values are immutable once built; "mutation" returns a new value.
//! - Per-row arrays are `(n_rows, 1)`; columns are addressed by name
//!   through [`data::Data`].
//! - The library emits `tracing` events but never installs a subscriber.
//!
//! Conventions
//! -----------
//! - Each subsystem has its own error enum and `…Result<T>` alias; lower
//!   layers convert into `ModelError` with `?`. With `python-bindings`,
//!   every error maps to a Python `ValueError`.
//! - Python-exposed classes live under `_stream_ml.<submodule>` and are
//!   registered in `sys.modules` for dotted imports.
//!
//! Testing notes
//! -------------
//! - Unit tests sit at the bottom of each module; the end-to-end mixture
//!   pipeline is covered under `tests/`.

pub mod data;
pub mod model;
pub mod numerical_stability;
pub mod params;
pub mod prior;
pub mod scale;
pub mod utils;
pub mod xp;

#[cfg(feature = "python-bindings")]
use ndarray::Axis;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    data::Data,
    scale::{DataScaler, Scalable, ScaleError, StandardScaler},
    utils::{extract_f64_matrix, owned_matrix},
    xp::{ArrayNamespace, NdArrayNamespace},
};

/// PyStandardScaler — Python-facing wrapper for [`StandardScaler`].
///
/// Purpose
/// -------
/// Fit, apply and invert a per-column standardization from Python on 2-D
/// `float64` arrays.
///
/// Parameters
/// ----------
/// Constructed from Python via `StandardScaler(names, mean, scale)` or
/// `StandardScaler.fit(data, names=None)`:
/// - `names`: `list[str]`
///   Column names, in column order.
/// - `mean`, `scale`: `list[float]`
///   Per-column statistics; non-positive or non-finite scales act as 1.
///
/// Notes
/// -----
/// - Transforms always use the ndarray namespace; the column selection is
///   `names` when given, else every fitted column.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "stream_ml.scale", name = "StandardScaler")]
pub struct PyStandardScaler {
    inner: StandardScaler,
}

#[cfg(feature = "python-bindings")]
impl PyStandardScaler {
    fn apply<'py>(
        &self, py: Python<'py>, raw_data: &Bound<'py, PyAny>, names: Option<Vec<String>>,
        inverse: bool,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let names = names.unwrap_or_else(|| self.inner.names().to_vec());
        let (arr, names) = owned_matrix(py, raw_data, Some(names))?;
        let input = Scalable::Raw(arr);
        let xp: &dyn ArrayNamespace = &NdArrayNamespace;
        let out = if inverse {
            self.inner.inverse_transform(&input, &names, Some(xp))?
        } else {
            self.inner.transform(&input, &names, Some(xp))?
        };
        Ok(out.into_array().into_pyarray(py))
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyStandardScaler {
    #[new]
    #[pyo3(text_signature = "(names, mean, scale, /)")]
    pub fn new(names: Vec<String>, mean: Vec<f64>, scale: Vec<f64>) -> PyResult<Self> {
        Ok(PyStandardScaler { inner: StandardScaler::new(names, mean, scale)? })
    }

    /// Fit mean and population standard deviation per column.
    #[staticmethod]
    #[pyo3(signature = (raw_data, names = None), text_signature = "(data, /, names=None)")]
    pub fn fit<'py>(
        py: Python<'py>, raw_data: &Bound<'py, PyAny>, names: Option<Vec<String>>,
    ) -> PyResult<Self> {
        let (arr, names) = owned_matrix(py, raw_data, names)?;
        let data = Data::new(arr, names.clone()).map_err(ScaleError::from)?;
        Ok(PyStandardScaler { inner: StandardScaler::fit(&data, names.as_slice())? })
    }

    #[pyo3(signature = (raw_data, names = None), text_signature = "(data, /, names=None)")]
    pub fn transform<'py>(
        &self, py: Python<'py>, raw_data: &Bound<'py, PyAny>, names: Option<Vec<String>>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        self.apply(py, raw_data, names, false)
    }

    #[pyo3(signature = (raw_data, names = None), text_signature = "(data, /, names=None)")]
    pub fn inverse_transform<'py>(
        &self, py: Python<'py>, raw_data: &Bound<'py, PyAny>, names: Option<Vec<String>>,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        self.apply(py, raw_data, names, true)
    }

    #[getter]
    pub fn names(&self) -> Vec<String> {
        self.inner.names().to_vec()
    }

    #[getter]
    pub fn mean(&self) -> Vec<f64> {
        self.inner.mean().to_vec()
    }

    #[getter]
    pub fn scale(&self) -> Vec<f64> {
        self.inner.scale().to_vec()
    }
}

/// Row-wise log-sum-exp of stacked component log-likelihoods.
///
/// `data` is `(n_rows, n_components)`; returns `n_rows` values. Rows where
/// every entry is `-inf` stay `-inf`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(data, /)")]
pub fn mixture_logsumexp<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let arr = extract_f64_matrix(py, raw_data)?;
    let reduced = NdArrayNamespace.logsumexp(arr.as_array(), Axis(1));
    Ok(reduced.into_pyarray(py))
}

/// _stream_ml — PyO3 module initializer for the Python extension.
///
/// Key behaviors
/// -------------
/// - Create the `scale` and `model` submodules and attach them to
///   `_stream_ml`.
/// - Register the submodules in `sys.modules` so they are importable via
///   dotted paths from Python.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _stream_ml<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let scale_mod = PyModule::new(_py, "scale")?;
    let model_mod = PyModule::new(_py, "model")?;
    scale_submodule(_py, m, &scale_mod)?;
    model_submodule(_py, m, &model_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("stream_ml.scale", scale_mod)?;
    _py.import("sys")?.getattr("modules")?.set_item("stream_ml.model", model_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn scale_submodule<'py>(
    _py: Python, stream_ml: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyStandardScaler>()?;
    stream_ml.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn model_submodule<'py>(
    _py: Python, stream_ml: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mixture_logsumexp, m)?)?;
    stream_ml.add_submodule(m)?;
    Ok(())
}
