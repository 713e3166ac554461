//! Errors raised by priors and prior bounds.
use crate::{data::DataError, params::errors::ParamError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for prior evaluation and construction.
pub type PriorResult<T> = Result<T, PriorError>;

/// Unified error type for priors.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorError {
    // ---- Construction validation ----
    /// Bounds violate the invariants of the bound kind.
    InvalidBounds { lower: f64, upper: f64, reason: &'static str },

    /// Threshold must be finite.
    InvalidThreshold { value: f64 },

    // ---- Preconditions ----
    /// The bound was evaluated before being bound to a parameter slot.
    MissingParamName,

    /// The constrained parameter is not a column of the forward output.
    ParamNotLocated { name: String },

    /// An array handed to the prior has an unexpected shape.
    ShapeMismatch { name: String, expected: (usize, usize), actual: (usize, usize) },

    // ---- Passthrough ----
    Param(ParamError),
    Data(DataError),
}

impl std::error::Error for PriorError {}

impl std::fmt::Display for PriorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorError::InvalidBounds { lower, upper, reason } => {
                write!(f, "Invalid prior bounds ({lower}, {upper}): {reason}")
            }
            PriorError::InvalidThreshold { value } => {
                write!(f, "Prior threshold must be finite; got: {value}")
            }
            PriorError::MissingParamName => write!(f, "need to set param_name"),
            PriorError::ParamNotLocated { name } => {
                write!(f, "Parameter {name} is not a column of the forward output.")
            }
            PriorError::ShapeMismatch { name, expected, actual } => {
                write!(f, "Array for {name} has shape {actual:?}, expected {expected:?}")
            }
            PriorError::Param(err) => write!(f, "{err}"),
            PriorError::Data(err) => write!(f, "{err}"),
        }
    }
}

impl From<ParamError> for PriorError {
    fn from(err: ParamError) -> PriorError {
        PriorError::Param(err)
    }
}

impl From<DataError> for PriorError {
    fn from(err: DataError) -> PriorError {
        PriorError::Data(err)
    }
}

/// Convert a [`PriorError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<PriorError> for PyErr {
    fn from(err: PriorError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
