//! Errors raised by models and mixture aggregation.
//!
//! [`ModelError`] wraps the errors of every lower layer (parameters, priors,
//! scalers, data, array namespace) so model code can propagate with `?`, and
//! adds the model-level construction and shape failures.
use crate::{
    data::DataError, params::ParamError, prior::PriorError, scale::ScaleError, xp::XpError,
};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for model evaluation and construction.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Mixture construction ----
    /// A mixture needs at least one component.
    EmptyMixture,

    /// Two components share a name.
    DuplicateComponent { name: String },

    /// Component names must be non-empty and free of the prefix separator.
    InvalidComponentName { name: String },

    /// At most one background component per mixture.
    MultipleBackgrounds { first: String, second: String },

    // ---- Component construction ----
    /// Uniform-background domain must be finite with `lower < upper`.
    InvalidDomain { lower: f64, upper: f64 },

    /// Net output width differs from the number of packed parameters.
    NetWidth { expected: usize, actual: usize },

    // ---- Evaluation ----
    /// A parameter or intermediate array has an unexpected shape.
    ShapeMismatch { name: String, expected: (usize, usize), actual: (usize, usize) },

    /// Distribution parameters rejected by the density implementation.
    Distribution { reason: String },

    // ---- Passthrough ----
    Param(ParamError),
    Prior(PriorError),
    Scale(ScaleError),
    Data(DataError),
    Xp(XpError),
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyMixture => write!(f, "Mixture needs at least one component."),
            ModelError::DuplicateComponent { name } => {
                write!(f, "Duplicate mixture component name: {name}")
            }
            ModelError::InvalidComponentName { name } => {
                write!(f, "Invalid component name '{name}': must be non-empty and contain no '.'")
            }
            ModelError::MultipleBackgrounds { first, second } => {
                write!(f, "Mixture has two background components: {first} and {second}")
            }
            ModelError::InvalidDomain { lower, upper } => {
                write!(f, "Invalid background domain ({lower}, {upper}): need finite lower < upper")
            }
            ModelError::NetWidth { expected, actual } => {
                write!(f, "Network produces {actual} outputs, expected {expected}")
            }
            ModelError::ShapeMismatch { name, expected, actual } => {
                write!(f, "Array for {name} has shape {actual:?}, expected {expected:?}")
            }
            ModelError::Distribution { reason } => write!(f, "Invalid distribution: {reason}"),
            ModelError::Param(err) => write!(f, "{err}"),
            ModelError::Prior(err) => write!(f, "{err}"),
            ModelError::Scale(err) => write!(f, "{err}"),
            ModelError::Data(err) => write!(f, "{err}"),
            ModelError::Xp(err) => write!(f, "{err}"),
        }
    }
}

impl From<ParamError> for ModelError {
    fn from(err: ParamError) -> ModelError {
        ModelError::Param(err)
    }
}

impl From<PriorError> for ModelError {
    fn from(err: PriorError) -> ModelError {
        ModelError::Prior(err)
    }
}

impl From<ScaleError> for ModelError {
    fn from(err: ScaleError) -> ModelError {
        ModelError::Scale(err)
    }
}

impl From<DataError> for ModelError {
    fn from(err: DataError) -> ModelError {
        ModelError::Data(err)
    }
}

impl From<XpError> for ModelError {
    fn from(err: XpError) -> ModelError {
        ModelError::Xp(err)
    }
}

/// Convert a [`ModelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
