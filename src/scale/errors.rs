//! Errors raised by data scalers.
use crate::{data::DataError, xp::XpError};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for scaler construction and transforms.
pub type ScaleResult<T> = Result<T, ScaleError>;

/// Unified error type for scalers.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleError {
    // ---- Preconditions ----
    /// Transforms need an array namespace.
    MissingNamespace,

    // ---- Construction validation ----
    /// A column is owned by more than one sub-scaler.
    DuplicateName { name: String },

    /// A compound scaler needs at least one sub-scaler.
    EmptyCompound,

    /// Fitted statistics disagree with the number of column names.
    LengthMismatch { expected: usize, actual: usize },

    // ---- Routing ----
    /// A requested column is not owned by this scaler.
    UnknownColumn { name: String },

    /// No requested column is owned by this scaler.
    EmptySelection,

    // ---- Passthrough ----
    Data(DataError),
    Xp(XpError),
}

impl std::error::Error for ScaleError {}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::MissingNamespace => write!(f, "xp must be specified"),
            ScaleError::DuplicateName { name } => write!(f, "duplicate name: {name}"),
            ScaleError::EmptyCompound => write!(f, "Compound scaler needs at least one scaler."),
            ScaleError::LengthMismatch { expected, actual } => {
                write!(f, "Scaler has {actual} statistics for {expected} columns.")
            }
            ScaleError::UnknownColumn { name } => {
                write!(f, "Column '{name}' is not handled by this scaler.")
            }
            ScaleError::EmptySelection => {
                write!(f, "No requested column is handled by this scaler.")
            }
            ScaleError::Data(err) => write!(f, "{err}"),
            ScaleError::Xp(err) => write!(f, "{err}"),
        }
    }
}

impl From<DataError> for ScaleError {
    fn from(err: DataError) -> ScaleError {
        ScaleError::Data(err)
    }
}

impl From<XpError> for ScaleError {
    fn from(err: XpError) -> ScaleError {
        ScaleError::Xp(err)
    }
}

/// Convert a [`ScaleError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ScaleError> for PyErr {
    fn from(err: ScaleError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
