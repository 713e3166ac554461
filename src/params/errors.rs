//! Errors for parameter names, parameter bounds and parameter containers.
//!
//! This module defines [`ParamError`], raised while building or addressing
//! [`ParamNames`](crate::params::ParamNames),
//! [`ParamBounds`](crate::params::ParamBounds) and
//! [`Params`](crate::params::Params).
//!
//! ## Conventions
//! - A *lookup failure* ([`ParamError::KeyNotFound`]) is distinct from a
//!   *malformed key* ([`ParamError::InvalidKey`]). Containment checks never
//!   raise; any lookup failure reads as absence.
//! - Consistency checks between bounds and declared names surface as
//!   [`ParamError::BoundsMismatch`] only when the caller asks for an error.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for parameter-layer operations.
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified error type for the parameter layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    // ---- Construction validation ----
    /// Key is empty, has the wrong arity, or otherwise cannot address a slot.
    InvalidKey { key: String, reason: &'static str },

    /// A flattened name (or top-level key) appears twice.
    DuplicateName { name: String },

    /// A parameter array has an unsupported shape.
    InvalidShape { key: String, shape: (usize, usize), reason: &'static str },

    // ---- Lookup ----
    /// Well-formed key that does not resolve to a leaf.
    KeyNotFound { key: String },

    // ---- Consistency ----
    /// Bounds keys disagree with the declared flat parameter names.
    BoundsMismatch { expected: Vec<String>, found: Vec<String> },

    /// Packed array width differs from the number of packed names.
    WidthMismatch { expected: usize, actual: usize },

    // ---- Configuration ----
    /// A field with no default was read before a value was supplied.
    MissingDefault { field: &'static str },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::InvalidKey { key, reason } => {
                write!(f, "Invalid parameter key '{key}': {reason}")
            }
            ParamError::DuplicateName { name } => {
                write!(f, "Duplicate parameter name: {name}")
            }
            ParamError::InvalidShape { key, shape, reason } => {
                write!(f, "Parameter '{key}' has invalid shape {shape:?}: {reason}")
            }
            ParamError::KeyNotFound { key } => write!(f, "Parameter key not found: {key}"),
            ParamError::BoundsMismatch { expected, found } => {
                write!(
                    f,
                    "param_bounds keys do not match param_names: expected [{}], found [{}]",
                    expected.join(", "),
                    found.join(", ")
                )
            }
            ParamError::WidthMismatch { expected, actual } => {
                write!(f, "Packed parameter array has {actual} columns, expected {expected}")
            }
            ParamError::MissingDefault { field } => {
                write!(f, "No default value for '{field}' and none was supplied.")
            }
        }
    }
}

/// Convert a [`ParamError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `Display` messages embed the payload so diagnostics are self-contained.
    fn display_embeds_payload() {
        let err = ParamError::BoundsMismatch {
            expected: vec!["weight".into(), "phi2_mu".into()],
            found: vec!["weight".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("phi2_mu"));
        assert!(msg.contains("do not match"));

        let err = ParamError::MissingDefault { field: "param_bounds" };
        assert!(err.to_string().contains("param_bounds"));
    }
}
