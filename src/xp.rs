//! xp — the array-namespace capability injected into every array-producing
//! operation.
//!
//! Purpose
//! -------
//! Decouple the likelihood machinery from a concrete numeric library. Models,
//! priors and scalers never call array constructors or reductions directly;
//! they receive an [`ArrayNamespace`] (by reference or `Arc`) and ask it to
//! build, stack, reduce and threshold arrays.
//!
//! Key behaviors
//! -------------
//! - [`ArrayNamespace`] lists exactly the operations the core consumes:
//!   `asarray`, `zeros`, `hstack`, `logsumexp` along an axis, elementwise
//!   `threshold`/`clip`, and the `within_bounds` comparison mask.
//! - [`NdArrayNamespace`] implements it on top of `ndarray`.
//!
//! Conventions
//! -----------
//! - Arrays are `f64`, two-dimensional, rows = data points, columns =
//!   features / parameters / mixture components.
//! - Shape failures are reported through [`XpError`]; nothing here panics on
//!   caller input.

use crate::numerical_stability::logsumexp;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, ShapeError};
use std::fmt::Debug;

/// Result alias for array-namespace operations.
pub type XpResult<T> = Result<T, XpError>;

/// Shape and construction failures raised by an [`ArrayNamespace`].
#[derive(Debug, Clone, PartialEq)]
pub enum XpError {
    /// `hstack` was called with no operands.
    EmptyStack,

    /// Flat values do not fill the requested shape.
    LengthMismatch { expected: usize, actual: usize },

    /// Operands of a stacking operation disagree in shape.
    Shape { reason: String },
}

impl std::error::Error for XpError {}

impl std::fmt::Display for XpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XpError::EmptyStack => write!(f, "Cannot stack an empty list of arrays."),
            XpError::LengthMismatch { expected, actual } => {
                write!(f, "Array length mismatch: expected {expected} values, got {actual}")
            }
            XpError::Shape { reason } => write!(f, "Incompatible array shapes: {reason}"),
        }
    }
}

impl From<ShapeError> for XpError {
    fn from(err: ShapeError) -> XpError {
        XpError::Shape { reason: err.to_string() }
    }
}

/// Array operations consumed by the likelihood core.
///
/// Implementations must be pure: every method returns a new array and leaves
/// its inputs untouched.
pub trait ArrayNamespace: Debug + Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Build a row-major `(rows, cols)` array from flat values.
    fn asarray(&self, values: &[f64], shape: (usize, usize)) -> XpResult<Array2<f64>>;

    /// A zero-filled array of the given shape.
    fn zeros(&self, shape: (usize, usize)) -> Array2<f64>;

    /// Concatenate along the column axis. All operands must share a row count.
    fn hstack(&self, arrays: &[ArrayView2<'_, f64>]) -> XpResult<Array2<f64>>;

    /// `ln Σ exp` along `axis`, removing that axis.
    fn logsumexp(&self, a: ArrayView2<'_, f64>, axis: Axis) -> Array1<f64>;

    /// `x` where `x > threshold`, otherwise `value`.
    fn threshold(&self, x: ArrayView1<'_, f64>, threshold: f64, value: f64) -> Array1<f64>;

    /// Elementwise `lower <= x <= upper`.
    fn within_bounds(&self, x: ArrayView1<'_, f64>, lower: f64, upper: f64) -> Array1<bool>;

    /// Elementwise clamp into `[lower, upper]`.
    fn clip(&self, x: ArrayView1<'_, f64>, lower: f64, upper: f64) -> Array1<f64>;
}

/// [`ArrayNamespace`] backed by `ndarray`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NdArrayNamespace;

impl ArrayNamespace for NdArrayNamespace {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn asarray(&self, values: &[f64], shape: (usize, usize)) -> XpResult<Array2<f64>> {
        let expected = shape.0 * shape.1;
        if values.len() != expected {
            return Err(XpError::LengthMismatch { expected, actual: values.len() });
        }
        Ok(Array2::from_shape_vec(shape, values.to_vec())?)
    }

    fn zeros(&self, shape: (usize, usize)) -> Array2<f64> {
        Array2::zeros(shape)
    }

    fn hstack(&self, arrays: &[ArrayView2<'_, f64>]) -> XpResult<Array2<f64>> {
        if arrays.is_empty() {
            return Err(XpError::EmptyStack);
        }
        Ok(ndarray::concatenate(Axis(1), arrays)?)
    }

    fn logsumexp(&self, a: ArrayView2<'_, f64>, axis: Axis) -> Array1<f64> {
        a.map_axis(axis, |lane| match lane.as_slice() {
            Some(slice) => logsumexp(slice),
            None => logsumexp(&lane.to_vec()),
        })
    }

    fn threshold(&self, x: ArrayView1<'_, f64>, threshold: f64, value: f64) -> Array1<f64> {
        x.mapv(|v| if v > threshold { v } else { value })
    }

    fn within_bounds(&self, x: ArrayView1<'_, f64>, lower: f64, upper: f64) -> Array1<bool> {
        x.mapv(|v| v >= lower && v <= upper)
    }

    fn clip(&self, x: ArrayView1<'_, f64>, lower: f64, upper: f64) -> Array1<f64> {
        x.mapv(|v| v.clamp(lower, upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // `hstack` concatenates columns and rejects mismatched row counts and
    // empty operand lists.
    fn hstack_concatenates_columns() {
        let xp = NdArrayNamespace;
        let a = array![[1.0], [2.0]];
        let b = array![[3.0, 4.0], [5.0, 6.0]];

        let out = xp.hstack(&[a.view(), b.view()]).unwrap();
        assert_eq!(out, array![[1.0, 3.0, 4.0], [2.0, 5.0, 6.0]]);

        let c = array![[1.0]];
        assert!(matches!(xp.hstack(&[a.view(), c.view()]), Err(XpError::Shape { .. })));
        assert_eq!(xp.hstack(&[]), Err(XpError::EmptyStack));
    }

    #[test]
    // Purpose
    // -------
    // `logsumexp` along axis 1 reduces each row independently.
    fn logsumexp_reduces_rows() {
        let xp = NdArrayNamespace;
        let a = array![[0.2_f64.ln(), 0.8_f64.ln()], [f64::NEG_INFINITY, 0.0]];

        let out = xp.logsumexp(a.view(), Axis(1));
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(out[1], 0.0, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Elementwise helpers: `threshold` keeps values strictly above the
    // cutoff, `within_bounds` is inclusive, `clip` clamps, and `asarray`
    // checks the flat length.
    fn elementwise_helpers() {
        let xp = NdArrayNamespace;
        let x = array![0.001, 0.005, 0.5];

        assert_eq!(xp.threshold(x.view(), 0.005, 0.0), array![0.0, 0.0, 0.5]);
        assert_eq!(xp.within_bounds(x.view(), 0.005, 0.5), array![false, true, true]);
        assert_eq!(xp.clip(x.view(), 0.01, 0.1), array![0.01, 0.01, 0.1]);

        assert_eq!(xp.asarray(&[1.0, 2.0], (2, 1)).unwrap(), array![[1.0], [2.0]]);
        assert_eq!(
            xp.asarray(&[1.0], (2, 1)),
            Err(XpError::LengthMismatch { expected: 2, actual: 1 })
        );
    }
}
