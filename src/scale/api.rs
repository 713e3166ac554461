//! The scaler interface and its input/output kinds.
use crate::{
    data::Data,
    scale::errors::ScaleResult,
    xp::ArrayNamespace,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};

/// Shared handle to an immutable scaler.
pub type ScalerRef = Arc<dyn DataScaler>;

/// Numeric precision of a scaler's stored statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArrayFormat {
    #[default]
    Float64,
    Float32,
}

impl ArrayFormat {
    /// Round `x` to this format's precision.
    pub fn cast(self, x: f64) -> f64 {
        match self {
            ArrayFormat::Float64 => x,
            ArrayFormat::Float32 => x as f32 as f64,
        }
    }
}

/// Scaler input and output: named columns, or a raw array interpreted with
/// an explicit list of names.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalable {
    Named(Data),
    Raw(Array2<f64>),
}

impl Scalable {
    pub fn array(&self) -> &Array2<f64> {
        match self {
            Scalable::Named(data) => data.array(),
            Scalable::Raw(arr) => arr,
        }
    }

    pub fn into_array(self) -> Array2<f64> {
        match self {
            Scalable::Named(data) => data.into_array(),
            Scalable::Raw(arr) => arr,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Scalable::Named(_))
    }

    /// View the input as named columns; a raw array takes `names`.
    pub fn to_data(&self, names: &[String], xp: &dyn ArrayNamespace) -> ScaleResult<Data> {
        match self {
            Scalable::Named(data) => Ok(data.clone()),
            Scalable::Raw(arr) => {
                let values: Vec<f64> = arr.iter().copied().collect();
                Ok(Data::new(xp.asarray(&values, arr.dim())?, names.to_vec())?)
            }
        }
    }

    /// Output with the same kind as `self`.
    pub(crate) fn mirror(&self, array: Array2<f64>, names: Vec<String>) -> ScaleResult<Scalable> {
        Ok(match self {
            Scalable::Named(_) => Scalable::Named(Data::new(array, names)?),
            Scalable::Raw(_) => Scalable::Raw(array),
        })
    }
}

/// An invertible per-column transform over an ordered set of named columns.
///
/// `names` selects which of the scaler's columns are present in `data`
/// (and, for raw input, names its columns in order). Every transform needs
/// an array namespace; `None` fails with `ScaleError::MissingNamespace`.
pub trait DataScaler: Debug + Send + Sync {
    fn names(&self) -> &[String];

    fn transform(
        &self, data: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>,
    ) -> ScaleResult<Scalable>;

    fn inverse_transform(
        &self, data: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>,
    ) -> ScaleResult<Scalable>;

    /// Scaler restricted to `names`.
    fn subset(&self, names: &[String]) -> ScaleResult<ScalerRef>;

    /// Same scaler with statistics held at `fmt` precision.
    fn astype(&self, fmt: ArrayFormat) -> ScalerRef;

    fn format(&self) -> ArrayFormat;
}
