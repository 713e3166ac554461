//! Forward-pass capability injected into components.
use crate::{data::Data, model::errors::ModelResult, xp::ArrayNamespace};
use ndarray::Array2;
use std::{fmt::Debug, sync::Arc};

/// Maps data rows to raw (unbounded) parameter columns.
///
/// Output shape is `(data.n_rows(), n_outputs())`; columns follow the
/// component's packed parameter names.
pub trait ParamNet: Debug + Send + Sync {
    fn n_outputs(&self) -> usize;

    fn forward(&self, data: &Data, xp: &dyn ArrayNamespace) -> ModelResult<Array2<f64>>;
}

/// Shared handle to a parameter network.
pub type NetRef = Arc<dyn ParamNet>;

/// Net that emits the same parameter row for every data point.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantNet {
    values: Vec<f64>,
}

impl ConstantNet {
    pub fn new(values: Vec<f64>) -> Self {
        ConstantNet { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl ParamNet for ConstantNet {
    fn n_outputs(&self) -> usize {
        self.values.len()
    }

    fn forward(&self, data: &Data, xp: &dyn ArrayNamespace) -> ModelResult<Array2<f64>> {
        let n = data.n_rows();
        let flat: Vec<f64> = (0..n).flat_map(|_| self.values.iter().copied()).collect();
        Ok(xp.asarray(&flat, (n, self.values.len()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xp::NdArrayNamespace;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Every row repeats the configured values; zero outputs give a
    // zero-width array.
    fn constant_rows() {
        let xp = NdArrayNamespace;
        let data = Data::new(array![[0.0], [1.0]], vec!["phi1"]).unwrap();
        let out = ConstantNet::new(vec![0.3, 1.5]).forward(&data, &xp).unwrap();
        assert_eq!(out, array![[0.3, 1.5], [0.3, 1.5]]);

        let empty = ConstantNet::new(vec![]).forward(&data, &xp).unwrap();
        assert_eq!(empty.dim(), (2, 0));
    }
}
