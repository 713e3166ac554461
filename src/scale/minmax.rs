//! Min-max scaling onto `[0, 1]`.
use crate::{
    data::Data,
    scale::{
        affine::{AffineStats, Direction, guard_scale},
        api::{ArrayFormat, DataScaler, Scalable, ScalerRef},
        errors::{ScaleError, ScaleResult},
    },
    xp::ArrayNamespace,
};
use ndarray::Axis;
use std::sync::Arc;

/// `MinMaxScaler` — `x ↦ (x − min) / (max − min)` per column.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    stats: AffineStats,
}

impl MinMaxScaler {
    /// Scaler from per-column minima and maxima.
    ///
    /// Errors
    /// ------
    /// - `ScaleError::LengthMismatch` if `min`/`max` lengths differ from
    ///   `names`.
    /// - `ScaleError::DuplicateName` for a repeated column.
    pub fn new<S: Into<String>>(names: Vec<S>, min: Vec<f64>, max: Vec<f64>) -> ScaleResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if max.len() != names.len() {
            return Err(ScaleError::LengthMismatch { expected: names.len(), actual: max.len() });
        }
        let range = min.iter().zip(&max).map(|(lo, hi)| guard_scale(hi - lo)).collect();
        Ok(MinMaxScaler { stats: AffineStats::new(names, min, range)? })
    }

    pub fn fit<S: AsRef<str>>(data: &Data, names: &[S]) -> ScaleResult<Self> {
        let sel = data.select(names)?;
        let arr = sel.array();
        let min = arr.fold_axis(Axis(0), f64::INFINITY, |acc, &x| acc.min(x)).to_vec();
        let max = arr.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &x| acc.max(x)).to_vec();
        MinMaxScaler::new(sel.names().to_vec(), min, max)
    }

    pub fn min(&self) -> &[f64] {
        &self.stats.offset
    }

    /// `max − min` per column (or `1` for a constant column).
    pub fn range(&self) -> &[f64] {
        &self.stats.scale
    }
}

impl DataScaler for MinMaxScaler {
    fn names(&self) -> &[String] {
        &self.stats.names
    }

    fn transform(
        &self, data: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>,
    ) -> ScaleResult<Scalable> {
        self.stats.apply(data, names, xp, Direction::Forward)
    }

    fn inverse_transform(
        &self, data: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>,
    ) -> ScaleResult<Scalable> {
        self.stats.apply(data, names, xp, Direction::Inverse)
    }

    fn subset(&self, names: &[String]) -> ScaleResult<ScalerRef> {
        Ok(Arc::new(MinMaxScaler { stats: self.stats.subset(names)? }))
    }

    fn astype(&self, fmt: ArrayFormat) -> ScalerRef {
        Arc::new(MinMaxScaler { stats: self.stats.astype(fmt) })
    }

    fn format(&self) -> ArrayFormat {
        self.stats.format
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
    // Fitted min-max scaling maps the observed range onto `[0, 1]`, and a
    // subset keeps only the requested column statistics.
    fn fit_maps_range_to_unit_interval() {
        let xp = NdArrayNamespace;
        let data = Data::new(array![[2.0, -1.0], [4.0, 1.0], [6.0, 0.0]], vec!["a", "b"]).unwrap();
        let scaler = MinMaxScaler::fit(&data, &["a", "b"]).unwrap();
        assert_eq!(scaler.min(), &[2.0, -1.0]);
        assert_eq!(scaler.range(), &[4.0, 2.0]);

        let names: Vec<String> = vec!["a".into(), "b".into()];
        let out = scaler.transform(&Scalable::Named(data), &names, Some(&xp)).unwrap();
        assert_eq!(out.array(), &array![[0.0, 0.0], [0.5, 1.0], [1.0, 0.5]]);

        let sub = scaler.subset(&["b".to_string()]).unwrap();
        assert_eq!(sub.names(), &["b".to_string()]);
        assert!(matches!(
            scaler.subset(&["c".to_string()]),
            Err(ScaleError::UnknownColumn { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Statistics whose lengths disagree with the names are rejected, even
    // when only `max` is too long.
    fn mismatched_statistics_are_rejected() {
        let err = MinMaxScaler::new(vec!["a"], vec![0.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, ScaleError::LengthMismatch { expected: 1, actual: 2 });
        let err = MinMaxScaler::new(vec!["a", "b"], vec![0.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, ScaleError::LengthMismatch { expected: 2, actual: 1 });
    }
}
