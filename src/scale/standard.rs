//! Standardization to zero mean and unit variance.
use crate::{
    data::Data,
    scale::{
        affine::{AffineStats, Direction, guard_scale},
        api::{ArrayFormat, DataScaler, Scalable, ScalerRef},
        errors::ScaleResult,
    },
    xp::ArrayNamespace,
};
use ndarray::Axis;
use std::sync::Arc;

/// `StandardScaler` — `x ↦ (x − mean) / std` per column.
///
/// The standard deviation is the population one (`ddof = 0`); a column with
/// zero spread keeps scale `1`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    stats: AffineStats,
}

impl StandardScaler {
    /// Scaler with explicit statistics.
    ///
    /// Errors
    /// ------
    /// - `ScaleError::LengthMismatch` if `mean`/`scale` lengths differ from
    ///   `names`.
    /// - `ScaleError::DuplicateName` for a repeated column.
    pub fn new<S: Into<String>>(
        names: Vec<S>, mean: Vec<f64>, scale: Vec<f64>,
    ) -> ScaleResult<Self> {
        let names = names.into_iter().map(Into::into).collect();
        let scale = scale.into_iter().map(guard_scale).collect();
        Ok(StandardScaler { stats: AffineStats::new(names, mean, scale)? })
    }

    /// Fit column statistics of `names` in `data`.
    pub fn fit<S: AsRef<str>>(data: &Data, names: &[S]) -> ScaleResult<Self> {
        let sel = data.select(names)?;
        let arr = sel.array();
        let mean = match arr.mean_axis(Axis(0)) {
            Some(m) => m.to_vec(),
            None => vec![0.0; arr.ncols()],
        };
        let std = arr.std_axis(Axis(0), 0.0).to_vec();
        StandardScaler::new(sel.names().to_vec(), mean, std)
    }

    pub fn mean(&self) -> &[f64] {
        &self.stats.offset
    }

    pub fn scale(&self) -> &[f64] {
        &self.stats.scale
    }
}

impl DataScaler for StandardScaler {
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
        Ok(Arc::new(StandardScaler { stats: self.stats.subset(names)? }))
    }

    fn astype(&self, fmt: ArrayFormat) -> ScalerRef {
        Arc::new(StandardScaler { stats: self.stats.astype(fmt) })
    }

    fn format(&self) -> ArrayFormat {
        self.stats.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scale::ScaleError, xp::NdArrayNamespace};
    use approx::assert_relative_eq;
    use ndarray::array;

    fn data() -> Data {
        Data::new(array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]], vec!["phi1", "phi2"]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Fitting standardizes each column; a constant column maps to zero.
    //
    // Given
    // -----
    // - phi1 = `[1, 3, 5]` (mean 3), phi2 constant at 10.
    //
    // Expect
    // ------
    // - phi1 transforms to `[-a, 0, a]` with `a = 2 / sqrt(8/3)`.
    // - phi2 transforms to zeros.
    fn fit_and_transform() {
        let xp = NdArrayNamespace;
        let scaler = StandardScaler::fit(&data(), &["phi1", "phi2"]).unwrap();
        assert_eq!(scaler.mean(), &[3.0, 10.0]);
        assert_eq!(scaler.scale()[1], 1.0);

        let names: Vec<String> = vec!["phi1".into(), "phi2".into()];
        let out = scaler.transform(&Scalable::Named(data()), &names, Some(&xp)).unwrap();
        let a = 2.0 / (8.0_f64 / 3.0).sqrt();
        assert_relative_eq!(out.array()[[0, 0]], -a, epsilon = 1e-12);
        assert_relative_eq!(out.array()[[1, 0]], 0.0, epsilon = 1e-12);
        assert_eq!(out.array().column(1).to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // A transform without a namespace fails; raw input maps to raw output.
    fn namespace_required_and_kind_mirrored() {
        let scaler = StandardScaler::new(vec!["x"], vec![1.0], vec![2.0]).unwrap();
        let names = vec!["x".to_string()];
        let raw = Scalable::Raw(array![[3.0]]);
        assert_eq!(scaler.transform(&raw, &names, None).unwrap_err(), ScaleError::MissingNamespace);

        let xp = NdArrayNamespace;
        let out = scaler.transform(&raw, &names, Some(&xp)).unwrap();
        assert_eq!(out, Scalable::Raw(array![[1.0]]));
    }

    #[test]
    // Purpose
    // -------
    // A column whose spread is below the shared tolerance is treated as
    // constant.
    //
    // Given
    // -----
    // - x = `[1, 1 + 1e-14]`, population std `5e-15`.
    //
    // Expect
    // ------
    // - The fitted scale is exactly 1, so the column maps to near-zero values
    //   instead of `±1`.
    fn near_constant_column_gets_unit_scale() {
        let data = Data::new(array![[1.0], [1.0 + 1e-14]], vec!["x"]).unwrap();
        let scaler = StandardScaler::fit(&data, &["x"]).unwrap();
        assert_eq!(scaler.scale(), &[1.0]);

        let xp = NdArrayNamespace;
        let out = scaler.transform(&Scalable::Named(data), &["x".to_string()], Some(&xp)).unwrap();
        assert!(out.array().iter().all(|v| v.abs() < 1e-12));
    }
}
