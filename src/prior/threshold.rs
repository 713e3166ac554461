//! Hard weight threshold over a coordinate window.
use crate::{
    data::Data,
    params::{FlatParamName, Params},
    prior::{
        base::{Prior, check_width, locate},
        errors::{PriorError, PriorResult},
    },
    xp::ArrayNamespace,
};
use ndarray::Array2;

/// `BoundedHardThreshold` — forbid small weights inside a coordinate window.
///
/// On rows whose `coord_name` value lies in `[lower, upper]`:
/// - `logpdf` is `-∞` where the weight is below `threshold`;
/// - `forward` sets the weight column to `0` where it is `<= threshold`.
///
/// Rows outside the window are untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedHardThreshold {
    pub threshold: f64,
    pub coord_name: String,
    pub lower: f64,
    pub upper: f64,
    pub param_name: FlatParamName,
}

impl Default for BoundedHardThreshold {
    fn default() -> Self {
        BoundedHardThreshold {
            threshold: 0.005,
            coord_name: "phi1".to_string(),
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            param_name: FlatParamName::scalar("weight"),
        }
    }
}

impl BoundedHardThreshold {
    /// Errors
    /// ------
    /// - `PriorError::InvalidThreshold` if `threshold` is not finite.
    pub fn new(threshold: f64) -> PriorResult<Self> {
        if !threshold.is_finite() {
            return Err(PriorError::InvalidThreshold { value: threshold });
        }
        Ok(BoundedHardThreshold { threshold, ..Default::default() })
    }

    pub fn with_coord(mut self, coord_name: impl Into<String>) -> Self {
        self.coord_name = coord_name.into();
        self
    }

    /// Errors
    /// ------
    /// - `PriorError::InvalidBounds` if either bound is NaN or `lower > upper`.
    pub fn with_window(mut self, lower: f64, upper: f64) -> PriorResult<Self> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(PriorError::InvalidBounds { lower, upper, reason: "invalid window" });
        }
        self.lower = lower;
        self.upper = upper;
        Ok(self)
    }

    /// Target a differently named weight, e.g. `("stream.weight",)` inside a
    /// mixture.
    pub fn with_param_name(mut self, name: FlatParamName) -> Self {
        self.param_name = name;
        self
    }
}

impl Prior for BoundedHardThreshold {
    fn logpdf(
        &self, mpars: &Params, data: &Data, _names: &[FlatParamName],
        _current_lnpdf: Option<&Array2<f64>>, xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        let n = data.n_rows();
        let mut out = xp.zeros((n, 1));
        let weight = mpars.get_flat(&self.param_name)?;
        if weight.nrows() == 0 {
            return Ok(out);
        }
        if weight.dim() != (n, 1) {
            return Err(PriorError::ShapeMismatch {
                name: self.param_name.to_string(),
                expected: (n, 1),
                actual: weight.dim(),
            });
        }
        let inside = xp.within_bounds(data.column(&self.coord_name)?, self.lower, self.upper);
        for ((o, &w), &ok) in out.column_mut(0).iter_mut().zip(weight.column(0)).zip(&inside) {
            if ok && w < self.threshold {
                *o = f64::NEG_INFINITY;
            }
        }
        Ok(out)
    }

    fn forward(
        &self, nn: &Array2<f64>, data: &Data, names: &[FlatParamName], xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        check_width(nn, names)?;
        let idx = locate(names, &self.param_name)?;
        let inside = xp.within_bounds(data.column(&self.coord_name)?, self.lower, self.upper);
        let gated = xp.threshold(nn.column(idx), self.threshold, 0.0);

        let mut out = nn.clone();
        for ((o, &g), &ok) in out.column_mut(idx).iter_mut().zip(&gated).zip(&inside) {
            if ok {
                *o = g;
            }
        }
        Ok(out)
    }
}
