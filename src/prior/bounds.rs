//! Prior bounds: per-parameter interval constraints.
//!
//! Purpose
//! -------
//! A prior bound constrains one flat parameter slot to `[lower, upper]`,
//! both as an additive log-density penalty (`logpdf`) and as a forward-pass
//! clamp of the network output (`forward`).
//!
//! Key behaviors
//! -------------
//! - [`NoBounds`]: `(-∞, ∞)`; zero penalty, identity forward pass.
//! - [`ClippedBounds`]: `-∞` penalty outside the interval, forward clamps
//!   into the interval.
//! - [`SigmoidBounds`]: forward maps through a scaled logistic so every
//!   output lands strictly inside the finite interval; penalty as clipped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Bounds are immutable. Binding to a slot returns a new instance via
//!   [`PriorBounds::with_param_name`].
//! - `logpdf` and `forward` require `param_name`; evaluating an unbound
//!   instance fails with `PriorError::MissingParamName`.
//! - A parameter entry with zero rows is a placeholder (the background
//!   weight before the mixture fills it) and contributes no penalty.
use crate::{
    data::Data,
    numerical_stability::safe_logistic,
    params::{FlatParamName, Params},
    prior::{
        base::{Prior, check_width, locate},
        errors::{PriorError, PriorResult},
    },
    xp::ArrayNamespace,
};
use ndarray::{Array2, ArrayView1, s};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handle to an immutable bound.
pub type BoundsRef = Arc<dyn PriorBounds>;

/// Serializable view of a bound, for inspection and round-tripping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsRecord {
    pub kind: String,
    pub param_name: Option<FlatParamName>,
    pub lower: f64,
    pub upper: f64,
}

/// Interval constraint on a single flat parameter.
pub trait PriorBounds: Prior {
    fn lower(&self) -> f64;
    fn upper(&self) -> f64;
    fn param_name(&self) -> Option<&FlatParamName>;

    /// Bound kind, used in records (`"none"`, `"clipped"`, `"sigmoid"`).
    fn kind(&self) -> &'static str;

    /// A copy of this bound tagged with `name`.
    fn with_param_name(&self, name: FlatParamName) -> BoundsRef;

    fn as_tuple(&self) -> (f64, f64) {
        (self.lower(), self.upper())
    }

    fn bounds(&self) -> (f64, f64) {
        self.as_tuple()
    }

    /// Yields `lower` then `upper`.
    fn iter_bounds(&self) -> std::array::IntoIter<f64, 2> {
        [self.lower(), self.upper()].into_iter()
    }

    fn to_record(&self) -> BoundsRecord {
        BoundsRecord {
            kind: self.kind().to_string(),
            param_name: self.param_name().cloned(),
            lower: self.lower(),
            upper: self.upper(),
        }
    }
}

/// Rebuild a bound from its record.
pub fn bounds_from_record(record: &BoundsRecord) -> PriorResult<BoundsRef> {
    let pair = (record.lower, record.upper);
    let name = record.param_name.clone();
    Ok(match record.kind.as_str() {
        "none" => Arc::new(NoBounds::from_tuple(pair, name)?),
        "clipped" => Arc::new(ClippedBounds::from_tuple(pair, name)?),
        "sigmoid" => Arc::new(SigmoidBounds::from_tuple(pair, name)?),
        _ => {
            return Err(PriorError::InvalidBounds {
                lower: record.lower,
                upper: record.upper,
                reason: "unknown bound kind",
            });
        }
    })
}

fn require_name(name: Option<&FlatParamName>) -> PriorResult<&FlatParamName> {
    name.ok_or(PriorError::MissingParamName)
}

/// Parameter column for `name`, or `None` for a zero-row placeholder.
fn param_column<'a>(
    mpars: &'a Params, name: &FlatParamName, n_rows: usize,
) -> PriorResult<Option<ArrayView1<'a, f64>>> {
    let arr = mpars.get_flat(name)?;
    if arr.nrows() == 0 {
        return Ok(None);
    }
    if arr.dim() != (n_rows, 1) {
        return Err(PriorError::ShapeMismatch {
            name: name.to_string(),
            expected: (n_rows, 1),
            actual: arr.dim(),
        });
    }
    Ok(Some(arr.column(0)))
}

/// `0` where the parameter lies in `[lower, upper]`, `-∞` elsewhere.
fn interval_lnpdf(
    mpars: &Params, data: &Data, name: &FlatParamName, lower: f64, upper: f64,
    xp: &dyn ArrayNamespace,
) -> PriorResult<Array2<f64>> {
    let mut out = xp.zeros((data.n_rows(), 1));
    if let Some(col) = param_column(mpars, name, data.n_rows())? {
        let inside = xp.within_bounds(col, lower, upper);
        for (o, &ok) in out.column_mut(0).iter_mut().zip(inside.iter()) {
            if !ok {
                *o = f64::NEG_INFINITY;
            }
        }
    }
    Ok(out)
}

fn validate_interval(lower: f64, upper: f64) -> PriorResult<()> {
    if lower.is_nan() || upper.is_nan() {
        return Err(PriorError::InvalidBounds { lower, upper, reason: "bounds must not be NaN" });
    }
    if lower >= upper {
        return Err(PriorError::InvalidBounds { lower, upper, reason: "lower must be < upper" });
    }
    Ok(())
}

// ---- NoBounds ----

/// The unconstrained bound `(-∞, ∞)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoBounds {
    param_name: Option<FlatParamName>,
}

impl NoBounds {
    pub fn new() -> Self {
        NoBounds { param_name: None }
    }

    /// Errors
    /// ------
    /// - `PriorError::InvalidBounds` unless the pair is exactly `(-∞, ∞)`.
    pub fn from_tuple(
        (lower, upper): (f64, f64), param_name: Option<FlatParamName>,
    ) -> PriorResult<Self> {
        if lower != f64::NEG_INFINITY || upper != f64::INFINITY {
            return Err(PriorError::InvalidBounds {
                lower,
                upper,
                reason: "lower and upper must be -inf and inf",
            });
        }
        Ok(NoBounds { param_name })
    }
}

impl Prior for NoBounds {
    fn logpdf(
        &self, _mpars: &Params, data: &Data, _names: &[FlatParamName],
        _current_lnpdf: Option<&Array2<f64>>, xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        require_name(self.param_name.as_ref())?;
        Ok(xp.zeros((data.n_rows(), 1)))
    }

    fn forward(
        &self, nn: &Array2<f64>, _data: &Data, _names: &[FlatParamName],
        _xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        Ok(nn.clone())
    }
}

impl PriorBounds for NoBounds {
    fn lower(&self) -> f64 {
        f64::NEG_INFINITY
    }

    fn upper(&self) -> f64 {
        f64::INFINITY
    }

    fn param_name(&self) -> Option<&FlatParamName> {
        self.param_name.as_ref()
    }

    fn kind(&self) -> &'static str {
        "none"
    }

    fn with_param_name(&self, name: FlatParamName) -> BoundsRef {
        Arc::new(NoBounds { param_name: Some(name) })
    }
}

// ---- ClippedBounds ----

/// Hard interval: forward clamps, `logpdf` is `-∞` outside.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedBounds {
    lower: f64,
    upper: f64,
    param_name: Option<FlatParamName>,
}

impl ClippedBounds {
    /// Errors
    /// ------
    /// - `PriorError::InvalidBounds` if either bound is NaN or `lower >= upper`.
    pub fn new(lower: f64, upper: f64) -> PriorResult<Self> {
        validate_interval(lower, upper)?;
        Ok(ClippedBounds { lower, upper, param_name: None })
    }

    pub fn from_tuple(
        (lower, upper): (f64, f64), param_name: Option<FlatParamName>,
    ) -> PriorResult<Self> {
        let mut out = ClippedBounds::new(lower, upper)?;
        out.param_name = param_name;
        Ok(out)
    }
}

impl Prior for ClippedBounds {
    fn logpdf(
        &self, mpars: &Params, data: &Data, _names: &[FlatParamName],
        _current_lnpdf: Option<&Array2<f64>>, xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        let name = require_name(self.param_name.as_ref())?;
        interval_lnpdf(mpars, data, name, self.lower, self.upper, xp)
    }

    fn forward(
        &self, nn: &Array2<f64>, _data: &Data, names: &[FlatParamName], xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        let name = require_name(self.param_name.as_ref())?;
        check_width(nn, names)?;
        let idx = locate(names, name)?;
        let mut out = nn.clone();
        let clipped = xp.clip(nn.column(idx), self.lower, self.upper);
        out.slice_mut(s![.., idx]).assign(&clipped);
        Ok(out)
    }
}

impl PriorBounds for ClippedBounds {
    fn lower(&self) -> f64 {
        self.lower
    }

    fn upper(&self) -> f64 {
        self.upper
    }

    fn param_name(&self) -> Option<&FlatParamName> {
        self.param_name.as_ref()
    }

    fn kind(&self) -> &'static str {
        "clipped"
    }

    fn with_param_name(&self, name: FlatParamName) -> BoundsRef {
        Arc::new(ClippedBounds { param_name: Some(name), ..self.clone() })
    }
}

// ---- SigmoidBounds ----

/// Smooth interval: forward maps `x ↦ lower + (upper − lower)·σ(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmoidBounds {
    lower: f64,
    upper: f64,
    param_name: Option<FlatParamName>,
}

impl SigmoidBounds {
    /// Errors
    /// ------
    /// - `PriorError::InvalidBounds` if either bound is non-finite or
    ///   `lower >= upper`.
    pub fn new(lower: f64, upper: f64) -> PriorResult<Self> {
        validate_interval(lower, upper)?;
        if !lower.is_finite() || !upper.is_finite() {
            return Err(PriorError::InvalidBounds {
                lower,
                upper,
                reason: "sigmoid bounds must be finite",
            });
        }
        Ok(SigmoidBounds { lower, upper, param_name: None })
    }

    pub fn from_tuple(
        (lower, upper): (f64, f64), param_name: Option<FlatParamName>,
    ) -> PriorResult<Self> {
        let mut out = SigmoidBounds::new(lower, upper)?;
        out.param_name = param_name;
        Ok(out)
    }
}

impl Prior for SigmoidBounds {
    fn logpdf(
        &self, mpars: &Params, data: &Data, _names: &[FlatParamName],
        _current_lnpdf: Option<&Array2<f64>>, xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        let name = require_name(self.param_name.as_ref())?;
        interval_lnpdf(mpars, data, name, self.lower, self.upper, xp)
    }

    fn forward(
        &self, nn: &Array2<f64>, _data: &Data, names: &[FlatParamName], _xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>> {
        let name = require_name(self.param_name.as_ref())?;
        check_width(nn, names)?;
        let idx = locate(names, name)?;
        let width = self.upper - self.lower;
        let mut out = nn.clone();
        out.slice_mut(s![.., idx]).mapv_inplace(|x| self.lower + width * safe_logistic(x));
        Ok(out)
    }
}

impl PriorBounds for SigmoidBounds {
    fn lower(&self) -> f64 {
        self.lower
    }

    fn upper(&self) -> f64 {
        self.upper
    }

    fn param_name(&self) -> Option<&FlatParamName> {
        self.param_name.as_ref()
    }

    fn kind(&self) -> &'static str {
        "sigmoid"
    }

    fn with_param_name(&self, name: FlatParamName) -> BoundsRef {
        Arc::new(SigmoidBounds { param_name: Some(name), ..self.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        params::{ParamEntry, Params},
        xp::NdArrayNamespace,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    fn data3() -> Data {
        Data::new(array![[0.0], [1.0], [2.0]], vec!["phi1"]).unwrap()
    }

    fn weight_params(values: Array2<f64>) -> Params {
        Params::new(vec![("weight", ParamEntry::Leaf(values))]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // `NoBounds` is constructible only as `(-∞, ∞)`.
    //
    // Given
    // -----
    // - `NoBounds::new()` and `NoBounds::from_tuple((1.0, 2.0), None)`.
    //
    // Expect
    // ------
    // - The first succeeds and iterates as `[-∞, ∞]`.
    // - The second fails with `PriorError::InvalidBounds`.
    fn nobounds_requires_infinite_pair() {
        let nb = NoBounds::new();
        assert_eq!(nb.as_tuple(), (f64::NEG_INFINITY, f64::INFINITY));
        assert_eq!(nb.iter_bounds().collect::<Vec<_>>(), vec![f64::NEG_INFINITY, f64::INFINITY]);

        assert!(matches!(
            NoBounds::from_tuple((1.0, 2.0), None),
            Err(PriorError::InvalidBounds { .. })
        ));
        assert!(NoBounds::from_tuple((f64::NEG_INFINITY, f64::INFINITY), None).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `NoBounds::logpdf` needs a param name and then returns zeros; its
    // forward pass is the identity.
    fn nobounds_logpdf_and_forward() {
        let xp = NdArrayNamespace;
        let data = data3();
        let mpars = weight_params(array![[0.1], [0.2], [0.3]]);
        let names = vec![FlatParamName::scalar("weight")];

        let unbound = NoBounds::new();
        assert_eq!(
            unbound.logpdf(&mpars, &data, &names, None, &xp).unwrap_err(),
            PriorError::MissingParamName
        );

        let bound = unbound.with_param_name(FlatParamName::scalar("weight"));
        let lp = bound.logpdf(&mpars, &data, &names, None, &xp).unwrap();
        assert_eq!(lp, Array2::<f64>::zeros((3, 1)));

        let nn = array![[0.3], [0.7], [0.9]];
        assert_eq!(bound.forward(&nn, &data, &names, &xp).unwrap(), nn);
    }

    #[test]
    // Purpose
    // -------
    // `ClippedBounds` penalizes out-of-interval values with `-∞` and clamps
    // the matching forward column only.
    //
    // Given
    // -----
    // - Bounds `[0, 1]` on `weight`; weights `[-0.5, 0.5, 1.5]`.
    // - Forward layout `[weight, phi2_mu]`.
    //
    // Expect
    // ------
    // - logpdf = `[-∞, 0, -∞]`.
    // - forward clamps column 0 to `[0, 0.5, 1]` and leaves column 1 alone.
    fn clipped_bounds_penalize_and_clamp() {
        let xp = NdArrayNamespace;
        let data = data3();
        let bound = ClippedBounds::new(0.0, 1.0).unwrap().with_param_name("weight".into());

        let mpars = weight_params(array![[-0.5], [0.5], [1.5]]);
        let names = vec![FlatParamName::scalar("weight"), FlatParamName::nested("phi2", "mu")];
        let lp = bound.logpdf(&mpars, &data, &names, None, &xp).unwrap();
        assert_eq!(lp.column(0).to_vec(), vec![f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY]);

        let nn = array![[-0.5, 9.0], [0.5, 9.0], [1.5, 9.0]];
        let out = bound.forward(&nn, &data, &names, &xp).unwrap();
        assert_eq!(out, array![[0.0, 9.0], [0.5, 9.0], [1.0, 9.0]]);

        assert!(matches!(ClippedBounds::new(1.0, 1.0), Err(PriorError::InvalidBounds { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `SigmoidBounds` maps the forward column into the open interval and
    // reports a missing column distinctly.
    fn sigmoid_bounds_forward_maps_into_interval() {
        let xp = NdArrayNamespace;
        let data = data3();
        let bound = SigmoidBounds::new(-2.0, 2.0).unwrap().with_param_name("weight".into());
        let names = vec![FlatParamName::scalar("weight")];

        let nn = array![[-50.0], [0.0], [50.0]];
        let out = bound.forward(&nn, &data, &names, &xp).unwrap();
        assert_relative_eq!(out[[1, 0]], 0.0, epsilon = 1e-12);
        assert!(out[[0, 0]] >= -2.0 && out[[2, 0]] <= 2.0);

        let other = vec![FlatParamName::scalar("sigma")];
        assert!(matches!(
            bound.forward(&nn, &data, &other, &xp),
            Err(PriorError::ParamNotLocated { .. })
        ));
        assert!(matches!(
            SigmoidBounds::new(0.0, f64::INFINITY),
            Err(PriorError::InvalidBounds { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Records round-trip through serde and rebuild an equivalent bound.
    fn records_round_trip() {
        let bound = ClippedBounds::new(0.0, 1.0).unwrap().with_param_name(("phi2", "mu").into());
        let json = serde_json::to_string(&bound.to_record()).unwrap();
        let record: BoundsRecord = serde_json::from_str(&json).unwrap();

        let rebuilt = bounds_from_record(&record).unwrap();
        assert_eq!(rebuilt.kind(), "clipped");
        assert_eq!(rebuilt.as_tuple(), (0.0, 1.0));
        assert_eq!(rebuilt.param_name(), Some(&FlatParamName::nested("phi2", "mu")));
    }
}
