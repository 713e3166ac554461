//! Gaussian stream-track component along one coordinate.
use crate::{
    data::Data,
    model::{
        base::{ComponentCore, Model, required_column},
        errors::{ModelError, ModelResult},
        net::NetRef,
    },
    params::{
        BoundsValue, FlatParamName, ParamBounds, ParamBoundsField, ParamName, ParamNames, Params,
    },
    prior::{BoundsRef, ClippedBounds, PriorRef},
    xp::ArrayNamespace,
};
use ndarray::Array2;
use statrs::distribution::{Continuous, Normal};
use std::sync::Arc;

/// `NormalModel` — `weight · N(x | mu, sigma)` on the column `coord`.
///
/// Parameters: `weight`, `(coord, (mu, sigma))`; the net emits them in that
/// order. Default bounds: `weight ∈ [0, 1]`, `sigma ∈ [1e-10, ∞)`, `mu`
/// unbounded.
#[derive(Debug, Clone)]
pub struct NormalModel {
    coord: String,
    core: ComponentCore,
}

impl NormalModel {
    /// Errors
    /// ------
    /// - `ParamError` if `coord` is empty or the bounds do not resolve onto
    ///   the declared names.
    /// - `ModelError::NetWidth` unless the net has three outputs.
    pub fn new(
        coord: impl Into<String>, net: NetRef, param_bounds: Option<&ParamBounds>,
        priors: Vec<PriorRef>, xp: Arc<dyn ArrayNamespace>,
    ) -> ModelResult<Self> {
        let coord = coord.into();
        let names = ParamNames::new(vec![
            ParamName::flat("weight"),
            ParamName::grouped(coord.clone(), vec!["mu", "sigma"]),
        ])?;
        let core = ComponentCore::new(
            names,
            &Self::default_bounds(&coord)?,
            param_bounds,
            priors,
            net,
            xp,
        )?;
        core.check_net(&core.param_names.flats())?;
        Ok(NormalModel { coord, core })
    }

    fn default_bounds(coord: &str) -> ModelResult<ParamBoundsField> {
        let weight: BoundsRef = Arc::new(ClippedBounds::new(0.0, 1.0)?);
        let sigma: BoundsRef = Arc::new(ClippedBounds::new(1e-10, f64::INFINITY)?);
        let defaults = ParamBounds::new(vec![
            ("weight".to_string(), BoundsValue::Bound(weight)),
            (coord.to_string(), BoundsValue::nested(vec![("mu", None), ("sigma", Some(sigma))])),
        ])?;
        Ok(ParamBoundsField::new("param_bounds", Some(defaults)))
    }

    pub fn coord(&self) -> &str {
        &self.coord
    }
}

impl Model for NormalModel {
    fn param_names(&self) -> &ParamNames {
        &self.core.param_names
    }

    fn param_bounds(&self) -> &ParamBounds {
        &self.core.param_bounds
    }

    fn priors(&self) -> &[PriorRef] {
        &self.core.priors
    }

    fn xp(&self) -> &dyn ArrayNamespace {
        self.core.xp.as_ref()
    }

    fn ln_likelihood_arr(&self, mpars: &Params, data: &Data) -> ModelResult<Array2<f64>> {
        let n = data.n_rows();
        let weight = required_column(mpars, &FlatParamName::scalar("weight"), n)?;
        let mu = required_column(mpars, &FlatParamName::nested(&self.coord, "mu"), n)?;
        let sigma = required_column(mpars, &FlatParamName::nested(&self.coord, "sigma"), n)?;
        let x = data.column(&self.coord)?;

        let mut out = self.xp().zeros((n, 1));
        for i in 0..n {
            let dist = Normal::new(mu[i], sigma[i])
                .map_err(|e| ModelError::Distribution { reason: e.to_string() })?;
            out[[i, 0]] = weight[i].ln() + dist.ln_pdf(x[i]);
        }
        Ok(out)
    }

    fn forward(&self, data: &Data) -> ModelResult<Array2<f64>> {
        self.core.forward(data, &self.packed_names())
    }
}
