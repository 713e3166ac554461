//! Uniform background component.
use crate::{
    data::Data,
    model::{
        base::{ComponentCore, Model, param_column},
        errors::{ModelError, ModelResult},
        net::NetRef,
    },
    params::{
        BoundsValue, FlatParamName, ParamBounds, ParamBoundsField, ParamName, ParamNames, Params,
    },
    prior::{ClippedBounds, PriorRef},
    xp::ArrayNamespace,
};
use ndarray::Array2;
use std::sync::Arc;

/// `UniformBackground` — flat density on `[lower, upper]` along `coord`.
///
/// The only parameter is `weight`, which is not packed: inside a mixture it
/// is `1 − Σ(other weights)`. Evaluated on its own with a placeholder
/// weight, the component is the bare density (`ln w = 0`).
#[derive(Debug, Clone)]
pub struct UniformBackground {
    coord: String,
    lower: f64,
    upper: f64,
    core: ComponentCore,
}

impl UniformBackground {
    /// Errors
    /// ------
    /// - `ModelError::InvalidDomain` unless `lower < upper`, both finite.
    /// - `ModelError::NetWidth` unless the net has zero outputs.
    pub fn new(
        coord: impl Into<String>, lower: f64, upper: f64, net: NetRef,
        param_bounds: Option<&ParamBounds>, priors: Vec<PriorRef>, xp: Arc<dyn ArrayNamespace>,
    ) -> ModelResult<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(ModelError::InvalidDomain { lower, upper });
        }
        let names = ParamNames::new(vec![ParamName::flat("weight")])?;
        let defaults = ParamBounds::new(vec![(
            "weight",
            BoundsValue::bound(ClippedBounds::new(0.0, 1.0)?),
        )])?;
        let field = ParamBoundsField::new("param_bounds", Some(defaults));
        let core = ComponentCore::new(names, &field, param_bounds, priors, net, xp)?;
        let out = UniformBackground { coord: coord.into(), lower, upper, core };
        out.core.check_net(&out.packed_names())?;
        Ok(out)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl Model for UniformBackground {
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

    fn is_background(&self) -> bool {
        true
    }

    fn packed_names(&self) -> Vec<FlatParamName> {
        let weight = FlatParamName::scalar("weight");
        self.param_names().flats().into_iter().filter(|n| *n != weight).collect()
    }

    fn ln_likelihood_arr(&self, mpars: &Params, data: &Data) -> ModelResult<Array2<f64>> {
        let n = data.n_rows();
        let weight = param_column(mpars, &FlatParamName::scalar("weight"), n)?;
        let x = data.column(&self.coord)?;
        let inside = self.xp().within_bounds(x, self.lower, self.upper);
        let ln_density = -(self.upper - self.lower).ln();

        let mut out = self.xp().zeros((n, 1));
        for i in 0..n {
            let ln_w = weight.as_ref().map_or(0.0, |w| w[i].ln());
            out[[i, 0]] = if inside[i] { ln_w + ln_density } else { f64::NEG_INFINITY };
        }
        Ok(out)
    }

    fn forward(&self, data: &Data) -> ModelResult<Array2<f64>> {
        self.core.forward(data, &self.packed_names())
    }
}
