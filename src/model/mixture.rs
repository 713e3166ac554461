//! `MixtureModel` — named components combined into one likelihood.
//!
//! Purpose
//! -------
//! Aggregate per-component log-likelihoods and log-priors over a shared
//! data set, with each component's parameters living under the
//! `"{component}."` prefix of one parameter set.
//!
//! Key behaviors
//! -------------
//! - `ln_likelihood_arr`: per component, strip its prefix from `pars`,
//!   evaluate, stack column-wise and reduce with log-sum-exp per row.
//! - `ln_prior_arr`: per component log-priors summed per row, then each
//!   mixture-wide prior added in order, seeing the running total.
//! - `forward`: component outputs concatenated in component order, then
//!   passed through each mixture-wide prior.
//! - Unpacking fills the background weight with `1 − Σ(other weights)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one component; names unique, non-empty and without `.`.
//! - At most one background component.
//! - Component order is insertion order and fixes both the packed column
//!   layout and the log-sum-exp operand order.
use crate::{
    data::Data,
    model::{
        base::{Model, ModelRef, param_column},
        errors::{ModelError, ModelResult},
    },
    params::{FlatParamName, ParamBounds, ParamError, ParamNames, Params, PREFIX_SEP},
    prior::PriorRef,
    xp::ArrayNamespace,
};
use ndarray::{Array2, Axis, s};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct MixtureModel {
    components: Vec<(String, ModelRef)>,
    priors: Vec<PriorRef>,
    param_names: ParamNames,
    param_bounds: ParamBounds,
    xp: Arc<dyn ArrayNamespace>,
}

impl MixtureModel {
    /// Combine `components` (in order) under mixture-wide `priors`.
    ///
    /// Errors
    /// ------
    /// - `ModelError::EmptyMixture` for no components.
    /// - `ModelError::InvalidComponentName` for an empty name or one
    ///   containing `.`.
    /// - `ModelError::DuplicateComponent` for a repeated name.
    /// - `ModelError::MultipleBackgrounds` for a second background.
    pub fn new<S: Into<String>>(
        components: Vec<(S, ModelRef)>, priors: Vec<PriorRef>, xp: Arc<dyn ArrayNamespace>,
    ) -> ModelResult<Self> {
        if components.is_empty() {
            return Err(ModelError::EmptyMixture);
        }
        let components: Vec<(String, ModelRef)> =
            components.into_iter().map(|(n, m)| (n.into(), m)).collect();

        let mut background: Option<&str> = None;
        for (i, (name, model)) in components.iter().enumerate() {
            if name.is_empty() || name.contains(PREFIX_SEP) {
                return Err(ModelError::InvalidComponentName { name: name.clone() });
            }
            if components[..i].iter().any(|(n, _)| n == name) {
                return Err(ModelError::DuplicateComponent { name: name.clone() });
            }
            if model.is_background() {
                if let Some(first) = background {
                    return Err(ModelError::MultipleBackgrounds {
                        first: first.to_string(),
                        second: name.clone(),
                    });
                }
                background = Some(name.as_str());
            }
        }

        let param_names = ParamNames::concat(
            components.iter().map(|(name, model)| model.param_names().prefixed(name)),
        )?;
        let param_bounds = components.iter().fold(ParamBounds::empty(), |acc, (name, model)| {
            ParamBounds::merged(&acc, &model.param_bounds().prefixed(name))
        });

        debug!(
            components = ?components.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            n_priors = priors.len(),
            n_params = param_names.flats().len(),
            xp = xp.name(),
            "built mixture model"
        );
        Ok(MixtureModel { components, priors, param_names, param_bounds, xp })
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, &ModelRef)> {
        self.components.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn component(&self, name: &str) -> Option<&ModelRef> {
        self.components.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    /// `1 − Σ` of every non-background component's weight, per row.
    fn background_weight(&self, pars: &Params, n_rows: usize) -> ModelResult<Array2<f64>> {
        let mut weight = Array2::<f64>::ones((n_rows, 1));
        for (name, model) in &self.components {
            if model.is_background() {
                continue;
            }
            let key = FlatParamName::scalar(format!("{name}{PREFIX_SEP}weight"));
            if !pars.contains_flat(&key) {
                continue;
            }
            if let Some(w) = param_column(pars, &key, n_rows)? {
                weight.column_mut(0).zip_mut_with(&w, |acc, &x| *acc -= x);
            }
        }
        Ok(weight)
    }
}

impl Model for MixtureModel {
    fn param_names(&self) -> &ParamNames {
        &self.param_names
    }

    fn param_bounds(&self) -> &ParamBounds {
        &self.param_bounds
    }

    fn priors(&self) -> &[PriorRef] {
        &self.priors
    }

    fn xp(&self) -> &dyn ArrayNamespace {
        self.xp.as_ref()
    }

    /// Each component's packed names, prefixed, in component order.
    fn packed_names(&self) -> Vec<FlatParamName> {
        self.components
            .iter()
            .flat_map(|(name, model)| {
                model.packed_names().into_iter().map(|n| n.prefixed(name)).collect::<Vec<_>>()
            })
            .collect()
    }

    fn ln_likelihood_arr(&self, pars: &Params, data: &Data) -> ModelResult<Array2<f64>> {
        let liks = self
            .components
            .iter()
            .map(|(name, model)| model.ln_likelihood_arr(&pars.get_prefixed(name), data))
            .collect::<ModelResult<Vec<_>>>()?;
        let views: Vec<_> = liks.iter().map(|l| l.view()).collect();
        let stacked = self.xp.hstack(&views)?;
        trace!(shape = ?stacked.dim(), "mixture ln-likelihood operands");
        Ok(self.xp.logsumexp(stacked.view(), Axis(1)).insert_axis(Axis(1)))
    }

    fn ln_prior_arr(&self, pars: &Params, data: &Data) -> ModelResult<Array2<f64>> {
        let lps = self
            .components
            .iter()
            .map(|(name, model)| model.ln_prior_arr(&pars.get_prefixed(name), data))
            .collect::<ModelResult<Vec<_>>>()?;
        let views: Vec<_> = lps.iter().map(|l| l.view()).collect();
        let mut lp = self.xp.hstack(&views)?.sum_axis(Axis(1)).insert_axis(Axis(1));

        let names = self.packed_names();
        for prior in &self.priors {
            lp = &lp + &prior.logpdf(pars, data, &names, Some(&lp), self.xp.as_ref())?;
        }
        trace!(n_priors = self.priors.len(), "mixture ln-prior aggregated");
        Ok(lp)
    }

    fn forward(&self, data: &Data) -> ModelResult<Array2<f64>> {
        let outs = self
            .components
            .iter()
            .map(|(_, model)| model.forward(data))
            .collect::<ModelResult<Vec<_>>>()?;
        let views: Vec<_> = outs.iter().map(|o| o.view()).collect();
        let mut result = self.xp.hstack(&views)?;

        let names = self.packed_names();
        for prior in &self.priors {
            result = prior.forward(&result, data, &names, self.xp.as_ref())?;
        }
        Ok(result)
    }

    fn pack_params_to_arr(&self, pars: &Params) -> ModelResult<Array2<f64>> {
        let blocks = self
            .components
            .iter()
            .filter(|(_, model)| !model.packed_names().is_empty())
            .map(|(name, model)| model.pack_params_to_arr(&pars.get_prefixed(name)))
            .collect::<ModelResult<Vec<_>>>()?;
        if blocks.is_empty() {
            return Ok(self.xp.zeros((0, 0)));
        }
        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        Ok(self.xp.hstack(&views)?)
    }

    /// Split by component, unpack each block, re-prefix, then fill the
    /// background weight.
    fn unpack_params_from_arr(&self, p_arr: &Array2<f64>) -> ModelResult<Params> {
        let total = self.packed_names().len();
        if p_arr.ncols() != total {
            return Err(ParamError::WidthMismatch { expected: total, actual: p_arr.ncols() }.into());
        }
        let mut pars = Params::default().thaw();
        let mut background: Option<&str> = None;
        let mut offset = 0;
        for (name, model) in &self.components {
            let width = model.packed_names().len();
            let block = p_arr.slice(s![.., offset..offset + width]).to_owned();
            offset += width;
            for (key, value) in model.unpack_params_from_arr(&block)?.add_prefix(name).flatitems() {
                pars.set_param(&key, value.clone())?;
            }
            if model.is_background() {
                background = Some(name.as_str());
            }
        }
        if let Some(name) = background {
            let partial = pars.clone().freeze();
            let weight = self.background_weight(&partial, p_arr.nrows())?;
            pars.set_param(&FlatParamName::scalar(format!("{name}{PREFIX_SEP}weight")), weight)?;
        }
        Ok(pars.freeze())
    }
}
