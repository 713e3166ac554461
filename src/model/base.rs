//! The model capability and the shared component core.
//!
//! Purpose
//! -------
//! Define what every likelihood component (and every mixture of them)
//! provides: declared parameter names and bounds, priors, a forward pass that
//! yields packed parameter columns, and per-row log-likelihood / log-prior
//! arrays.
//!
//! Key behaviors
//! -------------
//! - [`Model`] carries default implementations for packing, unpacking, the
//!   bound-plus-prior log-prior, and every posterior / total reduction, so a
//!   concrete component only writes its likelihood and forward pass.
//! - [`ComponentCore`] bundles the state components share and implements the
//!   forward pipeline: net → bound clamps → prior transforms.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every per-row array is `(n_rows, 1)`.
//! - Packed arrays have one column per `packed_names()` entry, in order.
//! - Declared names absent from `packed_names()` unpack to a `(0, 1)`
//!   placeholder (the background weight).
//!
//! Conventions
//! -----------
//! - Parameters handed to a component are unprefixed; prefix handling is the
//!   mixture's job.
use crate::{
    data::Data,
    model::{
        errors::{ModelError, ModelResult},
        net::NetRef,
    },
    params::{
        FlatParamName, MutableParams, ParamBounds, ParamBoundsField, ParamError, ParamNames,
        Params,
    },
    prior::{NoBounds, PriorRef},
    xp::ArrayNamespace,
};
use ndarray::{Array2, ArrayView1, s};
use std::{fmt::Debug, sync::Arc};

/// Shared handle to a model.
pub type ModelRef = Arc<dyn Model>;

/// Likelihood component capability.
pub trait Model: Debug + Send + Sync {
    fn param_names(&self) -> &ParamNames;

    /// Resolved bounds, one leaf per declared flat name.
    fn param_bounds(&self) -> &ParamBounds;

    fn priors(&self) -> &[PriorRef];

    fn xp(&self) -> &dyn ArrayNamespace;

    /// Background components have no free weight; a mixture fills it in.
    fn is_background(&self) -> bool {
        false
    }

    /// Names of the forward-output columns.
    fn packed_names(&self) -> Vec<FlatParamName> {
        self.param_names().flats()
    }

    fn ln_likelihood_arr(&self, mpars: &Params, data: &Data) -> ModelResult<Array2<f64>>;

    /// Sum of every bound's `logpdf` then every prior's `logpdf`, each seeing
    /// the running total.
    fn ln_prior_arr(&self, mpars: &Params, data: &Data) -> ModelResult<Array2<f64>> {
        let xp = self.xp();
        let names = self.packed_names();
        let mut lp = xp.zeros((data.n_rows(), 1));
        for bound in self.param_bounds().flatvalues() {
            lp = &lp + &bound.logpdf(mpars, data, &names, Some(&lp), xp)?;
        }
        for prior in self.priors() {
            lp = &lp + &prior.logpdf(mpars, data, &names, Some(&lp), xp)?;
        }
        Ok(lp)
    }

    fn forward(&self, data: &Data) -> ModelResult<Array2<f64>>;

    /// Stack the packed parameters column-wise.
    fn pack_params_to_arr(&self, pars: &Params) -> ModelResult<Array2<f64>> {
        let names = self.packed_names();
        if names.is_empty() {
            return Ok(self.xp().zeros((0, 0)));
        }
        let cols = names.iter().map(|n| pars.get_flat(n)).collect::<Result<Vec<_>, _>>()?;
        let views: Vec<_> = cols.iter().map(|c| c.view()).collect();
        Ok(self.xp().hstack(&views)?)
    }

    /// Split a packed array into named `(n, 1)` columns.
    ///
    /// Errors
    /// ------
    /// - `ParamError::WidthMismatch` if the column count differs from
    ///   `packed_names().len()`.
    fn unpack_params_from_arr(&self, p_arr: &Array2<f64>) -> ModelResult<Params> {
        let packed = self.packed_names();
        if p_arr.ncols() != packed.len() {
            return Err(ParamError::WidthMismatch {
                expected: packed.len(),
                actual: p_arr.ncols(),
            }
            .into());
        }
        let mut pars = MutableParams::new();
        for name in self.param_names().flats() {
            let value = match packed.iter().position(|p| *p == name) {
                Some(i) => p_arr.slice(s![.., i..i + 1]).to_owned(),
                None => self.xp().zeros((0, 1)),
            };
            pars.set_param(&name, value)?;
        }
        Ok(pars.freeze())
    }

    fn ln_posterior_arr(&self, mpars: &Params, data: &Data) -> ModelResult<Array2<f64>> {
        Ok(self.ln_likelihood_arr(mpars, data)? + self.ln_prior_arr(mpars, data)?)
    }

    fn ln_likelihood_tot(&self, mpars: &Params, data: &Data) -> ModelResult<f64> {
        Ok(self.ln_likelihood_arr(mpars, data)?.sum())
    }

    fn ln_prior_tot(&self, mpars: &Params, data: &Data) -> ModelResult<f64> {
        Ok(self.ln_prior_arr(mpars, data)?.sum())
    }

    fn ln_posterior_tot(&self, mpars: &Params, data: &Data) -> ModelResult<f64> {
        Ok(self.ln_posterior_arr(mpars, data)?.sum())
    }
}

/// State shared by concrete components.
#[derive(Debug, Clone)]
pub struct ComponentCore {
    pub param_names: ParamNames,
    pub param_bounds: ParamBounds,
    pub priors: Vec<PriorRef>,
    pub net: NetRef,
    pub xp: Arc<dyn ArrayNamespace>,
}

impl ComponentCore {
    /// Resolve bounds against the declared names.
    ///
    /// Bounds start as `NoBounds` on every declared name, take the field's
    /// defaults, then `overrides` (top-level, right-biased).
    ///
    /// Errors
    /// ------
    /// - `ParamError::BoundsMismatch` if the resolved keys differ from the
    ///   declared flat names.
    pub fn new(
        param_names: ParamNames, field: &ParamBoundsField, overrides: Option<&ParamBounds>,
        priors: Vec<PriorRef>, net: NetRef, xp: Arc<dyn ArrayNamespace>,
    ) -> ModelResult<Self> {
        let base = ParamBounds::from_names(&param_names, &NoBounds::new());
        let param_bounds = ParamBounds::merged(&base, &field.resolve(overrides)).with_param_names();
        param_bounds.validate(&param_names, true)?;
        Ok(ComponentCore { param_names, param_bounds, priors, net, xp })
    }

    /// Check the net width against a component's packed names.
    pub fn check_net(&self, packed: &[FlatParamName]) -> ModelResult<()> {
        if self.net.n_outputs() != packed.len() {
            return Err(ModelError::NetWidth {
                expected: packed.len(),
                actual: self.net.n_outputs(),
            });
        }
        Ok(())
    }

    /// Net output, clamped by each bound whose slot is packed, then passed
    /// through each prior.
    pub fn forward(&self, data: &Data, packed: &[FlatParamName]) -> ModelResult<Array2<f64>> {
        let xp = self.xp.as_ref();
        let mut nn = self.net.forward(data, xp)?;
        if nn.dim() != (data.n_rows(), packed.len()) {
            return Err(ModelError::ShapeMismatch {
                name: "net output".to_string(),
                expected: (data.n_rows(), packed.len()),
                actual: nn.dim(),
            });
        }
        for bound in self.param_bounds.flatvalues() {
            if bound.param_name().is_some_and(|n| packed.contains(n)) {
                nn = bound.forward(&nn, data, packed, xp)?;
            }
        }
        for prior in &self.priors {
            nn = prior.forward(&nn, data, packed, xp)?;
        }
        Ok(nn)
    }
}

/// Column `(n, 1)` of `mpars` at `key` as a 1-D view, or `None` for a
/// zero-row placeholder.
pub(crate) fn param_column<'a>(
    mpars: &'a Params, key: &FlatParamName, n_rows: usize,
) -> ModelResult<Option<ArrayView1<'a, f64>>> {
    let arr = mpars.get_flat(key)?;
    if arr.nrows() == 0 {
        return Ok(None);
    }
    if arr.dim() != (n_rows, 1) {
        return Err(ModelError::ShapeMismatch {
            name: key.to_string(),
            expected: (n_rows, 1),
            actual: arr.dim(),
        });
    }
    Ok(Some(arr.column(0)))
}

/// Like [`param_column`] but a placeholder is an error.
pub(crate) fn required_column<'a>(
    mpars: &'a Params, key: &FlatParamName, n_rows: usize,
) -> ModelResult<ArrayView1<'a, f64>> {
    param_column(mpars, key, n_rows)?.ok_or_else(|| ModelError::ShapeMismatch {
        name: key.to_string(),
        expected: (n_rows, 1),
        actual: (0, 1),
    })
}
