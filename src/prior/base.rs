//! The prior interface: an additive log-density term plus a forward clamp.
use crate::{
    data::Data,
    params::{FlatParamName, Params},
    prior::errors::{PriorError, PriorResult},
    xp::ArrayNamespace,
};
use ndarray::Array2;
use std::{fmt::Debug, sync::Arc};

/// Shared handle to an immutable prior.
pub type PriorRef = Arc<dyn Prior>;

/// A prior over model parameters.
///
/// Two capabilities are required:
///
/// - `logpdf`: an additive log-density penalty with one row per data point
///   and a single column. `current_lnpdf` is the running log-prior the term
///   will be added to; a prior may use it to *override* rather than add
///   (returning `want - current`).
/// - `forward`: a functional transform of the network output `nn`
///   (rows = data points, columns = `names`). The prior locates its own
///   column(s) by name and returns a new array.
pub trait Prior: Debug + Send + Sync {
    fn logpdf(
        &self, mpars: &Params, data: &Data, names: &[FlatParamName],
        current_lnpdf: Option<&Array2<f64>>, xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>>;

    fn forward(
        &self, nn: &Array2<f64>, data: &Data, names: &[FlatParamName], xp: &dyn ArrayNamespace,
    ) -> PriorResult<Array2<f64>>;
}

/// Column index of `name` in a forward-output layout.
pub(crate) fn locate(names: &[FlatParamName], name: &FlatParamName) -> PriorResult<usize> {
    names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| PriorError::ParamNotLocated { name: name.to_string() })
}

/// Check that a forward output has one column per name.
pub(crate) fn check_width(nn: &Array2<f64>, names: &[FlatParamName]) -> PriorResult<()> {
    if nn.ncols() != names.len() {
        return Err(PriorError::ShapeMismatch {
            name: "forward output".to_string(),
            expected: (nn.nrows(), names.len()),
            actual: nn.dim(),
        });
    }
    Ok(())
}
