//! Models — components and their mixture.
//!
//! Purpose
//! -------
//! Define the [`Model`] capability shared by every likelihood component and
//! by [`MixtureModel`], which aggregates named components into a single
//! per-row log-likelihood.
//!
//! Key behaviors
//! -------------
//! - Components own their parameter names, resolved bounds, priors, a
//!   [`ParamNet`] producing the packed parameter columns, and an injected
//!   array namespace.
//! - Packing and unpacking move between a structured [`Params`] and a flat
//!   `(n_rows, n_packed)` array in declared-name order.
//! - Mixtures prefix component parameters with `"{name}."` and combine
//!   likelihoods with log-sum-exp.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every per-row array (likelihood, prior, parameter value) is
//!   `(n_rows, 1)`; a `(0, 1)` parameter array is an unfilled placeholder.
//! - Resolved bounds cover exactly the declared flat names.
//!
//! [`Params`]: crate::params::Params
pub mod background;
pub mod base;
pub mod errors;
pub mod mixture;
pub mod net;
pub mod normal;

pub use self::background::UniformBackground;
pub use self::base::{ComponentCore, Model, ModelRef};
pub use self::errors::{ModelError, ModelResult};
pub use self::mixture::MixtureModel;
pub use self::net::{ConstantNet, NetRef, ParamNet};
pub use self::normal::NormalModel;
