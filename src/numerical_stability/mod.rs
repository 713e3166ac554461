//! numerical_stability — numerically robust scalar transforms and reductions.
//!
//! Purpose
//! -------
//! Collect the small numeric helpers shared by bounded priors, scalers and
//! mixture aggregation so the rest of the crate can assume well-conditioned
//! `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - `safe_logistic` maps unconstrained reals into `(0, 1)` without
//!   overflow; `SigmoidBounds` builds its forward map on it.
//! - `logsumexp` reduces log-densities with a max shift; the ndarray array
//!   namespace uses it for the mixture reduction along the component axis.
//! - `GENERAL_TOL` is the shared "effectively zero" threshold.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state.

pub mod transformations;

pub use self::transformations::{GENERAL_TOL, logsumexp, safe_logistic};
