//! Parameter names, bounds and values.
//!
//! Purpose
//! -------
//! The hierarchical parameter namespace shared by every model: declared
//! names ([`ParamNames`]), per-slot prior bounds ([`ParamBounds`]) and the
//! per-row parameter values produced by a forward pass ([`Params`]).
//!
//! Conventions
//! -----------
//! - Flat keys are [`FlatParamName`]s; the packed-array column order is
//!   `ParamNames::flats()`.
//! - Mixture models prefix component keys with `"{component}."`.
pub mod bounds;
pub mod core;
pub mod errors;
pub mod names;

pub use self::bounds::{BoundsEntry, BoundsValue, ParamBounds, ParamBoundsField};
pub use self::core::{MutableParams, ParamEntry, Params};
pub use self::errors::{ParamError, ParamResult};
pub use self::names::{FlatParamName, PREFIX_SEP, ParamName, ParamNames};
