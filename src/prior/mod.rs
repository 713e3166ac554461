//! Priors and prior bounds.
//!
//! A [`Prior`] contributes an additive log-density term and a forward-pass
//! transform. [`PriorBounds`] specializes it to an interval on one flat
//! parameter slot; [`BoundedHardThreshold`] is a data-dependent weight prior.
pub mod base;
pub mod bounds;
pub mod errors;
pub mod threshold;

pub use self::base::{Prior, PriorRef};
pub use self::bounds::{
    BoundsRecord, BoundsRef, ClippedBounds, NoBounds, PriorBounds, SigmoidBounds,
    bounds_from_record,
};
pub use self::errors::{PriorError, PriorResult};
pub use self::threshold::BoundedHardThreshold;
