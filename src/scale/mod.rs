//! Data scalers.
//!
//! Purpose
//! -------
//! Invertible per-column transforms applied to data before the forward pass
//! and undone afterwards.
//!
//! Key behaviors
//! -------------
//! - [`DataScaler`] is the common interface; [`StandardScaler`] and
//!   [`MinMaxScaler`] are the leaf kinds.
//! - [`CompoundDataScaler`] composes leaf (or compound) scalers over
//!   disjoint column sets.
//!
//! Conventions
//! -----------
//! - Input and output are [`Scalable`]: named [`Data`](crate::data::Data) or
//!   a raw array with an explicit name list.
//! - Scalers are immutable; `subset` and `astype` return new handles.
mod affine;
pub mod api;
pub mod compound;
pub mod errors;
pub mod minmax;
pub mod standard;

pub use self::api::{ArrayFormat, DataScaler, Scalable, ScalerRef};
pub use self::compound::CompoundDataScaler;
pub use self::errors::{ScaleError, ScaleResult};
pub use self::minmax::MinMaxScaler;
pub use self::standard::StandardScaler;
