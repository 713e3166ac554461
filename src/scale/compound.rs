//! `CompoundDataScaler` — disjoint sub-scalers composed column-wise.
//!
//! Purpose
//! -------
//! Scale data whose columns are handled by different scalers (e.g. angular
//! coordinates min-max scaled, photometry standardized) through one handle.
//!
//! Key behaviors
//! -------------
//! - Each requested column is routed to its owning sub-scaler; a sub-scaler
//!   sees its own columns in its own order.
//! - Results are concatenated in sub-scaler order, so the output column
//!   order is the sub-scaler order of the requested columns, not the
//!   request order.
//! - Output kind mirrors input kind: `Raw` in, `Raw` out; `Named` in,
//!   `Named` out.
//!
//! Invariants & assumptions
//! ------------------------
//! - Column names are unique across all sub-scalers.
//! - Every transform requires an array namespace.
use crate::{
    scale::{
        api::{ArrayFormat, DataScaler, Scalable, ScalerRef},
        errors::{ScaleError, ScaleResult},
    },
    xp::ArrayNamespace,
};
use ndarray::Array2;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CompoundDataScaler {
    scalers: Vec<ScalerRef>,
    names: Vec<String>,
}

impl CompoundDataScaler {
    /// Compose `scalers`.
    ///
    /// Errors
    /// ------
    /// - `ScaleError::EmptyCompound` if `scalers` is empty.
    /// - `ScaleError::DuplicateName` naming the first column owned twice.
    pub fn new(scalers: Vec<ScalerRef>) -> ScaleResult<Self> {
        if scalers.is_empty() {
            return Err(ScaleError::EmptyCompound);
        }
        let mut names: Vec<String> = Vec::new();
        for scaler in &scalers {
            for name in scaler.names() {
                if names.contains(name) {
                    return Err(ScaleError::DuplicateName { name: name.clone() });
                }
                names.push(name.clone());
            }
        }
        debug!(n_scalers = scalers.len(), columns = ?names, "built compound scaler");
        Ok(CompoundDataScaler { scalers, names })
    }

    pub fn scalers(&self) -> &[ScalerRef] {
        &self.scalers
    }

    /// Requested columns owned by `scaler`, in the scaler's order.
    fn owned(scaler: &dyn DataScaler, names: &[String]) -> Vec<String> {
        scaler.names().iter().filter(|n| names.contains(n)).cloned().collect()
    }

    fn route(
        &self, input: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>, inverse: bool,
    ) -> ScaleResult<Scalable> {
        let xp = xp.ok_or(ScaleError::MissingNamespace)?;
        if names.is_empty() {
            return Err(ScaleError::EmptySelection);
        }
        if let Some(stray) = names.iter().find(|n| !self.names.contains(n)) {
            return Err(ScaleError::UnknownColumn { name: stray.clone() });
        }
        let data = input.to_data(names, xp)?;

        let mut blocks: Vec<Array2<f64>> = Vec::with_capacity(self.scalers.len());
        let mut out_names: Vec<String> = Vec::with_capacity(names.len());
        for scaler in &self.scalers {
            let ns = Self::owned(scaler.as_ref(), names);
            if ns.is_empty() {
                continue;
            }
            let sub = Scalable::Named(data.select(&ns)?);
            let v = if inverse {
                scaler.inverse_transform(&sub, &ns, Some(xp))?
            } else {
                scaler.transform(&sub, &ns, Some(xp))?
            };
            blocks.push(v.into_array());
            out_names.extend(ns);
        }
        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        input.mirror(xp.hstack(&views)?, out_names)
    }
}

impl DataScaler for CompoundDataScaler {
    fn names(&self) -> &[String] {
        &self.names
    }

    fn transform(
        &self, data: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>,
    ) -> ScaleResult<Scalable> {
        self.route(data, names, xp, false)
    }

    fn inverse_transform(
        &self, data: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>,
    ) -> ScaleResult<Scalable> {
        self.route(data, names, xp, true)
    }

    /// The single contributing sub-scaler (subset), or a compound over the
    /// contributing subsets.
    fn subset(&self, names: &[String]) -> ScaleResult<ScalerRef> {
        let mut parts: Vec<ScalerRef> = Vec::new();
        for scaler in &self.scalers {
            let ns = Self::owned(scaler.as_ref(), names);
            if !ns.is_empty() {
                parts.push(scaler.subset(&ns)?);
            }
        }
        match parts.len() {
            0 => Err(ScaleError::EmptySelection),
            1 => Ok(parts.remove(0)),
            _ => Ok(Arc::new(CompoundDataScaler::new(parts)?)),
        }
    }

    fn astype(&self, fmt: ArrayFormat) -> ScalerRef {
        Arc::new(CompoundDataScaler {
            scalers: self.scalers.iter().map(|s| s.astype(fmt)).collect(),
            names: self.names.clone(),
        })
    }

    /// Format of the first sub-scaler; `astype` keeps them uniform.
    fn format(&self) -> ArrayFormat {
        self.scalers.first().map_or(ArrayFormat::Float64, |s| s.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::Data,
        scale::{MinMaxScaler, StandardScaler},
        xp::NdArrayNamespace,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    fn compound() -> CompoundDataScaler {
        CompoundDataScaler::new(vec![
            Arc::new(
                StandardScaler::new(vec!["phi1", "phi2"], vec![1.0, 2.0], vec![2.0, 4.0]).unwrap(),
            ) as ScalerRef,
            Arc::new(MinMaxScaler::new(vec!["pm1"], vec![-1.0], vec![1.0]).unwrap()),
        ])
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Transform followed by inverse transform recovers the input for both
    // input kinds.
    //
    // Given
    // -----
    // - Standard scaler on `phi1, phi2`, min-max scaler on `pm1`.
    // - A 2×3 array with columns `phi1, phi2, pm1`.
    //
    // Expect
    // ------
    // - Raw input round-trips to a raw array equal within 1e-12.
    // - Named input round-trips to `Data` with names `phi1, phi2, pm1`.
    fn round_trip_recovers_input() {
        let xp = NdArrayNamespace;
        let scaler = compound();
        let ns = names(&["phi1", "phi2", "pm1"]);
        let x = array![[0.5, 3.0, 0.2], [-1.0, 10.0, -0.9]];

        let fwd = scaler.transform(&Scalable::Raw(x.clone()), &ns, Some(&xp)).unwrap();
        assert!(!fwd.is_named());
        assert_relative_eq!(fwd.array()[[0, 2]], 0.6, epsilon = 1e-12);
        let back = scaler.inverse_transform(&fwd, &ns, Some(&xp)).unwrap();
        for (a, b) in back.array().iter().zip(x.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }

        let named = Scalable::Named(Data::new(x.clone(), ns.clone()).unwrap());
        let back = scaler
            .inverse_transform(&scaler.transform(&named, &ns, Some(&xp)).unwrap(), &ns, Some(&xp))
            .unwrap();
        match back {
            Scalable::Named(d) => {
                assert_eq!(d.names(), ns.as_slice());
                for (a, b) in d.array().iter().zip(x.iter()) {
                    assert_relative_eq!(*a, *b, epsilon = 1e-12);
                }
            }
            Scalable::Raw(_) => panic!("named input must produce named output"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A column owned by two sub-scalers is rejected at construction.
    fn duplicate_column_is_rejected() {
        let err = CompoundDataScaler::new(vec![
            Arc::new(StandardScaler::new(vec!["phi1"], vec![0.0], vec![1.0]).unwrap()) as ScalerRef,
            Arc::new(MinMaxScaler::new(vec!["phi1"], vec![0.0], vec![1.0]).unwrap()),
        ])
        .unwrap_err();
        assert_eq!(err, ScaleError::DuplicateName { name: "phi1".into() });
        assert!(err.to_string().contains("phi1"));
    }

    #[test]
    // Purpose
    // -------
    // Partial requests route to owners only; outputs follow sub-scaler
    // order; missing namespace and stray columns fail.
    fn routing_and_preconditions() {
        let xp = NdArrayNamespace;
        let scaler = compound();
        let ns = names(&["pm1", "phi1"]);
        let data = Scalable::Named(Data::new(array![[1.0, 3.0]], ns.clone()).unwrap());

        let out = scaler.transform(&data, &ns, Some(&xp)).unwrap();
        match &out {
            Scalable::Named(d) => assert_eq!(d.names(), names(&["phi1", "pm1"]).as_slice()),
            Scalable::Raw(_) => panic!("expected named output"),
        }
        assert_eq!(out.array(), &array![[1.0, 1.0]]);

        assert_eq!(scaler.transform(&data, &ns, None).unwrap_err(), ScaleError::MissingNamespace);
        assert!(matches!(
            scaler.transform(&data, &names(&["nope"]), Some(&xp)),
            Err(ScaleError::UnknownColumn { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Subsetting returns the sole contributor directly or a smaller
    // compound; `astype` converts every sub-scaler.
    fn subset_and_astype() {
        let scaler = compound();

        let single = scaler.subset(&names(&["phi2"])).unwrap();
        assert_eq!(single.names(), names(&["phi2"]).as_slice());

        let both = scaler.subset(&names(&["pm1", "phi1"])).unwrap();
        assert_eq!(both.names(), names(&["phi1", "pm1"]).as_slice());

        assert!(matches!(scaler.subset(&names(&["nope"])), Err(ScaleError::EmptySelection)));

        let f32s = scaler.astype(ArrayFormat::Float32);
        assert_eq!(f32s.format(), ArrayFormat::Float32);
        assert_eq!(f32s.names(), scaler.names());
    }
}
