//! Per-column affine statistics shared by the leaf scalers.
//!
//! A leaf scaler stores one `(offset, scale)` pair per column and maps
//! `x ↦ (x − offset) / scale`, inverted by `y ↦ y · scale + offset`.
use crate::{
    numerical_stability::GENERAL_TOL,
    scale::{
        api::{ArrayFormat, Scalable},
        errors::{ScaleError, ScaleResult},
    },
    xp::ArrayNamespace,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Inverse,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AffineStats {
    pub(crate) names: Vec<String>,
    pub(crate) offset: Vec<f64>,
    pub(crate) scale: Vec<f64>,
    pub(crate) format: ArrayFormat,
}

impl AffineStats {
    pub(crate) fn new(
        names: Vec<String>, offset: Vec<f64>, scale: Vec<f64>,
    ) -> ScaleResult<Self> {
        for n in [offset.len(), scale.len()] {
            if n != names.len() {
                return Err(ScaleError::LengthMismatch { expected: names.len(), actual: n });
            }
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ScaleError::DuplicateName { name: name.clone() });
            }
        }
        Ok(AffineStats { names, offset, scale, format: ArrayFormat::Float64 })
    }

    fn indices(&self, names: &[String]) -> ScaleResult<Vec<usize>> {
        if names.is_empty() {
            return Err(ScaleError::EmptySelection);
        }
        names
            .iter()
            .map(|n| {
                self.names
                    .iter()
                    .position(|m| m == n)
                    .ok_or_else(|| ScaleError::UnknownColumn { name: n.clone() })
            })
            .collect()
    }

    pub(crate) fn apply(
        &self, data: &Scalable, names: &[String], xp: Option<&dyn ArrayNamespace>,
        direction: Direction,
    ) -> ScaleResult<Scalable> {
        let xp = xp.ok_or(ScaleError::MissingNamespace)?;
        let idx = self.indices(names)?;
        let mut out = data.to_data(names, xp)?.select(names)?.into_array();
        for (j, &i) in idx.iter().enumerate() {
            let (off, sc) = (self.offset[i], self.scale[i]);
            match direction {
                Direction::Forward => out.column_mut(j).mapv_inplace(|x| (x - off) / sc),
                Direction::Inverse => out.column_mut(j).mapv_inplace(|y| y * sc + off),
            }
        }
        data.mirror(out, names.to_vec())
    }

    pub(crate) fn subset(&self, names: &[String]) -> ScaleResult<AffineStats> {
        let idx = self.indices(names)?;
        Ok(AffineStats {
            names: names.to_vec(),
            offset: idx.iter().map(|&i| self.offset[i]).collect(),
            scale: idx.iter().map(|&i| self.scale[i]).collect(),
            format: self.format,
        })
    }

    pub(crate) fn astype(&self, format: ArrayFormat) -> AffineStats {
        AffineStats {
            names: self.names.clone(),
            offset: self.offset.iter().map(|&x| format.cast(x)).collect(),
            scale: self.scale.iter().map(|&x| format.cast(x)).collect(),
            format,
        }
    }
}

/// Replace non-finite or (numerically) zero spreads with `1` so constant
/// columns map to 0.
pub(crate) fn guard_scale(spread: f64) -> f64 {
    if spread.is_finite() && spread > GENERAL_TOL { spread } else { 1.0 }
}
