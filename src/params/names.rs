//! Parameter naming: flat and grouped names, and their flattened leaf form.
//!
//! Purpose
//! -------
//! Define the addressing scheme shared by parameter bounds, parameter values
//! and packed parameter arrays.
//!
//! Key behaviors
//! -------------
//! - [`ParamName`] is either a flat scalar name (`"weight"`) or a grouped
//!   name (`"phi2"` with sub-names `mu`, `sigma`).
//! - [`FlatParamName`] is the fully qualified leaf: `("weight",)` or
//!   `("phi2", "mu")`.
//! - [`ParamNames`] is an ordered, validated list of names; flattening it
//!   defines the column layout of packed parameter arrays.
//!
//! Invariants & assumptions
//! ------------------------
//! - Top-level names are unique and every flattened name is unique.
//! - Names and sub-names are non-empty.
//! - A `.` in a top-level name marks a component prefix (`"stream.weight"`);
//!   only mixture models create such names, through [`ParamNames::prefixed`].
use crate::params::errors::{ParamError, ParamResult};
use serde::{Deserialize, Serialize};

/// Separator between a component name and a parameter name.
pub const PREFIX_SEP: char = '.';

/// Fully qualified leaf name of a single parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlatParamName {
    /// A standalone parameter, e.g. `("weight",)`.
    Scalar(String),
    /// A member of a group, e.g. `("phi2", "mu")`.
    Nested(String, String),
}

impl FlatParamName {
    pub fn scalar(name: impl Into<String>) -> Self {
        FlatParamName::Scalar(name.into())
    }

    pub fn nested(group: impl Into<String>, sub: impl Into<String>) -> Self {
        FlatParamName::Nested(group.into(), sub.into())
    }

    /// Build from a 1- or 2-element path.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InvalidKey` for any other arity or an empty element.
    pub fn from_path(path: &[&str]) -> ParamResult<Self> {
        if path.iter().any(|p| p.is_empty()) {
            return Err(ParamError::InvalidKey {
                key: path.join("."),
                reason: "key elements must be non-empty",
            });
        }
        match path {
            [name] => Ok(FlatParamName::scalar(*name)),
            [group, sub] => Ok(FlatParamName::nested(*group, *sub)),
            _ => Err(ParamError::InvalidKey {
                key: path.join("."),
                reason: "flat keys have one or two elements",
            }),
        }
    }

    /// Top-level key.
    pub fn top(&self) -> &str {
        match self {
            FlatParamName::Scalar(name) => name,
            FlatParamName::Nested(group, _) => group,
        }
    }

    /// Sub-name, for grouped parameters.
    pub fn sub(&self) -> Option<&str> {
        match self {
            FlatParamName::Scalar(_) => None,
            FlatParamName::Nested(_, sub) => Some(sub),
        }
    }

    /// String form used for packed-array columns: `"weight"`, `"phi2_mu"`.
    pub fn flat(&self) -> String {
        match self {
            FlatParamName::Scalar(name) => name.clone(),
            FlatParamName::Nested(group, sub) => format!("{group}_{sub}"),
        }
    }

    /// Same slot with the top-level key renamed to `"{prefix}.{top}"`.
    pub fn prefixed(&self, prefix: &str) -> Self {
        match self {
            FlatParamName::Scalar(name) => {
                FlatParamName::Scalar(format!("{prefix}{PREFIX_SEP}{name}"))
            }
            FlatParamName::Nested(group, sub) => {
                FlatParamName::Nested(format!("{prefix}{PREFIX_SEP}{group}"), sub.clone())
            }
        }
    }
}

impl std::fmt::Display for FlatParamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlatParamName::Scalar(name) => write!(f, "({name},)"),
            FlatParamName::Nested(group, sub) => write!(f, "({group}, {sub})"),
        }
    }
}

impl From<&str> for FlatParamName {
    fn from(name: &str) -> Self {
        FlatParamName::scalar(name)
    }
}

impl From<(&str, &str)> for FlatParamName {
    fn from((group, sub): (&str, &str)) -> Self {
        FlatParamName::nested(group, sub)
    }
}

/// Declared parameter name: flat scalar or grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamName {
    Flat(String),
    Grouped(String, Vec<String>),
}

impl ParamName {
    pub fn flat(name: impl Into<String>) -> Self {
        ParamName::Flat(name.into())
    }

    pub fn grouped<S: Into<String>>(group: impl Into<String>, subs: Vec<S>) -> Self {
        ParamName::Grouped(group.into(), subs.into_iter().map(Into::into).collect())
    }

    pub fn top(&self) -> &str {
        match self {
            ParamName::Flat(name) => name,
            ParamName::Grouped(group, _) => group,
        }
    }

    /// `(g, (a, b))` flattens to `(g, a)`, `(g, b)`.
    pub fn flats(&self) -> Vec<FlatParamName> {
        match self {
            ParamName::Flat(name) => vec![FlatParamName::scalar(name.clone())],
            ParamName::Grouped(group, subs) => {
                subs.iter().map(|s| FlatParamName::nested(group.clone(), s.clone())).collect()
            }
        }
    }

    pub fn prefixed(&self, prefix: &str) -> Self {
        match self {
            ParamName::Flat(name) => ParamName::Flat(format!("{prefix}{PREFIX_SEP}{name}")),
            ParamName::Grouped(group, subs) => {
                ParamName::Grouped(format!("{prefix}{PREFIX_SEP}{group}"), subs.clone())
            }
        }
    }
}

/// `ParamNames` — ordered, validated parameter names of one model.
///
/// Invariants
/// ----------
/// - Non-empty names and sub-names.
/// - Unique top-level names, and therefore unique flattened names.
/// - Grouped names have at least one sub-name, with no repeats.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamNames {
    names: Vec<ParamName>,
}

impl ParamNames {
    /// Construct validated names.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InvalidKey` for an empty name, sub-name, or group with
    ///   no sub-names.
    /// - `ParamError::DuplicateName` for a repeated top-level or flat name.
    pub fn new(names: Vec<ParamName>) -> ParamResult<Self> {
        for (i, name) in names.iter().enumerate() {
            if name.top().is_empty() {
                return Err(ParamError::InvalidKey {
                    key: String::new(),
                    reason: "parameter names must be non-empty",
                });
            }
            if names[..i].iter().any(|n| n.top() == name.top()) {
                return Err(ParamError::DuplicateName { name: name.top().to_string() });
            }
            if let ParamName::Grouped(group, subs) = name {
                if subs.is_empty() {
                    return Err(ParamError::InvalidKey {
                        key: group.clone(),
                        reason: "grouped names need at least one sub-name",
                    });
                }
                for (j, sub) in subs.iter().enumerate() {
                    if sub.is_empty() {
                        return Err(ParamError::InvalidKey {
                            key: group.clone(),
                            reason: "sub-names must be non-empty",
                        });
                    }
                    if subs[..j].contains(sub) {
                        return Err(ParamError::DuplicateName { name: format!("{group}.{sub}") });
                    }
                }
            }
        }
        Ok(ParamNames { names })
    }

    /// Concatenate several name lists, re-validating uniqueness.
    pub fn concat<I: IntoIterator<Item = ParamNames>>(parts: I) -> ParamResult<Self> {
        ParamNames::new(parts.into_iter().flat_map(|p| p.names).collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParamName> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Top-level names in declaration order.
    pub fn tops(&self) -> Vec<&str> {
        self.names.iter().map(ParamName::top).collect()
    }

    /// Flattened names in declaration order.
    pub fn flats(&self) -> Vec<FlatParamName> {
        self.names.iter().flat_map(ParamName::flats).collect()
    }

    /// Flattened names as strings (`"phi2_mu"`).
    pub fn flat(&self) -> Vec<String> {
        self.flats().iter().map(FlatParamName::flat).collect()
    }

    /// Every name with its top-level key prefixed by `"{prefix}."`.
    pub fn prefixed(&self, prefix: &str) -> ParamNames {
        ParamNames { names: self.names.iter().map(|n| n.prefixed(prefix)).collect() }
    }
}

impl<'a> IntoIterator for &'a ParamNames {
    type Item = &'a ParamName;
    type IntoIter = std::slice::Iter<'a, ParamName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_names() -> ParamNames {
        ParamNames::new(vec![
            ParamName::flat("weight"),
            ParamName::grouped("phi2", vec!["mu", "sigma"]),
        ])
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Flattening expands grouped names in declaration order.
    //
    // Given
    // -----
    // - `["weight", ("phi2", ("mu", "sigma"))]`.
    //
    // Expect
    // ------
    // - flats = `[(weight,), (phi2, mu), (phi2, sigma)]`.
    // - flat strings = `["weight", "phi2_mu", "phi2_sigma"]`.
    fn flats_expand_groups_in_order() {
        let names = stream_names();
        assert_eq!(
            names.flats(),
            vec![
                FlatParamName::scalar("weight"),
                FlatParamName::nested("phi2", "mu"),
                FlatParamName::nested("phi2", "sigma"),
            ]
        );
        assert_eq!(names.flat(), vec!["weight", "phi2_mu", "phi2_sigma"]);
        assert_eq!(names.tops(), vec!["weight", "phi2"]);
    }

    #[test]
    // Purpose
    // -------
    // Duplicate top-level names and duplicate sub-names are rejected.
    fn duplicates_are_rejected() {
        let err = ParamNames::new(vec![
            ParamName::flat("phi2"),
            ParamName::grouped("phi2", vec!["mu"]),
        ])
        .unwrap_err();
        assert_eq!(err, ParamError::DuplicateName { name: "phi2".into() });

        let err = ParamNames::new(vec![ParamName::grouped("phi2", vec!["mu", "mu"])]).unwrap_err();
        assert_eq!(err, ParamError::DuplicateName { name: "phi2.mu".into() });

        let err = ParamNames::new(vec![ParamName::grouped("phi2", Vec::<String>::new())]);
        assert!(matches!(err, Err(ParamError::InvalidKey { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Prefixing renames only the top-level key; paths of arity 1 and 2 are
    // accepted and anything else is a malformed key.
    fn prefix_and_paths() {
        let names = stream_names().prefixed("stream");
        assert_eq!(names.flat(), vec!["stream.weight", "stream.phi2_mu", "stream.phi2_sigma"]);

        assert_eq!(FlatParamName::from_path(&["weight"]).unwrap(), "weight".into());
        assert_eq!(FlatParamName::from_path(&["phi2", "mu"]).unwrap(), ("phi2", "mu").into());
        assert!(matches!(
            FlatParamName::from_path(&["a", "b", "c"]),
            Err(ParamError::InvalidKey { .. })
        ));
        assert!(matches!(FlatParamName::from_path(&[]), Err(ParamError::InvalidKey { .. })));
    }
}
