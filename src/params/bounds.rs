//! `ParamBounds` — ordered mapping from parameter names to prior bounds.
//!
//! Purpose
//! -------
//! Hold the [`PriorBounds`] of every parameter of a model, addressed by
//! top-level name (`"weight"`) or by flat key (`("phi2", "mu")`).
//!
//! Key behaviors
//! -------------
//! - Construction from literal entries normalizes `None` leaves to
//!   [`NoBounds`] at both levels.
//! - The flattened view (`flatitems`/`flatkeys`/`flatvalues`) follows
//!   top-level insertion order, then nested insertion order.
//! - `contains*` never fail; a lookup failure reads as absence.
//! - Derived values (`with_param_names`, `merged`, `prefixed`) are new
//!   instances; nothing is mutated after construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Keys and sub-keys are non-empty.
//! - A repeated key in a literal replaces the earlier value in place.
use crate::{
    params::{
        errors::{ParamError, ParamResult},
        names::{FlatParamName, ParamName, ParamNames, PREFIX_SEP},
    },
    prior::{BoundsRecord, BoundsRef, NoBounds, PriorBounds},
};
use std::sync::Arc;

/// Literal value accepted by [`ParamBounds::new`].
#[derive(Debug, Clone)]
pub enum BoundsValue {
    Bound(BoundsRef),
    /// Degrades to [`NoBounds`].
    None,
    /// Sub-name → bound; `None` leaves degrade to [`NoBounds`].
    Nested(Vec<(String, Option<BoundsRef>)>),
}

impl BoundsValue {
    pub fn bound<B: PriorBounds + 'static>(bound: B) -> Self {
        BoundsValue::Bound(Arc::new(bound))
    }

    pub fn nested<S: Into<String>>(entries: Vec<(S, Option<BoundsRef>)>) -> Self {
        BoundsValue::Nested(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<BoundsRef> for BoundsValue {
    fn from(bound: BoundsRef) -> Self {
        BoundsValue::Bound(bound)
    }
}

impl From<Option<BoundsRef>> for BoundsValue {
    fn from(bound: Option<BoundsRef>) -> Self {
        bound.map_or(BoundsValue::None, BoundsValue::Bound)
    }
}

/// Normalized entry: a leaf bound or a nested mapping of leaf bounds.
#[derive(Debug, Clone)]
pub enum BoundsEntry {
    Leaf(BoundsRef),
    Nested(Vec<(String, BoundsRef)>),
}

impl BoundsEntry {
    pub fn as_leaf(&self) -> Option<&BoundsRef> {
        match self {
            BoundsEntry::Leaf(b) => Some(b),
            BoundsEntry::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&[(String, BoundsRef)]> {
        match self {
            BoundsEntry::Leaf(_) => None,
            BoundsEntry::Nested(subs) => Some(subs),
        }
    }
}

fn no_bounds() -> BoundsRef {
    Arc::new(NoBounds::new())
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

/// Immutable ordered mapping of parameter bounds.
#[derive(Debug, Clone, Default)]
pub struct ParamBounds {
    entries: Vec<(String, BoundsEntry)>,
}

impl ParamBounds {
    /// Build from literal entries.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InvalidKey` for an empty key or sub-key.
    pub fn new<K, I>(entries: I) -> ParamResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, BoundsValue)>,
    {
        let mut out: Vec<(String, BoundsEntry)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            if key.is_empty() {
                return Err(ParamError::InvalidKey { key, reason: "keys must be non-empty" });
            }
            let entry = match value {
                BoundsValue::Bound(b) => BoundsEntry::Leaf(b),
                BoundsValue::None => BoundsEntry::Leaf(no_bounds()),
                BoundsValue::Nested(subs) => {
                    let mut nested = Vec::with_capacity(subs.len());
                    for (sub, b) in subs {
                        if sub.is_empty() {
                            return Err(ParamError::InvalidKey {
                                key: key.clone(),
                                reason: "sub-keys must be non-empty",
                            });
                        }
                        upsert(&mut nested, sub, b.unwrap_or_else(no_bounds));
                    }
                    BoundsEntry::Nested(nested)
                }
            };
            upsert(&mut out, key, entry);
        }
        Ok(ParamBounds { entries: out })
    }

    pub fn empty() -> Self {
        ParamBounds::default()
    }

    /// Stamp `default` onto every declared name; grouped names get one
    /// stamped copy per sub-name.
    pub fn from_names(names: &ParamNames, default: &dyn PriorBounds) -> Self {
        let entries = names
            .iter()
            .map(|name| match name {
                ParamName::Flat(n) => {
                    let leaf = default.with_param_name(FlatParamName::scalar(n));
                    (n.clone(), BoundsEntry::Leaf(leaf))
                }
                ParamName::Grouped(g, subs) => {
                    let nested = subs
                        .iter()
                        .map(|s| (s.clone(), default.with_param_name(FlatParamName::nested(g, s))))
                        .collect();
                    (g.clone(), BoundsEntry::Nested(nested))
                }
            })
            .collect();
        ParamBounds { entries }
    }

    // ---- Mapping ----

    /// Top-level entry as stored.
    pub fn get(&self, key: &str) -> ParamResult<&BoundsEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| ParamError::KeyNotFound { key: key.to_string() })
    }

    /// Leaf bound at a flat key.
    ///
    /// Errors
    /// ------
    /// - `ParamError::KeyNotFound` if the key does not resolve to a leaf: a
    ///   scalar key naming a nested entry, a nested key naming a leaf entry,
    ///   or an absent key.
    pub fn get_flat(&self, key: &FlatParamName) -> ParamResult<&BoundsRef> {
        let not_found = || ParamError::KeyNotFound { key: key.to_string() };
        match (self.get(key.top()).map_err(|_| not_found())?, key.sub()) {
            (BoundsEntry::Leaf(b), None) => Ok(b),
            (BoundsEntry::Nested(subs), Some(sub)) => {
                subs.iter().find(|(k, _)| k == sub).map(|(_, b)| b).ok_or_else(not_found)
            }
            _ => Err(not_found()),
        }
    }

    /// Leaf bound at a 1- or 2-element path.
    pub fn get_path(&self, path: &[&str]) -> ParamResult<&BoundsRef> {
        self.get_flat(&FlatParamName::from_path(path)?)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn contains_flat(&self, key: &FlatParamName) -> bool {
        self.get_flat(key).is_ok()
    }

    pub fn contains_path(&self, path: &[&str]) -> bool {
        self.get_path(path).is_ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundsEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ---- Flat view ----

    pub fn flatitems(&self) -> Vec<(FlatParamName, &BoundsRef)> {
        let mut out = Vec::new();
        for (key, entry) in &self.entries {
            match entry {
                BoundsEntry::Leaf(b) => out.push((FlatParamName::scalar(key), b)),
                BoundsEntry::Nested(subs) => {
                    out.extend(subs.iter().map(|(s, b)| (FlatParamName::nested(key, s), b)))
                }
            }
        }
        out
    }

    pub fn flatkeys(&self) -> Vec<FlatParamName> {
        self.flatitems().into_iter().map(|(k, _)| k).collect()
    }

    pub fn flatvalues(&self) -> Vec<&BoundsRef> {
        self.flatitems().into_iter().map(|(_, v)| v).collect()
    }

    /// Serializable view of every leaf, in flat order.
    pub fn to_records(&self) -> Vec<BoundsRecord> {
        self.flatvalues().into_iter().map(|b| b.to_record()).collect()
    }

    // ---- Derived instances ----

    /// Copy with every leaf re-stamped with its own flat key.
    pub fn with_param_names(&self) -> ParamBounds {
        let entries = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let entry = match entry {
                    BoundsEntry::Leaf(b) => {
                        BoundsEntry::Leaf(b.with_param_name(FlatParamName::scalar(key)))
                    }
                    BoundsEntry::Nested(subs) => BoundsEntry::Nested(
                        subs.iter()
                            .map(|(s, b)| {
                                (s.clone(), b.with_param_name(FlatParamName::nested(key, s)))
                            })
                            .collect(),
                    ),
                };
                (key.clone(), entry)
            })
            .collect();
        ParamBounds { entries }
    }

    /// Check that the flat keys equal `names.flats()`, in order.
    ///
    /// Errors
    /// ------
    /// - `ParamError::BoundsMismatch` on disagreement when `error` is true;
    ///   otherwise disagreement returns `Ok(false)`.
    pub fn validate(&self, names: &ParamNames, error: bool) -> ParamResult<bool> {
        let found = self.flatkeys();
        let expected = names.flats();
        if found == expected {
            return Ok(true);
        }
        if error {
            return Err(ParamError::BoundsMismatch {
                expected: expected.iter().map(ToString::to_string).collect(),
                found: found.iter().map(ToString::to_string).collect(),
            });
        }
        Ok(false)
    }

    /// Right-biased top-level merge. Overridden keys keep their position;
    /// new keys are appended.
    pub fn merged(defaults: &ParamBounds, overrides: &ParamBounds) -> ParamBounds {
        let mut entries = defaults.entries.clone();
        for (k, v) in &overrides.entries {
            upsert(&mut entries, k.clone(), v.clone());
        }
        ParamBounds { entries }
    }

    /// Copy with every top-level key renamed to `"{prefix}.{key}"` and every
    /// leaf re-stamped.
    pub fn prefixed(&self, prefix: &str) -> ParamBounds {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| (format!("{prefix}{PREFIX_SEP}{k}"), v.clone()))
            .collect();
        ParamBounds { entries }.with_param_names()
    }
}

/// Model-definition field holding optional default bounds.
#[derive(Debug, Clone)]
pub struct ParamBoundsField {
    name: &'static str,
    default: Option<ParamBounds>,
}

impl ParamBoundsField {
    pub fn new(name: &'static str, default: Option<ParamBounds>) -> Self {
        ParamBoundsField { name, default }
    }

    /// Errors
    /// ------
    /// - `ParamError::MissingDefault` if the field was declared without one.
    pub fn default(&self) -> ParamResult<&ParamBounds> {
        self.default.as_ref().ok_or(ParamError::MissingDefault { field: self.name })
    }

    /// `merged(default or {}, overrides)` with leaves stamped by key.
    pub fn resolve(&self, overrides: Option<&ParamBounds>) -> ParamBounds {
        let empty = ParamBounds::empty();
        let base = self.default.as_ref().unwrap_or(&empty);
        ParamBounds::merged(base, overrides.unwrap_or(&empty)).with_param_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prior::{ClippedBounds, SigmoidBounds};

    fn names() -> ParamNames {
        ParamNames::new(vec![
            ParamName::flat("weight"),
            ParamName::grouped("phi2", vec!["mu", "sigma"]),
        ])
        .unwrap()
    }

    fn literal() -> ParamBounds {
        ParamBounds::new(vec![
            ("weight", BoundsValue::bound(ClippedBounds::new(0.0, 1.0).unwrap())),
            (
                "phi2",
                BoundsValue::nested(vec![
                    ("mu", Some(Arc::new(SigmoidBounds::new(-5.0, 5.0).unwrap()) as BoundsRef)),
                    ("sigma", None),
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // `from_names` covers exactly the declared flat names and stamps each
    // leaf with its own key.
    //
    // Given
    // -----
    // - Names `["weight", ("phi2", ("mu", "sigma"))]` and a `NoBounds` default.
    //
    // Expect
    // ------
    // - `flatkeys() == names.flats()`; `validate` is true.
    // - Each leaf's `param_name` equals its flat key.
    fn from_names_covers_declared_set() {
        let names = names();
        let pb = ParamBounds::from_names(&names, &NoBounds::new());
        assert_eq!(pb.flatkeys(), names.flats());
        assert!(pb.validate(&names, true).unwrap());
        for (key, bound) in pb.flatitems() {
            assert_eq!(bound.param_name(), Some(&key));
        }
    }

    #[test]
    // Purpose
    // -------
    // `get_flat` and `contains_flat` agree for every key form, including
    // shape-mismatched keys.
    fn get_flat_and_contains_agree() {
        let pb = literal();
        let keys = [
            FlatParamName::scalar("weight"),
            FlatParamName::nested("phi2", "mu"),
            FlatParamName::nested("phi2", "sigma"),
            FlatParamName::scalar("phi2"),
            FlatParamName::nested("weight", "mu"),
            FlatParamName::nested("phi2", "rho"),
            FlatParamName::scalar("missing"),
        ];
        for key in &keys {
            assert_eq!(pb.get_flat(key).is_ok(), pb.contains_flat(key), "key {key}");
        }
        assert!(pb.contains_flat(&FlatParamName::nested("phi2", "sigma")));
        assert!(!pb.contains_flat(&FlatParamName::scalar("phi2")));
        assert!(pb.contains("phi2"));
        assert!(matches!(pb.get("phi2").unwrap(), BoundsEntry::Nested(_)));

        assert!(!pb.contains_path(&["a", "b", "c"]));
        assert!(matches!(pb.get_path(&["a", "b", "c"]), Err(ParamError::InvalidKey { .. })));
        assert!(matches!(pb.get_path(&["missing"]), Err(ParamError::KeyNotFound { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `None` leaves degrade to `NoBounds` and the flat view follows
    // insertion order.
    fn literal_normalizes_none_leaves() {
        let pb = literal();
        let sigma = pb.get_flat(&("phi2", "sigma").into()).unwrap();
        assert_eq!(sigma.kind(), "none");
        assert_eq!(
            pb.flatkeys(),
            vec![
                FlatParamName::scalar("weight"),
                FlatParamName::nested("phi2", "mu"),
                FlatParamName::nested("phi2", "sigma"),
            ]
        );
        assert!(matches!(
            ParamBounds::new(vec![("", BoundsValue::None)]),
            Err(ParamError::InvalidKey { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `validate` reports mismatches as `false` or as an error on request.
    fn validate_mismatch_modes() {
        let names = names();
        let pb = ParamBounds::new(vec![("weight", BoundsValue::None)]).unwrap();
        assert!(!pb.validate(&names, false).unwrap());
        assert!(matches!(pb.validate(&names, true), Err(ParamError::BoundsMismatch { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Merging is right-biased and keeps default order; prefixing renames keys
    // and re-stamps leaves.
    fn merge_and_prefix() {
        let defaults = ParamBounds::from_names(&names(), &NoBounds::new());
        let clipped = BoundsValue::bound(ClippedBounds::new(0.0, 1.0).unwrap());
        let overrides = ParamBounds::new(vec![("weight", clipped)]).unwrap();
        let merged = ParamBounds::merged(&defaults, &overrides).with_param_names();
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["weight", "phi2"]);
        let weight = merged.get_flat(&"weight".into()).unwrap();
        assert_eq!(weight.as_tuple(), (0.0, 1.0));
        assert_eq!(weight.param_name(), Some(&FlatParamName::scalar("weight")));

        let pre = merged.prefixed("stream");
        let mu = pre.get_flat(&("stream.phi2", "mu").into()).unwrap();
        assert_eq!(mu.param_name(), Some(&FlatParamName::nested("stream.phi2", "mu")));
    }

    #[test]
    // Purpose
    // -------
    // A field without a default fails on access but still resolves overrides.
    fn field_default_and_resolve() {
        let field = ParamBoundsField::new("param_bounds", None);
        assert_eq!(
            field.default().unwrap_err(),
            ParamError::MissingDefault { field: "param_bounds" }
        );
        let overrides = ParamBounds::new(vec![("weight", BoundsValue::None)]).unwrap();
        let resolved = field.resolve(Some(&overrides));
        assert_eq!(
            resolved.get_flat(&"weight".into()).unwrap().param_name(),
            Some(&FlatParamName::scalar("weight"))
        );

        let field = ParamBoundsField::new("param_bounds", Some(literal()));
        assert_eq!(field.default().unwrap().len(), 2);
        assert_eq!(field.resolve(None).flatkeys().len(), 3);
    }
}
