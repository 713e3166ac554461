//! `Params` — immutable parameter values, shaped like `ParamBounds`.
//!
//! Values are `(n, 1)` column arrays, one row per data point. A `(0, 1)`
//! array is a placeholder for a value filled in later (the background
//! weight of a mixture).
use crate::params::{
    errors::{ParamError, ParamResult},
    names::{FlatParamName, PREFIX_SEP},
};
use ndarray::Array2;

/// Leaf array or nested mapping of leaf arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamEntry {
    Leaf(Array2<f64>),
    Nested(Vec<(String, Array2<f64>)>),
}

impl ParamEntry {
    pub fn nested<S: Into<String>>(entries: Vec<(S, Array2<f64>)>) -> Self {
        ParamEntry::Nested(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn check_column(key: &str, arr: &Array2<f64>) -> ParamResult<()> {
    if arr.ncols() != 1 {
        return Err(ParamError::InvalidShape {
            key: key.to_string(),
            shape: arr.dim(),
            reason: "parameter arrays must have exactly one column",
        });
    }
    Ok(())
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

/// Immutable ordered mapping of parameter arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamEntry)>,
}

impl Params {
    /// Build from literal entries.
    ///
    /// A repeated key replaces the earlier entry and keeps its position, as
    /// in `ParamBounds::new`.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InvalidKey` for an empty key or sub-key.
    /// - `ParamError::InvalidShape` for an array that is not a single column.
    pub fn new<K, I>(entries: I) -> ParamResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ParamEntry)>,
    {
        let mut out: Vec<(String, ParamEntry)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            if key.is_empty() {
                return Err(ParamError::InvalidKey { key, reason: "keys must be non-empty" });
            }
            let entry = match value {
                ParamEntry::Leaf(arr) => {
                    check_column(&key, &arr)?;
                    ParamEntry::Leaf(arr)
                }
                ParamEntry::Nested(subs) => {
                    let mut nested = Vec::with_capacity(subs.len());
                    for (sub, arr) in subs {
                        if sub.is_empty() {
                            return Err(ParamError::InvalidKey {
                                key: key.clone(),
                                reason: "sub-keys must be non-empty",
                            });
                        }
                        check_column(&FlatParamName::nested(&key, &sub).flat(), &arr)?;
                        upsert(&mut nested, sub, arr);
                    }
                    ParamEntry::Nested(nested)
                }
            };
            upsert(&mut out, key, entry);
        }
        Ok(Params { entries: out })
    }

    pub fn get(&self, key: &str) -> ParamResult<&ParamEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| ParamError::KeyNotFound { key: key.to_string() })
    }

    /// Leaf array at a flat key.
    ///
    /// Errors
    /// ------
    /// - `ParamError::KeyNotFound` if the key does not resolve to a leaf.
    pub fn get_flat(&self, key: &FlatParamName) -> ParamResult<&Array2<f64>> {
        let not_found = || ParamError::KeyNotFound { key: key.to_string() };
        match (self.get(key.top()).map_err(|_| not_found())?, key.sub()) {
            (ParamEntry::Leaf(a), None) => Ok(a),
            (ParamEntry::Nested(subs), Some(sub)) => {
                subs.iter().find(|(k, _)| k == sub).map(|(_, a)| a).ok_or_else(not_found)
            }
            _ => Err(not_found()),
        }
    }

    pub fn get_path(&self, path: &[&str]) -> ParamResult<&Array2<f64>> {
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

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flatitems(&self) -> Vec<(FlatParamName, &Array2<f64>)> {
        let mut out = Vec::new();
        for (key, entry) in &self.entries {
            match entry {
                ParamEntry::Leaf(a) => out.push((FlatParamName::scalar(key), a)),
                ParamEntry::Nested(subs) => {
                    out.extend(subs.iter().map(|(s, a)| (FlatParamName::nested(key, s), a)))
                }
            }
        }
        out
    }

    pub fn flatkeys(&self) -> Vec<FlatParamName> {
        self.flatitems().into_iter().map(|(k, _)| k).collect()
    }

    pub fn flatvalues(&self) -> Vec<&Array2<f64>> {
        self.flatitems().into_iter().map(|(_, v)| v).collect()
    }

    /// Entries whose key starts with `"{prefix}."`, prefix stripped.
    ///
    /// A trailing `.` on `prefix` is accepted and not doubled.
    pub fn get_prefixed(&self, prefix: &str) -> Params {
        let prefix = prefix.strip_suffix(PREFIX_SEP).unwrap_or(prefix);
        let lead = format!("{prefix}{PREFIX_SEP}");
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(&lead).map(|rest| (rest.to_string(), v.clone())))
            .collect();
        Params { entries }
    }

    /// Copy with every top-level key renamed to `"{prefix}.{key}"`.
    pub fn add_prefix(&self, prefix: &str) -> Params {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| (format!("{prefix}{PREFIX_SEP}{k}"), v.clone()))
            .collect();
        Params { entries }
    }

    /// Working copy for incremental edits.
    pub fn thaw(&self) -> MutableParams {
        MutableParams { entries: self.entries.clone() }
    }
}

/// Working parameter set, built up during an unpack and then frozen.
#[derive(Debug, Clone, Default)]
pub struct MutableParams {
    entries: Vec<(String, ParamEntry)>,
}

impl MutableParams {
    pub fn new() -> Self {
        MutableParams::default()
    }

    /// Insert or replace the array at `key`.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InvalidKey` for an empty key, or when the key's arity
    ///   conflicts with an existing entry (leaf vs nested).
    /// - `ParamError::InvalidShape` if `value` is not a single column.
    pub fn set_param(&mut self, key: &FlatParamName, value: Array2<f64>) -> ParamResult<()> {
        if key.top().is_empty() || key.sub().is_some_and(str::is_empty) {
            return Err(ParamError::InvalidKey {
                key: key.to_string(),
                reason: "key elements must be non-empty",
            });
        }
        check_column(&key.flat(), &value)?;
        let conflict = || ParamError::InvalidKey {
            key: key.to_string(),
            reason: "key conflicts with an existing entry",
        };
        match key {
            FlatParamName::Scalar(name) => {
                if matches!(self.find(name), Some(ParamEntry::Nested(_))) {
                    return Err(conflict());
                }
                upsert(&mut self.entries, name.clone(), ParamEntry::Leaf(value));
            }
            FlatParamName::Nested(group, sub) => {
                if self.find(group).is_none() {
                    self.entries.push((group.clone(), ParamEntry::Nested(Vec::new())));
                }
                match self.entries.iter_mut().find(|(k, _)| k == group) {
                    Some((_, ParamEntry::Nested(subs))) => upsert(subs, sub.clone(), value),
                    _ => return Err(conflict()),
                }
            }
        }
        Ok(())
    }

    fn find(&self, key: &str) -> Option<&ParamEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn freeze(self) -> Params {
        Params { entries: self.entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn mixture_params() -> Params {
        Params::new(vec![
            ("bkg.weight", ParamEntry::Leaf(array![[0.4]])),
            ("stream.weight", ParamEntry::Leaf(array![[0.6]])),
            (
                "stream.phi2",
                ParamEntry::nested(vec![("mu", array![[1.0]]), ("sigma", array![[0.1]])]),
            ),
        ])
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // `get_prefixed` keeps only the matching component's keys, stripped.
    //
    // Given
    // -----
    // - Keys `bkg.weight`, `stream.weight`, `stream.phi2`.
    //
    // Expect
    // ------
    // - `get_prefixed("bkg")` has exactly `["weight"]` with value 0.4.
    // - `get_prefixed("stream.")` has `["weight", "phi2"]`.
    fn get_prefixed_strips_component() {
        let p = mixture_params();
        let bkg = p.get_prefixed("bkg");
        assert_eq!(bkg.keys().collect::<Vec<_>>(), vec!["weight"]);
        assert_eq!(bkg.get_flat(&"weight".into()).unwrap(), &array![[0.4]]);

        let stream = p.get_prefixed("stream.");
        assert_eq!(stream.keys().collect::<Vec<_>>(), vec!["weight", "phi2"]);
        assert_eq!(stream.add_prefix("stream").get_prefixed("stream"), stream);
    }

    #[test]
    // Purpose
    // -------
    // Lookup and containment agree; wrong-arity keys are absent.
    fn lookup_and_containment() {
        let p = mixture_params();
        assert!(p.contains_flat(&("stream.phi2", "mu").into()));
        assert!(!p.contains_flat(&"stream.phi2".into()));
        assert!(!p.contains_flat(&("stream.weight", "mu").into()));
        assert!(matches!(p.get_path(&["nope"]), Err(ParamError::KeyNotFound { .. })));
        assert_eq!(
            p.flatkeys(),
            vec![
                FlatParamName::scalar("bkg.weight"),
                FlatParamName::scalar("stream.weight"),
                FlatParamName::nested("stream.phi2", "mu"),
                FlatParamName::nested("stream.phi2", "sigma"),
            ]
        );
    }

    #[test]
    // Purpose
    // -------
    // `MutableParams` builds groups incrementally, rejects arity conflicts
    // and non-column arrays, and freezes into `Params`.
    fn mutable_params_build_and_freeze() {
        let mut m = MutableParams::new();
        m.set_param(&"weight".into(), array![[0.5]]).unwrap();
        m.set_param(&("phi1", "mu").into(), array![[0.0]]).unwrap();
        m.set_param(&("phi1", "sigma").into(), array![[1.0]]).unwrap();
        m.set_param(&"weight".into(), array![[0.7]]).unwrap();

        assert!(matches!(
            m.set_param(&"phi1".into(), array![[0.0]]),
            Err(ParamError::InvalidKey { .. })
        ));
        assert!(matches!(
            m.set_param(&"x".into(), array![[0.0, 1.0]]),
            Err(ParamError::InvalidShape { .. })
        ));

        let p = m.freeze();
        assert_eq!(p.len(), 2);
        assert_eq!(p.get_flat(&"weight".into()).unwrap(), &array![[0.7]]);
        assert_eq!(p.get_path(&["phi1", "sigma"]).unwrap(), &array![[1.0]]);
    }

    #[test]
    // Purpose
    // -------
    // A repeated literal key replaces the earlier entry in place, giving the
    // same shape `ParamBounds::new` builds from the same keys.
    //
    // Given
    // -----
    // - `phi2 = {mu}` then `phi2 = {sigma}`.
    // - `weight` as a leaf then as `{mu}`.
    //
    // Expect
    // ------
    // - Only `phi2.sigma` survives, matching the bounds built from the same keys.
    // - The nested `weight` replaces the leaf without a conflict error.
    fn repeated_literal_key_replaces_entry() {
        use crate::params::{BoundsValue, ParamBounds};

        let p = Params::new(vec![
            ("phi2", ParamEntry::nested(vec![("mu", array![[0.0]])])),
            ("phi2", ParamEntry::nested(vec![("sigma", array![[1.0]])])),
        ])
        .unwrap();
        let b = ParamBounds::new(vec![
            ("phi2", BoundsValue::nested(vec![("mu", None)])),
            ("phi2", BoundsValue::nested(vec![("sigma", None)])),
        ])
        .unwrap();
        assert_eq!(p.flatkeys(), vec![FlatParamName::nested("phi2", "sigma")]);
        assert_eq!(p.flatkeys(), b.flatkeys());

        let p = Params::new(vec![
            ("weight", ParamEntry::Leaf(array![[0.5]])),
            ("x", ParamEntry::Leaf(array![[2.0]])),
            ("weight", ParamEntry::nested(vec![("mu", array![[0.1]])])),
        ])
        .unwrap();
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["weight", "x"]);
        assert_eq!(p.get_path(&["weight", "mu"]).unwrap(), &array![[0.1]]);
        assert!(matches!(
            Params::new(vec![("w", ParamEntry::Leaf(array![[0.0, 1.0]]))]),
            Err(ParamError::InvalidShape { .. })
        ));
    }
}
