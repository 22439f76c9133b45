//! Autocomplete suggestions for product and supplier names.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use lote_kv::KVStore;

use crate::error::LoteError;
use crate::stored;

/// Which suggestion set a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionField {
    Products,
    Suppliers,
}

impl SuggestionField {
    /// Store key holding this set.
    pub fn store_key(&self) -> &'static str {
        match self {
            SuggestionField::Products => "products",
            SuggestionField::Suppliers => "suppliers",
        }
    }
}

impl fmt::Display for SuggestionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.store_key())
    }
}

impl FromStr for SuggestionField {
    type Err = LoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" | "product" => Ok(SuggestionField::Products),
            "suppliers" | "supplier" => Ok(SuggestionField::Suppliers),
            other => Err(LoteError::NotFound(format!("unknown suggestion field '{other}'"))),
        }
    }
}

/// Lowercase with accents stripped, so "Cúrcuma" and "CURCUMA" fold alike.
pub(crate) fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Set of previously seen values for one field.
///
/// Membership is exact (case- and accent-sensitive); iteration follows
/// insertion order. Stored as a JSON array. Duplicates in stored data are
/// collapsed on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SuggestionSet {
    values: Vec<String>,
}

impl From<Vec<String>> for SuggestionSet {
    fn from(values: Vec<String>) -> Self {
        let mut set = SuggestionSet::default();
        for value in values {
            set.insert(&value);
        }
        set
    }
}

impl From<SuggestionSet> for Vec<String> {
    fn from(set: SuggestionSet) -> Self {
        set.values
    }
}

impl SuggestionSet {
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Insert `value` if absent. Returns true when the set changed.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.contains(value) {
            return false;
        }
        self.values.push(value.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values containing `query`, ignoring case and accents, in set order.
    /// Lazy; call again to restart. An empty query matches everything.
    pub fn filter<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a str> + 'a {
        let needle = fold(query);
        self.values
            .iter()
            .filter(move |v| fold(v).contains(&needle))
            .map(String::as_str)
    }
}

/// SuggestionRegistry: the persisted product and supplier sets.
///
/// Each `register` that adds a value rewrites that field's whole set
/// immediately. Two writers on the same store race last-write-wins.
pub struct SuggestionRegistry {
    kv: Arc<dyn KVStore>,
}

impl SuggestionRegistry {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Current set for `field`; empty if nothing (or garbage) is stored.
    pub fn load(&self, field: SuggestionField) -> Result<SuggestionSet, LoteError> {
        stored::load(self.kv.as_ref(), field.store_key())
    }

    /// Add `value` to `field`'s set. Idempotent: returns false and writes
    /// nothing when the value is already known.
    pub fn register(&self, field: SuggestionField, value: &str) -> Result<bool, LoteError> {
        let mut set = self.load(field)?;
        if !set.insert(value) {
            return Ok(false);
        }
        stored::save(self.kv.as_ref(), field.store_key(), &set)?;
        debug!("registered {} suggestion {:?} ({} known)", field, value, set.len());
        Ok(true)
    }

    /// Stored values of `field` matching `query`, see [`SuggestionSet::filter`].
    pub fn filter(&self, field: SuggestionField, query: &str) -> Result<Vec<String>, LoteError> {
        let set = self.load(field)?;
        Ok(set.filter(query).map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lote_kv::MemoryStore;

    fn registry() -> (MemoryStore, SuggestionRegistry) {
        let kv = MemoryStore::new();
        let registry = SuggestionRegistry::new(Arc::new(kv.clone()));
        (kv, registry)
    }

    #[test]
    fn fold_strips_case_and_accents() {
        assert_eq!(fold("Cúrcuma"), "curcuma");
        assert_eq!(fold("AÑIL"), "anil");
        assert_eq!(fold("Agro Sur S.A."), "agro sur s.a.");
    }

    #[test]
    fn filter_matches_case_and_accent_insensitively() {
        let set = SuggestionSet::from(vec!["Cúrcuma".to_string(), "Jengibre".to_string()]);
        let hits: Vec<&str> = set.filter("cur").collect();
        assert_eq!(hits, vec!["Cúrcuma"]);

        let hits: Vec<&str> = set.filter("GIB").collect();
        assert_eq!(hits, vec!["Jengibre"]);

        let all: Vec<&str> = set.filter("").collect();
        assert_eq!(all, vec!["Cúrcuma", "Jengibre"]);

        assert_eq!(set.filter("zzz").count(), 0);
    }

    #[test]
    fn filter_is_restartable() {
        let set = SuggestionSet::from(vec!["Cúrcuma".to_string(), "Curry".to_string()]);
        let first: Vec<&str> = set.filter("cur").collect();
        let second: Vec<&str> = set.filter("cur").collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["Cúrcuma", "Curry"]);
    }

    #[test]
    fn membership_is_exact() {
        let mut set = SuggestionSet::default();
        assert!(set.insert("Cúrcuma"));
        assert!(set.insert("cúrcuma"));
        assert!(set.insert("Curcuma"));
        assert!(!set.insert("Cúrcuma"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn register_is_idempotent() {
        let (kv, registry) = registry();

        assert!(registry.register(SuggestionField::Products, "Cúrcuma").unwrap());
        assert!(!registry.register(SuggestionField::Products, "Cúrcuma").unwrap());

        let set = registry.load(SuggestionField::Products).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Cúrcuma"]);
        assert_eq!(
            kv.get("products").unwrap().unwrap(),
            r#"["Cúrcuma"]"#.as_bytes().to_vec()
        );
    }

    #[test]
    fn fields_are_independent() {
        let (kv, registry) = registry();
        registry.register(SuggestionField::Products, "Jengibre").unwrap();
        registry.register(SuggestionField::Suppliers, "Agro Sur S.A.").unwrap();

        assert_eq!(registry.filter(SuggestionField::Products, "").unwrap(), vec!["Jengibre"]);
        assert_eq!(
            registry.filter(SuggestionField::Suppliers, "sur").unwrap(),
            vec!["Agro Sur S.A."]
        );
        assert_eq!(kv.keys(), vec!["products".to_string(), "suppliers".to_string()]);
    }

    #[test]
    fn malformed_set_reads_empty_and_is_replaced_on_register() {
        let (kv, registry) = registry();
        kv.set("suppliers", b"{broken").unwrap();

        assert!(registry.load(SuggestionField::Suppliers).unwrap().is_empty());
        registry.register(SuggestionField::Suppliers, "Agro Sur S.A.").unwrap();
        assert_eq!(
            registry.filter(SuggestionField::Suppliers, "").unwrap(),
            vec!["Agro Sur S.A."]
        );
    }

    #[test]
    fn duplicate_stored_values_collapse_on_load() {
        let (kv, registry) = registry();
        kv.set("products", r#"["Jengibre","Jengibre","Cúrcuma"]"#.as_bytes()).unwrap();

        let set = registry.load(SuggestionField::Products).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Jengibre", "Cúrcuma"]);
    }

    #[test]
    fn field_parses_from_cli_names() {
        assert_eq!("products".parse::<SuggestionField>().unwrap(), SuggestionField::Products);
        assert_eq!("supplier".parse::<SuggestionField>().unwrap(), SuggestionField::Suppliers);
        assert!("operators".parse::<SuggestionField>().is_err());
    }
}
