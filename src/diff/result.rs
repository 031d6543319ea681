//! Diff result type.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::fieldpath::Path;

/// DiffResult maps each differing path to the original value found there.
///
/// Entries are ordered by path. Absent originals are recorded as an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffResult {
    entries: BTreeMap<String, String>,
}

impl DiffResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        DiffResult::default()
    }

    /// Records the original value at `path`.
    pub fn insert(&mut self, path: &Path, value: impl Into<String>) {
        let key = path.to_string();
        if let Some(previous) = self.entries.insert(key, value.into()) {
            log::warn!("path {} recorded twice, dropping {:?}", path, previous);
        }
    }

    /// Moves all entries of `other` into this result.
    pub fn merge(&mut self, other: DiffResult) {
        for (key, value) in other.entries {
            if let Some(previous) = self.entries.insert(key, value) {
                log::warn!("duplicate path while merging, dropping {:?}", previous);
            }
        }
    }

    /// Returns the original value recorded at `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consumes the result and returns the underlying map.
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl From<DiffResult> for BTreeMap<String, String> {
    fn from(result: DiffResult) -> Self {
        result.entries
    }
}

impl IntoIterator for DiffResult {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} = {}", path, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_sorted_by_path() {
        let root = Path::root("p");
        let mut result = DiffResult::new();
        result.insert(&root.field("b"), "2");
        result.insert(&root.field("a"), "1");
        result.insert(&root.count(), "3");

        assert_eq!(result.paths().collect::<Vec<_>>(), vec!["p.a", "p.b", "p.count"]);
        assert_eq!(result.get("p.a"), Some("1"));
        assert_eq!(result.to_string(), "p.a = 1\np.b = 2\np.count = 3");
    }

    #[test]
    fn test_merge() {
        let mut left = DiffResult::new();
        left.insert(&Path::root("x"), "1");
        let mut right = DiffResult::new();
        right.insert(&Path::root("y"), "");

        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.get("y"), Some(""));
    }

    #[test]
    fn test_serializes_as_map() {
        let mut result = DiffResult::new();
        result.insert(&Path::root("p").field("name"), "ann");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"p.name":"ann"}"#);
    }
}
