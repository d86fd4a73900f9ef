use std::collections::{hash_map, HashMap};

use crate::PathRecord;

/// Exact-match mapping from request path to destination URL.
///
/// Read-only once built. When several records share a path the one seen last
/// replaces the others.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RedirectTable {
    paths: HashMap<String, String>,
}

impl RedirectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = PathRecord>) -> Self {
        records.into_iter().collect()
    }

    /// Looks up `path` without any normalization: trailing slashes, case and
    /// query strings all count.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.paths.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.paths.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl FromIterator<PathRecord> for RedirectTable {
    fn from_iter<I: IntoIterator<Item = PathRecord>>(iter: I) -> Self {
        iter.into_iter().map(|r| (r.path, r.url)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RedirectTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut paths = HashMap::new();
        for (path, url) in iter {
            paths.insert(path.into(), url.into());
        }
        Self { paths }
    }
}

impl From<HashMap<String, String>> for RedirectTable {
    fn from(paths: HashMap<String, String>) -> Self {
        Self { paths }
    }
}

impl IntoIterator for RedirectTable {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}
