//! Cache key derivation
//!
//! A key identifies one resolved package set. Entries are formatted as
//! `name:version`, sorted, joined with `,`, and every `.` becomes `-` so the
//! key stays a single flat entry in the cache document.
//!
//! Only names (with any sub-path) and versions take part. Bundle options such
//! as extra externals do not, so runs that differ only in those share an entry.

use std::fmt;

/// Deterministic key for a set of (name, resolved version) pairs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive a key from (name, version) pairs.
    ///
    /// Input order does not matter. An empty version is kept as-is, so
    /// `"vue:"` and `"vue:2-0-0"` are different keys. Duplicates are not
    /// collapsed.
    pub fn derive<'a, I>(packages: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut parts: Vec<String> = packages
            .into_iter()
            .map(|(name, version)| format!("{}:{}", name, version))
            .collect();
        parts.sort();

        Self(parts.join(",").replace('.', "-"))
    }

    /// The key as stored in the cache document
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
