//! Measured size record

use serde::{Deserialize, Serialize};

/// Sizes measured for one requested package group.
///
/// Serialized with the field names the JSON output and the cache file share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRecord {
    /// Specifier as the user typed it (e.g. `react,react-dom@16`)
    #[serde(rename = "name")]
    pub requested_name: String,

    /// Resolved `name@version` list, comma-joined
    #[serde(
        rename = "versionedName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_name: Option<String>,

    /// Development bundle size in bytes
    #[serde(rename = "size")]
    pub raw_size: u64,

    /// Minified production bundle size in bytes
    #[serde(rename = "minified")]
    pub minified_size: u64,

    /// Gzipped production bundle size in bytes
    #[serde(rename = "gzipped")]
    pub gzipped_size: u64,
}

impl SizeRecord {
    /// Name shown in tables: the resolved form when known
    pub fn display_name(&self) -> &str {
        self.resolved_name.as_deref().unwrap_or(&self.requested_name)
    }
}
