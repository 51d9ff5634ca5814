//! Installed package manifest reading
//!
//! Reads `package.json` of an installed package for its real version and
//! peer dependencies. Never fails: a missing or malformed manifest yields an
//! empty record.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Fields of `package.json` the measurement needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    /// Declared package name (empty when unknown)
    pub name: String,
    /// Installed version (empty when unknown)
    pub version: String,
    /// Names of peer dependencies
    pub peer_dependencies: Vec<String>,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default, rename = "peerDependencies")]
    peer_dependencies: BTreeMap<String, serde_json::Value>,
}

impl PackageManifest {
    /// Parse manifest JSON, or `None` if it is not a manifest
    pub fn parse(content: &str) -> Option<Self> {
        let raw: RawManifest = serde_json::from_str(content).ok()?;
        Some(Self {
            name: raw.name,
            version: raw.version,
            peer_dependencies: raw.peer_dependencies.into_keys().collect(),
        })
    }

    /// Read `<modules_dir>/<name>/package.json`
    pub async fn read(modules_dir: &Path, name: &str) -> Self {
        let path = modules_dir.join(name).join("package.json");

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No manifest at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        Self::parse(&content).unwrap_or_else(|| {
            debug!("Unreadable manifest at {}", path.display());
            Self::default()
        })
    }
}
