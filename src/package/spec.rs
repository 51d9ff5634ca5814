//! Package specifier parsing
//!
//! Accepted forms:
//! - `name`, `name@range`
//! - `@scope/name`, `@scope/name@range`
//! - any of the above followed by a sub-path: `name@range/sub/path.js`
//! - local paths starting with `.` or `/`, bundled as-is

use crate::error::{PkgSizeError, PkgSizeResult};
use std::fmt;

/// One parsed package specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Package name, including scope (or the local path)
    pub name: String,
    /// Requested version or range, if any
    pub version: Option<String>,
    /// Sub-path inside the package (leading `/` included)
    pub path: Option<String>,
}

impl PackageSpec {
    /// Parse a single specifier
    pub fn parse(spec: &str) -> PkgSizeResult<Self> {
        let spec = spec.trim();
        let invalid = |reason: &str| PkgSizeError::InvalidSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        if spec.is_empty() {
            return Err(invalid("empty specifier"));
        }

        if spec.starts_with('.') || spec.starts_with('/') {
            return Ok(Self {
                name: spec.to_string(),
                version: None,
                path: None,
            });
        }

        // Split off the scope so its `@` is not mistaken for a version
        let (scope, rest) = match spec.strip_prefix('@') {
            Some(scoped) => {
                let slash = scoped
                    .find('/')
                    .ok_or_else(|| invalid("scoped package is missing its name"))?;
                if slash == 0 {
                    return Err(invalid("empty scope"));
                }
                (Some(&scoped[..slash]), &scoped[slash + 1..])
            }
            None => (None, spec),
        };

        let name_end = rest.find(['@', '/']).unwrap_or(rest.len());
        let bare_name = &rest[..name_end];
        if bare_name.is_empty() {
            return Err(invalid("empty package name"));
        }

        let mut remainder = &rest[name_end..];
        let mut version = None;
        if let Some(after_at) = remainder.strip_prefix('@') {
            let version_end = after_at.find('/').unwrap_or(after_at.len());
            let v = &after_at[..version_end];
            if v.is_empty() {
                return Err(invalid("empty version after '@'"));
            }
            version = Some(v.to_string());
            remainder = &after_at[version_end..];
        }

        let path = if remainder.len() > 1 {
            Some(remainder.to_string())
        } else {
            None
        };

        let name = match scope {
            Some(scope) => format!("@{}/{}", scope, bare_name),
            None => bare_name.to_string(),
        };

        Ok(Self {
            name,
            version,
            path,
        })
    }

    /// Parse a comma-joined group such as `react,react-dom@16`
    pub fn parse_group(group: &str) -> PkgSizeResult<Vec<Self>> {
        let specs = group
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect::<PkgSizeResult<Vec<_>>>()?;

        if specs.is_empty() {
            return Err(PkgSizeError::InvalidSpec {
                spec: group.to_string(),
                reason: "no packages given".to_string(),
            });
        }

        Ok(specs)
    }

    /// Whether this points at a file on disk rather than a registry package
    pub fn is_local(&self) -> bool {
        self.name.starts_with('.') || self.name.starts_with('/')
    }

    /// Argument handed to the installer (`name` or `name@version`)
    pub fn install_target(&self) -> String {
        match &self.version {
            Some(version) => format!("{}@{}", self.name, version),
            None => self.name.clone(),
        }
    }

    /// Module path the bundle entry imports
    pub fn import_path(&self) -> String {
        match &self.path {
            Some(path) => format!("{}{}", self.name, path),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.install_target())?;
        if let Some(path) = &self.path {
            write!(f, "{}", path)?;
        }
        Ok(())
    }
}
