//! Bundler abstraction
//!
//! Each measurement runs two builds of the same entry set:
//! - development: unminified, `NODE_ENV=development`
//! - production: minified, `NODE_ENV=production`, plus a gzipped copy
//!
//! Implementations report per-asset byte sizes and any build errors.

mod esbuild;

pub use esbuild::EsbuildBundler;

use crate::error::PkgSizeResult;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// Bundle file every build produces
pub const MAIN_ASSET: &str = "main.js";

/// Gzipped copy of the production bundle
pub const GZIP_ASSET: &str = "main.js.gz";

/// Max number of output lines to include in build error messages.
const BUILD_ERROR_TAIL_LINES: usize = 50;

/// Development or production build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Value `process.env.NODE_ENV` is replaced with
    pub fn node_env(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Output sub-directory for this build
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Production => "prod",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node_env())
    }
}

/// Everything a bundler needs for one build
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Module specifiers (or absolute file paths) bundled together
    pub entries: Vec<String>,
    /// Directory bare imports resolve from
    pub modules_dir: PathBuf,
    /// Directory the build may write into
    pub work_dir: PathBuf,
    /// Modules left out of the bundle
    pub externals: Vec<String>,
    /// Build flavor
    pub mode: BuildMode,
    /// Ask the bundler for a per-module size breakdown
    pub analyze: bool,
}

impl BuildConfig {
    /// Same configuration with another mode
    pub fn with_mode(&self, mode: BuildMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }
}

/// One emitted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub size: u64,
}

/// Result of one build
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Emitted files
    pub assets: Vec<Asset>,
    /// Compile errors, empty on success
    pub errors: Vec<String>,
    /// Module breakdown when analysis was requested
    pub analysis: Option<String>,
}

impl BuildStats {
    /// Whether the build reported errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Size of the asset called `name`
    pub fn asset_size(&self, name: &str) -> Option<u64> {
        self.assets.iter().find(|a| a.name == name).map(|a| a.size)
    }

    /// All errors as one message
    pub fn error_text(&self) -> String {
        self.errors.join("\n")
    }
}

/// Compiles entries into a single bundle and reports its size
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Run one build
    async fn build(&self, config: &BuildConfig) -> PkgSizeResult<BuildStats>;

    /// Human-readable bundler name for display
    fn bundler_name(&self) -> &'static str;
}

/// Extract the useful tail of build output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `BUILD_ERROR_TAIL_LINES`
/// lines so error messages are actionable without being overwhelming.
pub(crate) fn build_error_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail: Vec<&str> = if total > BUILD_ERROR_TAIL_LINES {
        lines[total - BUILD_ERROR_TAIL_LINES..].to_vec()
    } else {
        lines
    };
    tail.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names() {
        assert_eq!(BuildMode::Development.node_env(), "development");
        assert_eq!(BuildMode::Production.dir_name(), "prod");
        assert_eq!(BuildMode::Production.to_string(), "production");
    }

    #[test]
    fn asset_lookup() {
        let stats = BuildStats {
            assets: vec![
                Asset {
                    name: MAIN_ASSET.to_string(),
                    size: 100,
                },
                Asset {
                    name: GZIP_ASSET.to_string(),
                    size: 40,
                },
            ],
            ..Default::default()
        };

        assert_eq!(stats.asset_size(MAIN_ASSET), Some(100));
        assert_eq!(stats.asset_size(GZIP_ASSET), Some(40));
        assert_eq!(stats.asset_size("other.js"), None);
        assert!(!stats.has_errors());
    }

    #[test]
    fn with_mode_keeps_everything_else() {
        let dev = BuildConfig {
            entries: vec!["vue".to_string()],
            modules_dir: PathBuf::from("/tmp/x/node_modules"),
            work_dir: PathBuf::from("/tmp/x"),
            externals: vec!["react".to_string()],
            mode: BuildMode::Development,
            analyze: false,
        };
        let prod = dev.with_mode(BuildMode::Production);

        assert_eq!(prod.mode, BuildMode::Production);
        assert_eq!(prod.entries, dev.entries);
        assert_eq!(prod.externals, dev.externals);
    }

    #[test]
    fn error_output_keeps_tail() {
        let stderr: String = (0..80).map(|i| format!("line {}\n", i)).collect();
        let out = build_error_output("", &stderr);

        assert_eq!(out.lines().count(), BUILD_ERROR_TAIL_LINES);
        assert!(out.starts_with("line 30"));
        assert!(out.ends_with("line 79"));
    }

    #[test]
    fn error_output_short() {
        assert_eq!(build_error_output("a", "b"), "a\nb");
    }
}
