//! package-size - bundled size of npm packages
//!
//! Installs packages into scratch projects, bundles them with esbuild and
//! reports raw, minified and gzipped sizes. Results are cached per resolved
//! package-version set.

pub mod bundle;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod measure;
pub mod package;
pub mod ui;

pub use error::{PkgSizeError, PkgSizeResult};
