//! Package specifiers and installed manifests

pub mod manifest;
pub mod spec;

pub use manifest::PackageManifest;
pub use spec::PackageSpec;
