//! Error types for package-size
//!
//! All modules use `PkgSizeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for package-size operations
pub type PkgSizeResult<T> = Result<T, PkgSizeError>;

/// All errors that can occur in package-size
#[derive(Error, Debug)]
pub enum PkgSizeError {
    // Input errors
    #[error("Invalid package specifier: {spec}: {reason}")]
    InvalidSpec { spec: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Tooling errors
    #[error("Required CLI not found: {name}. {hint}")]
    CliNotFound { name: String, hint: String },

    #[error("Failed to install {packages} (exit code {code}): {stderr}")]
    Install {
        packages: String,
        code: i32,
        stderr: String,
    },

    #[error("Compiled with errors!\n\n{0}")]
    Build(String),

    #[error("Build output for {request} is missing asset {asset}")]
    MissingAsset { request: String, asset: String },

    // Cache errors
    #[error("Failed to persist cache at {path}: {source}")]
    CachePersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl PkgSizeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Install { .. } => Some("Check the package name and version, or pass --registry"),
            Self::CachePersist { .. } => Some("Run: package-size clear-cache"),
            Self::ConfigInvalid { .. } => Some("Run: package-size config init --force"),
            _ => None,
        }
    }
}
