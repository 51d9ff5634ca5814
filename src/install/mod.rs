//! Package installation
//!
//! Installs requested packages into a scratch project with yarn, falling
//! back to npm when yarn is not on PATH.

mod scratch;

pub use scratch::ScratchDir;

use crate::error::{PkgSizeError, PkgSizeResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Installs packages into a directory
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install `packages` (`name` or `name@version`) into `dir`
    async fn install(
        &self,
        packages: &[String],
        dir: &Path,
        registry: Option<&str>,
    ) -> PkgSizeResult<()>;
}

/// Which package manager to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallClient {
    /// yarn if available, npm otherwise
    #[default]
    Auto,
    Yarn,
    Npm,
}

impl fmt::Display for InstallClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Yarn => "yarn",
            Self::Npm => "npm",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for InstallClient {
    type Err = PkgSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "yarn" => Ok(Self::Yarn),
            "npm" => Ok(Self::Npm),
            _ => Err(PkgSizeError::User(format!(
                "Invalid install client: {}. Use auto, yarn or npm",
                s
            ))),
        }
    }
}

/// Installer that shells out to yarn or npm
pub struct NodeInstaller {
    client: InstallClient,
}

impl NodeInstaller {
    /// Create an installer for the given client preference
    pub fn new(client: InstallClient) -> Self {
        Self { client }
    }

    /// Check if yarn is installed
    async fn yarn_available() -> bool {
        Command::new("yarn")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Pick the concrete client for this run
    async fn concrete_client(&self) -> InstallClient {
        match self.client {
            InstallClient::Auto if Self::yarn_available().await => InstallClient::Yarn,
            InstallClient::Auto => InstallClient::Npm,
            other => other,
        }
    }

    /// Program and arguments for an install
    fn command_line(
        client: InstallClient,
        packages: &[String],
        registry: Option<&str>,
    ) -> (&'static str, Vec<String>) {
        let (program, mut args) = match client {
            InstallClient::Yarn | InstallClient::Auto => ("yarn", vec!["add".to_string()]),
            InstallClient::Npm => ("npm", vec!["install".to_string(), "--save".to_string()]),
        };
        args.extend(packages.iter().cloned());
        if let Some(registry) = registry {
            args.push("--registry".to_string());
            args.push(registry.to_string());
        }
        (program, args)
    }
}

impl Default for NodeInstaller {
    fn default() -> Self {
        Self::new(InstallClient::Auto)
    }
}

#[async_trait]
impl Installer for NodeInstaller {
    async fn install(
        &self,
        packages: &[String],
        dir: &Path,
        registry: Option<&str>,
    ) -> PkgSizeResult<()> {
        let client = self.concrete_client().await;
        let (program, args) = Self::command_line(client, packages, registry);

        info!("Installing {} with {}", packages.join(", "), program);
        debug!("Executing: {} {:?} in {}", program, args, dir.display());

        let output = Command::new(program)
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    PkgSizeError::CliNotFound {
                        name: program.to_string(),
                        hint: "Install Node.js from https://nodejs.org".to_string(),
                    }
                } else {
                    PkgSizeError::command_failed(format!("{} {}", program, args.join(" ")), e)
                }
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PkgSizeError::Install {
                packages: packages.join(", "),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
