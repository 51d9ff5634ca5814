//! Scratch directories packages are installed into

use crate::error::{PkgSizeError, PkgSizeResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// A private npm project in a temp directory, removed on drop
pub struct ScratchDir {
    path: PathBuf,
    keep: bool,
}

impl ScratchDir {
    /// Create `package-size-<id>` under `root` with a private `package.json`
    pub async fn create(root: &Path) -> PkgSizeResult<Self> {
        let id = Uuid::new_v4().simple().to_string();
        let name = format!("package-size-{}", &id[..8]);
        let path = root.join(&name);

        fs::create_dir_all(&path)
            .await
            .map_err(|e| PkgSizeError::io(format!("creating scratch dir {}", path.display()), e))?;

        let manifest = serde_json::json!({
            "name": name,
            "private": true,
            "license": "MIT",
        });
        fs::write(path.join("package.json"), serde_json::to_string(&manifest)?)
            .await
            .map_err(|e| PkgSizeError::io("writing scratch package.json", e))?;

        debug!("Created scratch dir {}", path.display());
        Ok(Self { path, keep: false })
    }

    /// Root of the scratch project
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where installed packages land
    pub fn modules_dir(&self) -> PathBuf {
        self.path.join("node_modules")
    }

    /// Leave the directory on disk after drop
    pub fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.keep {
            debug!("Keeping scratch dir {}", self.path.display());
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            debug!("Failed to remove scratch dir {}: {}", self.path.display(), e);
        }
    }
}
