//! Clear-cache command - drop every cached size result

use crate::cache::CacheStore;
use crate::config::{Config, ConfigManager};
use crate::error::PkgSizeResult;
use crate::ui::{self, UiContext};
use tracing::debug;

/// Execute the clear-cache command
pub async fn execute(config: &Config) -> PkgSizeResult<()> {
    let ctx = UiContext::detect();
    let store = CacheStore::new(ConfigManager::cache_file(config));
    debug!("Clearing size cache at {}", store.path().display());

    let removed = store.clear().await?;
    ui::step_ok(
        &ctx,
        &format!("Done! Cleared {} cached result(s).", removed),
    );
    Ok(())
}
