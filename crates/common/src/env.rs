//! Environment/runtime helpers
//!
//! Sanity checks to ensure the backing file is usable at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the users file exists. Creates its parent directory and seeds an
/// empty JSON array when `create_if_missing` is set; otherwise only warns.
pub async fn ensure_env(users_file: &Path, create_if_missing: bool) -> anyhow::Result<()> {
    if tokio::fs::metadata(users_file).await.is_ok() {
        return Ok(());
    }
    if !create_if_missing {
        warn!(path = %users_file.display(), "users file not found; requests will fail until it exists");
        return Ok(());
    }
    if let Some(parent) = users_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }
    tokio::fs::write(users_file, b"[]")
        .await
        .map_err(|e| anyhow::anyhow!("cannot seed {}: {e}", users_file.display()))?;
    info!(path = %users_file.display(), "seeded empty users file");
    Ok(())
}
