//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep the server crate importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure the users file exists before serving, seeding `[]` if allowed.
pub async fn ensure_env(users_file: &Path, create_if_missing: bool) -> anyhow::Result<()> {
    common::env::ensure_env(users_file, create_if_missing).await
}
