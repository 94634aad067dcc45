//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the static assets directory exists; warn when missing.
pub async fn ensure_env(static_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(static_dir).await
}
