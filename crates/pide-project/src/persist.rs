//! File persistence capability

use std::fs;
use std::path::Path;

use pide_core::prelude::*;

/// Saves an editor buffer to durable storage.
///
/// Synchronous on purpose: saves triggered by tab transitions must complete
/// before the follow-up events (sync-needed) fire, and buffers are small.
/// Teardown-time saves run on a background task instead.
pub trait Persistence: Send + Sync {
    /// Persist `text` as the full content of `path`.
    fn save(&self, path: &Path, text: &str) -> Result<()>;
}

/// Plain filesystem persistence
#[derive(Debug, Clone, Default)]
pub struct DiskPersistence;

impl Persistence for DiskPersistence {
    fn save(&self, path: &Path, text: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text).map_err(|e| {
            warn!("Failed to persist {}: {e}", path.display());
            Error::persist(path)
        })
    }
}
