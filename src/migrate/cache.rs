// src/migrate/cache.rs
//! Explicit source-file cache keyed by (path, content hash).
//!
//! Passed as an argument wherever needed; there is no ambient process-wide
//! cache. A stale entry is detected by re-hashing on read.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{MoveCheckError, Result};

#[derive(Debug, Clone)]
struct CacheEntry {
    digest: [u8; 32],
    content: String,
}

/// File-content cache for the rewrite planner and verifier.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl SourceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a file through the cache. The on-disk bytes are re-hashed on
    /// every call; a changed digest replaces the entry.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read.
    pub fn read(&mut self, path: &Path) -> Result<&str> {
        let bytes = std::fs::read(path).map_err(|e| MoveCheckError::io(e, path))?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();

        let stale = self
            .entries
            .get(path)
            .map_or(true, |entry| entry.digest != digest);
        if stale {
            let content = String::from_utf8_lossy(&bytes).into_owned();
            self.entries
                .insert(path.to_path_buf(), CacheEntry { digest, content });
        }

        Ok(&self.entries[path].content)
    }

    /// Seeds the cache with content already read elsewhere (e.g. by the
    /// parallel scan phase).
    pub fn insert(&mut self, path: PathBuf, content: String) {
        let digest: [u8; 32] = Sha256::digest(content.as_bytes()).into();
        self.entries.insert(path, CacheEntry { digest, content });
    }

    /// Cached content, if present, without touching the filesystem.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.entries.get(path).map(|e| e.content.as_str())
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}
