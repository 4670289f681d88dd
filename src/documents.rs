//! Filesystem document source.
//!
//! Indexed `file_path` values are relative to `[documents].root`. Pages are
//! read as bytes and decoded lossily, since scraped HTML is not guaranteed
//! to be valid UTF-8.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use lectio_core::models::is_contained_path;
use lectio_core::store::DocumentSource;

/// HTML documents under a root directory.
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn load(&self, file_path: &str) -> Result<Option<String>> {
        if !is_contained_path(file_path) {
            anyhow::bail!("refusing to read outside the document root: {}", file_path);
        }

        let path = self.root.join(file_path);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read document: {}", path.display())),
        }
    }
}
