//! Key-value persistence for the node set.
//!
//! The registry serializes the whole ordered node list to one JSON blob and
//! hands it to a [`NodeStore`]. Stores never interpret the blob.

use crate::error::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

pub trait NodeStore {
    /// Stored blob, or `None` when nothing has been saved.
    fn load(&self) -> Result<Option<String>>;

    fn save(&mut self, blob: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// and inspect what the registry wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(blob.into()))),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl NodeStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        *self.slot.borrow_mut() = Some(blob.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}

/// Single JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NodeStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, blob)?;
        debug!(path = %self.path.display(), bytes = blob.len(), "node store saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shares_slot() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.save("[]").unwrap();
        assert_eq!(store.blob().as_deref(), Some("[]"));

        writer.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("nodes.json"));
        assert_eq!(store.load().unwrap(), None);

        store.save("[1]").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("[1]"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
