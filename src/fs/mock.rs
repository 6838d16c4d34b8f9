// src/fs/mock.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};

use super::FileSystem;

#[derive(Debug, Clone, PartialEq, Eq)]
enum MockEntry {
    File,
    Dir,
}

/// In-memory tree for pattern-expansion tests.
///
/// Relative paths hang off the working directory (`"."` or `""`).
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>) -> &Self {
        let path = normalize(path.as_ref());
        let mut entries = self.lock();
        ensure_parents(&mut entries, &path);
        entries.insert(path, MockEntry::File);
        drop(entries);
        self
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        let path = normalize(path.as_ref());
        let mut entries = self.lock();
        ensure_parents(&mut entries, &path);
        entries.insert(path, MockEntry::Dir);
        drop(entries);
        self
    }
}

/// `"./a/b"` and `"a/b"` are the same entry.
fn normalize(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}

fn ensure_parents(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    let mut current = path.parent();
    while let Some(parent) = current {
        if parent.as_os_str().is_empty() {
            break;
        }
        entries
            .entry(parent.to_path_buf())
            .or_insert(MockEntry::Dir);
        current = parent.parent();
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let key = normalize(path);
        key.as_os_str().is_empty() || self.lock().contains_key(&key)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let key = normalize(path);
        key.as_os_str().is_empty() || matches!(self.lock().get(&key), Some(MockEntry::Dir))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        }

        let key = normalize(path);
        let entries = self.lock();
        Ok(entries
            .keys()
            .filter(|candidate| candidate.parent() == Some(key.as_path()))
            .filter_map(|candidate| candidate.file_name())
            .map(|name| path.join(name))
            .collect())
    }

    /// The mock has no symlinks, so every entry is its own canonical form.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        if !self.exists(path) {
            return Err(anyhow!("No such entry: {:?}", path));
        }
        Ok(normalize(path))
    }
}
