//! Key-value store collaborators.
//!
//! The checkpoint layer sits on top of this trait. Implementations must never
//! let a storage failure escape: writes and removals are best-effort, and a
//! failed read is indistinguishable from a missing key.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store, used by tests and embedded callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// File-backed store: one file per key under a directory.
///
/// Keys are sanitized into filenames. All I/O failures are swallowed; a
/// read that fails for any reason behaves like a missing key.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if fs::create_dir_all(&self.dir).is_err() {
            return;
        }
        let _ = fs::write(self.path_for(key), value);
    }

    fn remove(&mut self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}
