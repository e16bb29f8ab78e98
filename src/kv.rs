// Local key-value storage backends

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persistent string-keyed storage, one value per key
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &mut K {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// File-backed store: each key lives in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Open or create a store rooted at the given directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create storage directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(key, bytes = value.len(), "kv get");
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(key))
            .context("Failed to open lock file")?;

        // Acquire exclusive lock before writing
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let mut file = fs::File::create(&tmp).with_context(|| format!("Failed to create {}", tmp.display()))?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?; // Ensure data is flushed to disk
        drop(file);

        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to rename {} -> {}", tmp.display(), path.display()))?;

        debug!(key, bytes = value.len(), "kv set");
        // Lock is automatically released when the lock file is dropped
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        let _ = fs::remove_file(self.lock_path(key));
        Ok(())
    }
}

/// In-memory store, contents are lost on drop
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_kv_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested/data");

        let kv = FileKv::open(&dir).unwrap();
        assert!(dir.exists());
        assert_eq!(kv.dir(), dir.as_path());
    }

    #[test]
    fn test_file_kv_set_get() {
        let temp = TempDir::new().unwrap();
        let mut kv = FileKv::open(temp.path()).unwrap();

        kv.set("focusflow_tasks", "[1,2,3]").unwrap();
        assert_eq!(kv.get("focusflow_tasks").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(temp.path().join("focusflow_tasks.json").exists());
        assert!(!temp.path().join("focusflow_tasks.json.tmp").exists());

        // Overwrite replaces the whole value
        kv.set("focusflow_tasks", "[]").unwrap();
        assert_eq!(kv.get("focusflow_tasks").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_kv_get_missing() {
        let temp = TempDir::new().unwrap();
        let kv = FileKv::open(temp.path()).unwrap();
        assert!(kv.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_file_kv_remove() {
        let temp = TempDir::new().unwrap();
        let mut kv = FileKv::open(temp.path()).unwrap();

        kv.set("k", "v").unwrap();
        kv.remove("k").unwrap();
        assert!(kv.get("k").unwrap().is_none());

        // Removing again is fine
        kv.remove("k").unwrap();
    }

    #[test]
    fn test_file_kv_survives_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut kv = FileKv::open(temp.path()).unwrap();
            kv.set("k", "persisted").unwrap();
        }
        let kv = FileKv::open(temp.path()).unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_memory_kv() {
        let mut kv = MemoryKv::new();
        assert!(kv.is_empty());

        kv.set("a", "1").unwrap();
        assert_eq!(kv.len(), 1);
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));

        kv.remove("a").unwrap();
        assert!(kv.get("a").unwrap().is_none());
    }

    #[test]
    fn test_validation_key() {
        // Valid
        assert!(validate_key("valid_key").is_ok());
        assert!(validate_key("valid-key").is_ok());

        // Invalid
        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("with space").is_err());
        assert!(validate_key(&"a".repeat(65)).is_err());
    }
}
