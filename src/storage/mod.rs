use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Key-value collaborator the project store persists through.
///
/// Modeled as a trait so the store can be exercised against an
/// in-memory double in tests.
pub trait Storage {
    /// Read the value stored under `key`, `None` if the key has never
    /// been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed storage: each key maps to `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(value))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        // Write to a temp file and rename so a crash mid-write never
        // leaves a truncated value under the key.
        let path = self.key_path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}
