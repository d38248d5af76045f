//! Key-value preference persistence with file locking.
//!
//! Remembers the last-entered height and the last result text between
//! launches. The file store writes atomically so a crash mid-save never
//! leaves a torn file behind, and a sidecar `.lock` file serializes
//! read-modify-write cycles across processes.

use crate::{Error, Result};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key holding the last-entered height
pub const HEIGHT_KEY: &str = "height";

/// Key holding the last result text
pub const RESULTS_KEY: &str = "results";

/// Preference store trait for remembering values across launches
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// JSON-file preference store
pub struct JsonPreferences {
    path: PathBuf,
}

impl JsonPreferences {
    /// Create a preference store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file whose lock serializes readers and writers
    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn open_lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        Ok(file)
    }

    /// Read the whole map; the caller holds the lock.
    ///
    /// A missing file is an empty map; a malformed one is an error.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let mut contents = String::new();
        std::io::BufReader::new(File::open(&self.path)?).read_to_string(&mut contents)?;

        serde_json::from_str(&contents).map_err(|e| {
            Error::Preferences(format!("malformed preference file {:?}: {}", self.path, e))
        })
    }

    /// Replace the file atomically: temp file, fsync, rename.
    /// The caller holds the lock exclusively.
    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Preferences("preference path missing parent".into()))?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(values)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let values = self.read_all();
        lock.unlock()?;

        Ok(values?.remove(key))
    }

    /// Read-modify-write under an exclusive lock so concurrent writers
    /// never drop each other's keys.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let saved = self.read_all().and_then(|mut values| {
            values.insert(key.to_string(), value.to_string());
            self.write_all(&values)
        });
        lock.unlock()?;
        saved?;

        tracing::debug!("Saved preference {:?} to {:?}", key, self.path);
        Ok(())
    }
}

/// In-memory preference store
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
