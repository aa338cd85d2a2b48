use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default session file path (~/.config/promedia/session.json)
pub fn get_session_path() -> PathBuf {
    crate::config::get_config_dir().join("session.json")
}

/// Key/value adapter over a single JSON document.
///
/// Reads never fail from the caller's point of view: a missing or
/// undecodable value yields the supplied default. Writes are collected
/// in memory and flushed atomically by [`persist`](KvStore::persist).
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
    map: BTreeMap<String, Value>,
}

impl KvStore {
    /// Load the store from disk. A missing file is an empty store; an
    /// unreadable or unparsable one is an error the caller decides how
    /// to degrade from.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                map: BTreeMap::new(),
            });
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open session file at {}", path.display()))?;

        let map: BTreeMap<String, Value> =
            serde_json::from_reader(file).context("Failed to parse session file")?;

        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    /// An empty store bound to `path`, for degrading after a failed load.
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            map: BTreeMap::new(),
        }
    }

    /// Read a key, falling back to `default` when the key is absent or
    /// its stored value does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.map.get(key) {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or(default),
            None => default,
        }
    }

    /// Stage a value under `key`. Nothing hits disk until `persist`.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .with_context(|| format!("Failed to encode session value for key '{}'", key))?;
        self.map.insert(key.to_string(), encoded);
        Ok(())
    }

    /// Write the whole document atomically, creating the parent
    /// directory if needed. The file is never left half-written.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory at {}", parent.display())
            })?;
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .with_context(|| format!("Failed to open session file at {}", self.path.display()))?;

        serde_json::to_writer_pretty(&mut file, &self.map)
            .context("Failed to serialize session")?;

        file.commit().context("Failed to save session")?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
