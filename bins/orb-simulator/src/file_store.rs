//! File-backed config store for the host.
//!
//! Each namespace is one JSON object file (`<dir>/<namespace>.json`)
//! mapping keys to string values, standing in for the device's NVS flash.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use orb_core::{ConfigError, ConfigStore};

pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", namespace))
    }

    fn read_namespace(&self, namespace: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        let path = self.namespace_path(namespace);
        match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| ConfigError::InvalidData(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ConfigError::ReadError(format!("{}: {}", path.display(), e))),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self, namespace: &str, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.read_namespace(namespace)?.remove(key))
    }

    fn save(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut entries = self.read_namespace(namespace)?;
        entries.insert(key.to_string(), value.to_string());

        fs::create_dir_all(&self.dir)
            .map_err(|e| ConfigError::StorageUnavailable(format!("{}: {}", self.dir.display(), e)))?;
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        let path = self.namespace_path(namespace);
        fs::write(&path, json)
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))
    }
}
