//! NVS (Non-Volatile Storage) configuration for ESP32.
//!
//! Each config namespace maps to an NVS namespace on the default partition.

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use log::debug;
use orb_core::{ConfigError, ConfigStore};

/// Settings store on the default NVS partition.
pub struct NvsConfigStore {
    partition: EspDefaultNvsPartition,
}

impl NvsConfigStore {
    pub fn new(partition: EspDefaultNvsPartition) -> Self {
        Self { partition }
    }

    // Opened read-write so a namespace that was never written is created
    // instead of failing with ESP_ERR_NVS_NOT_FOUND.
    fn open(&self, namespace: &str) -> Result<EspNvs<NvsDefault>, ConfigError> {
        EspNvs::new(self.partition.clone(), namespace, true)
            .map_err(|e| ConfigError::StorageUnavailable(format!("nvs {}: {}", namespace, e)))
    }
}

impl ConfigStore for NvsConfigStore {
    fn load(&self, namespace: &str, key: &str) -> Result<Option<String>, ConfigError> {
        let nvs = self.open(namespace)?;
        let len = nvs
            .str_len(key)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", key, e)))?;
        let Some(len) = len else {
            debug!("nvs {}/{} not set", namespace, key);
            return Ok(None);
        };

        let mut buf = vec![0u8; len + 1];
        let value = nvs
            .get_str(key, &mut buf)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", key, e)))?;
        Ok(value.map(str::to_string))
    }

    fn save(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut nvs = self.open(namespace)?;
        nvs.set_str(key, value)
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", key, e)))
    }
}
