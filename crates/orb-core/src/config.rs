//! Configuration storage abstraction and device settings.
//!
//! Settings live in a namespaced key-value store that survives power loss:
//! - ESP32: NVS (Non-Volatile Storage)
//! - Host simulator: one JSON file per namespace
//! - Tests: [`MemoryConfigStore`]
//!
//! [`OrbSettings`] is the explicit settings struct handed to widgets; nothing
//! in this crate keeps settings in globals.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Namespace all device settings are stored under.
pub const SETTINGS_NAMESPACE: &str = "wifi-config";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration.
    #[error("Read error: {0}")]
    ReadError(String),

    /// Failed to write configuration.
    #[error("Write error: {0}")]
    WriteError(String),

    /// Stored data could not be decoded.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Storage is not available.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Abstract namespaced string store.
///
/// All methods are synchronous; the store is only touched during setup,
/// before the poll loop starts.
pub trait ConfigStore {
    /// Load a value, `Ok(None)` when the key was never written.
    fn load(&self, namespace: &str, key: &str) -> Result<Option<String>, ConfigError>;

    /// Save a value, replacing any previous one.
    fn save(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), ConfigError>;

    /// Load a value, falling back to `default` when the key is absent.
    fn load_or(&self, namespace: &str, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .load(namespace, key)?
            .unwrap_or_else(|| default.to_string()))
    }
}

/// In-memory store, used by tests and as a scratch store on the host.
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigStore {
    data: HashMap<(String, String), String>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across all namespaces.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, namespace: &str, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self
            .data
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn save(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        self.data
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Device Settings
// ============================================================================

/// Description of one persisted setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingField {
    /// Store key, also the portal form field id.
    pub key: &'static str,
    /// Label shown in the configuration portal.
    pub label: &'static str,
    /// Value used when nothing is stored.
    pub default: &'static str,
    /// Longest value the portal accepts.
    pub max_len: usize,
}

pub const TIMEZONE: SettingField = SettingField {
    key: "timezone",
    label: "Timezone (e.g., America/Vancouver)",
    default: "America/Vancouver",
    max_len: 50,
};

pub const WEATHER_LOCATION: SettingField = SettingField {
    key: "weather_loc",
    label: "Weather Location (e.g., Victoria, BC)",
    default: "Victoria, BC",
    max_len: 50,
};

pub const STOCK_TICKERS: SettingField = SettingField {
    key: "stocks",
    label: "Stock Ticker List (comma-separated)",
    default: "SPY,VT,GOOG,TSLA,GME",
    max_len: 50,
};

pub const METRIC_UNITS: SettingField = SettingField {
    key: "units",
    label: "Metric Units (1 for Metric, 0 for Imperial)",
    default: "1",
    max_len: 2,
};

pub const FORMAT_24H: SettingField = SettingField {
    key: "format_24h",
    label: "24-Hour Format (1 for 24H, 0 for 12H)",
    default: "0",
    max_len: 2,
};

pub const SHOW_AM_PM: SettingField = SettingField {
    key: "show_am_pm",
    label: "Show AM/PM Indicator (1 for Yes, 0 for No)",
    default: "0",
    max_len: 2,
};

pub const SHOW_SECONDS: SettingField = SettingField {
    key: "show_seconds",
    label: "Show Seconds on Clock (1 for Yes, 0 for No)",
    default: "1",
    max_len: 2,
};

/// Every setting, in portal form order.
pub const SETTING_FIELDS: [SettingField; 7] = [
    TIMEZONE,
    WEATHER_LOCATION,
    STOCK_TICKERS,
    METRIC_UNITS,
    FORMAT_24H,
    SHOW_AM_PM,
    SHOW_SECONDS,
];

/// User-facing device settings collected by the configuration portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbSettings {
    /// IANA timezone name used by the clock.
    pub timezone: String,

    /// Location string passed to the weather service.
    pub weather_location: String,

    /// Comma-separated ticker symbols.
    pub stock_tickers: String,

    /// Metric (true) or imperial units.
    pub metric_units: bool,

    /// 24-hour clock.
    pub format_24h: bool,

    /// AM/PM indicator in 12-hour mode.
    pub show_am_pm: bool,

    /// Seconds on the clock face.
    pub show_seconds: bool,
}

impl Default for OrbSettings {
    fn default() -> Self {
        Self {
            timezone: TIMEZONE.default.to_string(),
            weather_location: WEATHER_LOCATION.default.to_string(),
            stock_tickers: STOCK_TICKERS.default.to_string(),
            metric_units: parse_flag(METRIC_UNITS.default),
            format_24h: parse_flag(FORMAT_24H.default),
            show_am_pm: parse_flag(SHOW_AM_PM.default),
            show_seconds: parse_flag(SHOW_SECONDS.default),
        }
    }
}

impl OrbSettings {
    /// Load every setting, using defaults for keys never written.
    pub fn load<S: ConfigStore + ?Sized>(store: &S) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        for field in SETTING_FIELDS {
            let value = store.load_or(SETTINGS_NAMESPACE, field.key, field.default)?;
            settings.set_value(field.key, &value);
        }
        info!("Configuration loaded from flash");
        Ok(settings)
    }

    /// Write every setting.
    pub fn save<S: ConfigStore + ?Sized>(&self, store: &mut S) -> Result<(), ConfigError> {
        for field in SETTING_FIELDS {
            store.save(SETTINGS_NAMESPACE, field.key, &self.value(field.key))?;
        }
        info!("Configuration saved to flash");
        Ok(())
    }

    /// String form of a setting as stored and shown in the portal.
    ///
    /// Unknown keys yield an empty string.
    pub fn value(&self, key: &str) -> String {
        match key {
            k if k == TIMEZONE.key => self.timezone.clone(),
            k if k == WEATHER_LOCATION.key => self.weather_location.clone(),
            k if k == STOCK_TICKERS.key => self.stock_tickers.clone(),
            k if k == METRIC_UNITS.key => format_flag(self.metric_units),
            k if k == FORMAT_24H.key => format_flag(self.format_24h),
            k if k == SHOW_AM_PM.key => format_flag(self.show_am_pm),
            k if k == SHOW_SECONDS.key => format_flag(self.show_seconds),
            _ => String::new(),
        }
    }

    /// Set a setting from its string form. Unknown keys are ignored.
    pub fn set_value(&mut self, key: &str, value: &str) {
        match key {
            k if k == TIMEZONE.key => self.timezone = value.to_string(),
            k if k == WEATHER_LOCATION.key => self.weather_location = value.to_string(),
            k if k == STOCK_TICKERS.key => self.stock_tickers = value.to_string(),
            k if k == METRIC_UNITS.key => self.metric_units = parse_flag(value),
            k if k == FORMAT_24H.key => self.format_24h = parse_flag(value),
            k if k == SHOW_AM_PM.key => self.show_am_pm = parse_flag(value),
            k if k == SHOW_SECONDS.key => self.show_seconds = parse_flag(value),
            _ => {}
        }
    }

    /// Log the settings, one line per field.
    pub fn log_summary(&self) {
        info!("Settings:");
        info!("Timezone: {}", self.timezone);
        info!("Weather Location: {}", self.weather_location);
        info!("Stock Ticker List: {}", self.stock_tickers);
        info!("Metric Units: {}", yes_no(self.metric_units));
        info!("24-Hour Format: {}", yes_no(self.format_24h));
        info!("Show AM/PM Indicator: {}", yes_no(self.show_am_pm));
        info!("Show Seconds on Clock: {}", yes_no(self.show_seconds));
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim() == "1"
}

fn format_flag(flag: bool) -> String {
    let digit = if flag { "1" } else { "0" };
    digit.to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

// ============================================================================
// WiFi Widget Configuration
// ============================================================================

/// Tuning for the WiFi setup flow and status widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WifiConfig {
    /// Station SSID, shown on the setup screen.
    pub ssid: String,

    /// Access point name of the configuration portal.
    pub ap_ssid: String,

    /// Access point password of the configuration portal.
    pub ap_password: String,

    /// Give up waiting for a link after this long.
    pub connection_timeout: Duration,

    /// Expected interval between `update` calls.
    pub tick_interval: Duration,

    /// Pause before sampling the config button.
    pub settle_delay: Duration,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            ap_ssid: "AutoConnectAP".to_string(),
            ap_password: "password".to_string(),
            connection_timeout: Duration::from_secs(20),
            tick_interval: Duration::from_millis(500),
            settle_delay: Duration::from_secs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_from_empty_store_uses_defaults() {
        let store = MemoryConfigStore::new();
        let settings = OrbSettings::load(&store).unwrap();

        assert_eq!(settings, OrbSettings::default());
        assert!(settings.metric_units);
        assert!(!settings.format_24h);
        assert!(!settings.show_am_pm);
        assert!(settings.show_seconds);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut store = MemoryConfigStore::new();
        let settings = OrbSettings {
            timezone: "Europe/Berlin".to_string(),
            weather_location: "Berlin, DE".to_string(),
            stock_tickers: "SAP,ASML".to_string(),
            metric_units: true,
            format_24h: true,
            show_am_pm: false,
            show_seconds: false,
        };

        settings.save(&mut store).unwrap();
        assert_eq!(store.len(), SETTING_FIELDS.len());

        let loaded = OrbSettings::load(&store).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_flags_stored_as_digits() {
        let mut store = MemoryConfigStore::new();
        let settings = OrbSettings {
            format_24h: true,
            show_seconds: false,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();

        assert_eq!(
            store.load(SETTINGS_NAMESPACE, "format_24h").unwrap(),
            Some("1".to_string())
        );
        assert_eq!(
            store.load(SETTINGS_NAMESPACE, "show_seconds").unwrap(),
            Some("0".to_string())
        );
    }

    #[test]
    fn test_non_digit_flag_reads_false() {
        let mut store = MemoryConfigStore::new();
        store.save(SETTINGS_NAMESPACE, "units", "yes").unwrap();
        let settings = OrbSettings::load(&store).unwrap();
        assert!(!settings.metric_units);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let mut store = MemoryConfigStore::new();
        store.save("other", "timezone", "UTC").unwrap();
        assert_eq!(store.load(SETTINGS_NAMESPACE, "timezone").unwrap(), None);
        assert_eq!(
            store.load_or(SETTINGS_NAMESPACE, "timezone", "fallback").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_value_and_set_value_agree() {
        let mut settings = OrbSettings::default();
        for field in SETTING_FIELDS {
            let value = settings.value(field.key);
            settings.set_value(field.key, &value);
        }
        assert_eq!(settings, OrbSettings::default());
        assert_eq!(settings.value("unknown"), "");
    }

    #[test]
    fn test_setting_defaults_fit_max_len() {
        for field in SETTING_FIELDS {
            assert!(field.default.len() <= field.max_len, "{} too long", field.key);
        }
    }

    #[test]
    fn test_wifi_config_partial_json() {
        let config: WifiConfig = serde_json::from_str(r#"{"ssid":"home"}"#).unwrap();
        assert_eq!(config.ssid, "home");
        assert_eq!(config.ap_ssid, "AutoConnectAP");
        assert_eq!(config.connection_timeout, Duration::from_secs(20));
    }
}
