//! WiFi provisioning flow.
//!
//! At boot the orb either joins a known network on its own or, when the
//! config button is held, opens a captive configuration portal where the
//! user enters WiFi credentials and device settings. The portal itself
//! (soft AP, DNS hijack, web form) is an external collaborator reached
//! through the [`Provisioning`] trait; this module only sequences it and
//! mirrors the settings between the portal form and the [`ConfigStore`].
//!
//! This is the one phase allowed to block the run loop. It runs once,
//! before polling starts.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{error, info};

use crate::color;
use crate::config::{ConfigError, ConfigStore, OrbSettings, WifiConfig, SETTING_FIELDS};
use crate::display::{DisplaySurface, Screen};

/// One field of the portal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalParameter {
    /// Form field id, same as the settings key.
    pub key: String,
    /// Label shown next to the field.
    pub label: String,
    /// Pre-filled value.
    pub value: String,
    /// Longest accepted input.
    pub max_len: usize,
}

/// Captive portal / auto-connect collaborator.
pub trait Provisioning {
    /// Add a field to the portal form.
    fn add_parameter(&mut self, parameter: &PortalParameter);

    /// Register the callback fired when the user submits the form.
    fn on_save_requested(&mut self, callback: Box<dyn FnMut()>);

    /// Run the portal until the user is done. Blocks.
    fn start_portal(&mut self, ap_ssid: &str, ap_password: &str);

    /// Join with stored credentials, falling back to a portal. Blocks.
    ///
    /// Returns whether a link came up.
    fn auto_connect(&mut self, ap_ssid: &str, ap_password: &str) -> bool;

    /// Current value of a form field, if it was registered.
    fn parameter_value(&self, key: &str) -> Option<String>;
}

/// Errors from the provisioning flow.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Auto-connect gave up; the caller should restart the device.
    #[error("Failed to connect to WiFi")]
    AutoConnectFailed,

    /// Settings could not be loaded or saved.
    #[error("Settings storage failed: {0}")]
    Storage(#[from] ConfigError),
}

/// How setup finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The portal ran because the config button was held.
    Portal {
        settings: OrbSettings,
        /// The user submitted the form and the settings were persisted.
        saved: bool,
    },
    /// Joined a network with stored credentials.
    AutoConnected { settings: OrbSettings },
}

impl SetupOutcome {
    pub fn settings(&self) -> &OrbSettings {
        match self {
            SetupOutcome::Portal { settings, .. } => settings,
            SetupOutcome::AutoConnected { settings } => settings,
        }
    }
}

impl OrbSettings {
    /// Portal form fields pre-filled with the current settings.
    pub fn portal_parameters(&self) -> Vec<PortalParameter> {
        SETTING_FIELDS
            .iter()
            .map(|field| PortalParameter {
                key: field.key.to_string(),
                label: field.label.to_string(),
                value: self.value(field.key),
                max_len: field.max_len,
            })
            .collect()
    }

    /// Read the (possibly edited) form back into settings.
    ///
    /// Fields the portal does not report keep their value from `fallback`;
    /// over-long input is cut to the field's max length.
    pub fn from_provisioning<P: Provisioning + ?Sized>(provisioning: &P, fallback: &OrbSettings) -> Self {
        let mut settings = fallback.clone();
        for field in SETTING_FIELDS {
            if let Some(value) = provisioning.parameter_value(field.key) {
                let value: String = value.chars().take(field.max_len).collect();
                settings.set_value(field.key, &value);
            }
        }
        settings
    }
}

/// Sequences the boot-time WiFi setup.
#[derive(Debug, Clone, Default)]
pub struct WifiSetup {
    config: WifiConfig,
}

impl WifiSetup {
    pub fn new(config: WifiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WifiConfig {
        &self.config
    }

    /// Run setup.
    ///
    /// `config_requested` samples the config button after the settle delay;
    /// returning true opens the portal. An auto-connect failure comes back as
    /// [`SetupError::AutoConnectFailed`] and is fatal for the caller.
    pub fn run<D, S, P>(
        &self,
        display: &mut D,
        store: &mut S,
        provisioning: &mut P,
        config_requested: impl FnOnce() -> bool,
    ) -> Result<SetupOutcome, SetupError>
    where
        D: DisplaySurface + ?Sized,
        S: ConfigStore + ?Sized,
        P: Provisioning + ?Sized,
    {
        self.draw_splash(display);

        let stored = OrbSettings::load(store)?;
        stored.log_summary();

        for parameter in stored.portal_parameters() {
            provisioning.add_parameter(&parameter);
        }

        let save_requested = Rc::new(Cell::new(false));
        let flag = Rc::clone(&save_requested);
        provisioning.on_save_requested(Box::new(move || flag.set(true)));

        if !self.config.settle_delay.is_zero() {
            std::thread::sleep(self.config.settle_delay);
        }

        let outcome = if config_requested() {
            info!("Starting configuration portal...");
            provisioning.start_portal(&self.config.ap_ssid, &self.config.ap_password);

            if save_requested.get() {
                let settings = OrbSettings::from_provisioning(provisioning, &stored);
                settings.save(store)?;
                SetupOutcome::Portal {
                    settings,
                    saved: true,
                }
            } else {
                SetupOutcome::Portal {
                    settings: stored,
                    saved: false,
                }
            }
        } else if provisioning.auto_connect(&self.config.ap_ssid, &self.config.ap_password) {
            info!("Connected to WiFi");
            SetupOutcome::AutoConnected { settings: stored }
        } else {
            error!("Failed to connect");
            return Err(SetupError::AutoConnectFailed);
        };

        outcome.settings().log_summary();
        info!("WiFi setup complete");
        Ok(outcome)
    }

    fn draw_splash<D: DisplaySurface + ?Sized>(&self, display: &mut D) {
        display.select_screen(Screen::All);
        display.fill_screen(color::BLACK);
        display.set_text_size(2);
        display.set_text_color(color::WHITE, None);

        display.select_screen(Screen::Index(0));
        display.draw_centre_string("Connecting", 120, 80, 1);

        display.select_screen(Screen::Index(1));
        display.draw_centre_string("Connecting to", 120, 80, 1);
        display.draw_centre_string("WiFi..", 120, 100, 1);
        display.draw_centre_string(&self.config.ssid, 120, 130, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    #[derive(Default)]
    struct FormOnly {
        values: Vec<(String, String)>,
    }

    impl Provisioning for FormOnly {
        fn add_parameter(&mut self, parameter: &PortalParameter) {
            self.values.push((parameter.key.clone(), parameter.value.clone()));
        }

        fn on_save_requested(&mut self, _callback: Box<dyn FnMut()>) {}

        fn start_portal(&mut self, _ap_ssid: &str, _ap_password: &str) {}

        fn auto_connect(&mut self, _ap_ssid: &str, _ap_password: &str) -> bool {
            true
        }

        fn parameter_value(&self, key: &str) -> Option<String> {
            self.values
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_portal_parameters_mirror_settings() {
        let settings = OrbSettings {
            timezone: "Asia/Tokyo".to_string(),
            show_am_pm: true,
            ..Default::default()
        };
        let params = settings.portal_parameters();

        assert_eq!(params.len(), SETTING_FIELDS.len());
        assert_eq!(params[0].key, "timezone");
        assert_eq!(params[0].value, "Asia/Tokyo");
        assert_eq!(params[0].max_len, 50);
        let am_pm = params.iter().find(|p| p.key == "show_am_pm").unwrap();
        assert_eq!(am_pm.value, "1");
        assert_eq!(am_pm.max_len, 2);
    }

    #[test]
    fn test_from_provisioning_truncates_and_falls_back() {
        let mut portal = FormOnly::default();
        portal
            .values
            .push(("weather_loc".to_string(), "x".repeat(80)));
        portal.values.push(("units".to_string(), "0".to_string()));

        let fallback = OrbSettings::default();
        let settings = OrbSettings::from_provisioning(&portal, &fallback);

        assert_eq!(settings.weather_location.len(), 50);
        assert!(!settings.metric_units);
        assert_eq!(settings.timezone, fallback.timezone);
    }

    #[test]
    fn test_splash_shows_ssid_on_second_screen() {
        let setup = WifiSetup::new(WifiConfig {
            ssid: "home-net".to_string(),
            settle_delay: std::time::Duration::ZERO,
            ..Default::default()
        });
        let mut display = crate::display::RecordingSurface::new();
        let mut store = MemoryConfigStore::new();
        let mut portal = FormOnly::default();

        let outcome = setup
            .run(&mut display, &mut store, &mut portal, || false)
            .unwrap();

        assert!(matches!(outcome, SetupOutcome::AutoConnected { .. }));
        assert_eq!(
            display.texts(),
            vec!["Connecting", "Connecting to", "WiFi..", "home-net"]
        );
    }
}
