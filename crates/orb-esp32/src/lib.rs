//! ESP32-specific components for the orb widgets.
//!
//! This crate provides the device side of the collaborators `orb-core`
//! consumes:
//! - NVS (Non-Volatile Storage) backed [`ConfigStore`](orb_core::ConfigStore)
//! - WiFi link status for the connection widget
//! - Config button sampling and device restart
//!
//! The captive portal itself is not implemented here; firmware plugs in its
//! own [`Provisioning`](orb_core::Provisioning) implementation.
//!
//! # Example
//!
//! ```ignore
//! use orb_esp32::{config_button_held, nvs::NvsConfigStore, restart};
//! use orb_core::{SetupError, WifiSetup};
//!
//! let mut store = NvsConfigStore::new(nvs_partition);
//! let outcome = match setup.run(&mut display, &mut store, &mut portal, || {
//!     config_button_held(peripherals.pins.gpio0).unwrap_or(false)
//! }) {
//!     Ok(outcome) => outcome,
//!     Err(SetupError::AutoConnectFailed) => restart(),
//!     Err(e) => return Err(e.into()),
//! };
//! ```

pub mod link;
pub mod nvs;

use esp_idf_svc::hal::gpio::{Gpio0, PinDriver, Pull};
use esp_idf_svc::sys::EspError;
use log::{info, warn};

/// Whether the config button (GPIO0, active low) is held.
pub fn config_button_held(pin: Gpio0) -> Result<bool, EspError> {
    let mut button = PinDriver::input(pin)?;
    button.set_pull(Pull::Up)?;
    let held = button.is_low();
    if held {
        info!("Config button held, portal requested");
    }
    Ok(held)
}

/// Reboot the device. Used when auto-connect gives up.
pub fn restart() -> ! {
    warn!("Restarting device");
    esp_idf_svc::hal::reset::restart()
}
