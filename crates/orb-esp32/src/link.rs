//! WiFi link status for the connection widget.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use esp_idf_svc::eventloop::{EspSubscription, EspSystemEventLoop, System};
use esp_idf_svc::sys::EspError;
use esp_idf_svc::wifi::{EspWifi, WifiEvent};
use log::{debug, warn};
use orb_core::{LinkStatus, NetworkLink};

/// No disconnect seen since the last association.
const REASON_NONE: u16 = 0;

// ESP-IDF `wifi_err_reason_t` values.
const REASON_AUTH_EXPIRE: u16 = 2;
const REASON_4WAY_HANDSHAKE_TIMEOUT: u16 = 15;
const REASON_NO_AP_FOUND: u16 = 201;
const REASON_AUTH_FAIL: u16 = 202;
const REASON_ASSOC_FAIL: u16 = 203;
const REASON_HANDSHAKE_TIMEOUT: u16 = 204;
const REASON_CONNECTION_FAIL: u16 = 205;
const REASON_NO_AP_FOUND_W_COMPATIBLE_SECURITY: u16 = 210;
const REASON_NO_AP_FOUND_IN_AUTHMODE_THRESHOLD: u16 = 211;
const REASON_NO_AP_FOUND_IN_RSSI_THRESHOLD: u16 = 212;

/// Status reported while the station is down, given the last disconnect
/// reason.
pub fn status_for_disconnect(reason: u16) -> LinkStatus {
    match reason {
        REASON_NO_AP_FOUND
        | REASON_NO_AP_FOUND_W_COMPATIBLE_SECURITY
        | REASON_NO_AP_FOUND_IN_AUTHMODE_THRESHOLD
        | REASON_NO_AP_FOUND_IN_RSSI_THRESHOLD => LinkStatus::NoSsidAvailable,
        REASON_AUTH_EXPIRE
        | REASON_4WAY_HANDSHAKE_TIMEOUT
        | REASON_AUTH_FAIL
        | REASON_ASSOC_FAIL
        | REASON_HANDSHAKE_TIMEOUT
        | REASON_CONNECTION_FAIL => LinkStatus::ConnectFailed,
        _ => LinkStatus::Disconnected,
    }
}

/// Samples station state from a running `EspWifi`.
///
/// The driver must outlive the link; keep the `EspWifi` returned by setup
/// alive for as long as the widget is polled. The last station disconnect
/// reason is tracked through a system event loop subscription, which is
/// dropped together with the link.
pub struct EspLink<'a> {
    wifi: &'a EspWifi<'static>,
    last_reason: Arc<AtomicU16>,
    _subscription: EspSubscription<'static, System>,
}

impl<'a> EspLink<'a> {
    pub fn new(wifi: &'a EspWifi<'static>, sysloop: &EspSystemEventLoop) -> Result<Self, EspError> {
        let last_reason = Arc::new(AtomicU16::new(REASON_NONE));
        let reason = Arc::clone(&last_reason);
        let subscription = sysloop.subscribe::<WifiEvent, _>(move |event| match event {
            WifiEvent::StaDisconnected(disconnected) => {
                let code = u16::from(disconnected.reason());
                debug!("Station disconnected, reason {}", code);
                reason.store(code, Ordering::Relaxed);
            }
            WifiEvent::StaConnected(_) => reason.store(REASON_NONE, Ordering::Relaxed),
            _ => {}
        })?;

        Ok(Self {
            wifi,
            last_reason,
            _subscription: subscription,
        })
    }
}

impl NetworkLink for EspLink<'_> {
    fn status(&self) -> LinkStatus {
        let started = match self.wifi.is_started() {
            Ok(started) => started,
            Err(e) => {
                warn!("WiFi state unavailable: {}", e);
                return LinkStatus::NoShield;
            }
        };
        if !started {
            return LinkStatus::Idle;
        }
        match self.wifi.is_connected() {
            Ok(true) => LinkStatus::Connected,
            Ok(false) => status_for_disconnect(self.last_reason.load(Ordering::Relaxed)),
            Err(e) => {
                warn!("WiFi state unavailable: {}", e);
                LinkStatus::NoShield
            }
        }
    }
}
