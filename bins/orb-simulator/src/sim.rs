//! Simulated collaborators: network link, captive portal and options.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use orb_core::{LinkStatus, NetworkLink, PortalParameter, Provisioning};
use tracing::info;

/// Simulator options, read from `ORB_*` environment variables.
#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Directory of the file-backed settings store.
    pub config_dir: PathBuf,
    /// Link comes up this long after the poll loop starts; `None` = never.
    pub connect_after: Option<Duration>,
    /// Status reported while the link is down.
    pub down_status: LinkStatus,
    /// Config button held at boot.
    pub portal: bool,
    /// Values the simulated user submits in the portal.
    pub portal_settings: Option<HashMap<String, String>>,
    /// Whether auto-connect finds a network.
    pub auto_connect: bool,
    /// Demo element document.
    pub element: serde_json::Value,
}

impl SimOptions {
    pub fn from_env() -> anyhow::Result<Self> {
        let connect_after = match std::env::var("ORB_SIM_CONNECT_AFTER_MS") {
            Ok(raw) => Some(Duration::from_millis(
                raw.trim()
                    .parse()
                    .context("ORB_SIM_CONNECT_AFTER_MS must be milliseconds")?,
            )),
            Err(_) => None,
        };

        let down_status = match std::env::var("ORB_SIM_LINK_STATUS") {
            Ok(raw) => LinkStatus::from_code(
                raw.trim()
                    .parse()
                    .context("ORB_SIM_LINK_STATUS must be a status code (0-255)")?,
            ),
            Err(_) => LinkStatus::Disconnected,
        };

        let portal_settings = match std::env::var("ORB_SIM_PORTAL_SETTINGS") {
            Ok(raw) => Some(
                serde_json::from_str(&raw)
                    .context("ORB_SIM_PORTAL_SETTINGS must be a JSON object of strings")?,
            ),
            Err(_) => None,
        };

        let element = match std::env::var("ORB_SIM_ELEMENT") {
            Ok(raw) => serde_json::from_str(&raw).context("ORB_SIM_ELEMENT must be JSON")?,
            Err(_) => serde_json::json!({
                "x": 96, "y": 110, "character": "12:00", "font": 4, "color": "skyblue"
            }),
        };

        Ok(Self {
            config_dir: std::env::var("ORB_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("orb-config")),
            connect_after,
            down_status,
            portal: env_flag("ORB_SIM_PORTAL", false),
            portal_settings,
            auto_connect: env_flag("ORB_SIM_AUTOCONNECT", true),
            element,
        })
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => value.trim() == "1",
        Err(_) => default,
    }
}

/// Link that comes up after a fixed delay.
pub struct SimulatedLink {
    started: Instant,
    connect_after: Option<Duration>,
    down_status: LinkStatus,
}

impl SimulatedLink {
    pub fn new(connect_after: Option<Duration>, down_status: LinkStatus) -> Self {
        Self {
            started: Instant::now(),
            connect_after,
            down_status,
        }
    }
}

impl NetworkLink for SimulatedLink {
    fn status(&self) -> LinkStatus {
        match self.connect_after {
            Some(delay) if self.started.elapsed() >= delay => LinkStatus::Connected,
            _ => self.down_status,
        }
    }
}

/// Portal that "submits" a preset form instantly.
pub struct SimulatedPortal {
    params: Vec<PortalParameter>,
    submitted: Option<HashMap<String, String>>,
    auto_connect: bool,
    on_save: Option<Box<dyn FnMut()>>,
}

impl SimulatedPortal {
    pub fn new(submitted: Option<HashMap<String, String>>, auto_connect: bool) -> Self {
        Self {
            params: Vec::new(),
            submitted,
            auto_connect,
            on_save: None,
        }
    }
}

impl Provisioning for SimulatedPortal {
    fn add_parameter(&mut self, parameter: &PortalParameter) {
        self.params.push(parameter.clone());
    }

    fn on_save_requested(&mut self, callback: Box<dyn FnMut()>) {
        self.on_save = Some(callback);
    }

    fn start_portal(&mut self, ap_ssid: &str, _ap_password: &str) {
        info!("Portal up on AP '{}' with {} fields", ap_ssid, self.params.len());
        let Some(form) = &self.submitted else {
            info!("Portal closed without submit");
            return;
        };
        for param in &mut self.params {
            if let Some(value) = form.get(&param.key) {
                param.value = value.clone();
            }
        }
        if let Some(callback) = self.on_save.as_mut() {
            callback();
        }
    }

    fn auto_connect(&mut self, ap_ssid: &str, _ap_password: &str) -> bool {
        info!(
            "Auto-connect ({}), fallback AP '{}'",
            if self.auto_connect { "ok" } else { "failing" },
            ap_ssid
        );
        self.auto_connect
    }

    fn parameter_value(&self, key: &str) -> Option<String> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.clone())
    }
}
