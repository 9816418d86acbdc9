//! # orb-core
//!
//! Core widgets for the orb round-display information device.
//!
//! This crate provides:
//! - Display surface abstraction and a recording implementation
//! - Named color table (RGB565)
//! - Data elements parsed from JSON documents (positioned text)
//! - Persisted device settings over a key-value config store
//! - WiFi provisioning flow (captive portal or auto-connect)
//! - WiFi connection status state machine with polling `update`/`draw`
//!
//! This crate is intentionally runtime-agnostic and contains no async code,
//! making it usable on both the host simulator and ESP32 (esp-idf) targets.

pub mod color;
pub mod config;
pub mod display;
pub mod element;
pub mod provisioning;
pub mod widget;
pub mod wifi;

pub use config::{ConfigError, ConfigStore, MemoryConfigStore, OrbSettings, WifiConfig};
pub use display::{DisplaySurface, DrawOp, RecordingSurface, Rect, Screen};
pub use element::{CharacterElement, DataElement};
pub use provisioning::{PortalParameter, Provisioning, SetupError, SetupOutcome, WifiSetup};
pub use widget::Widget;
pub use wifi::{ConnectionPhase, FailureReason, LinkStatus, NetworkLink, WifiWidget};
