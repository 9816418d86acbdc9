//! WiFi connection status widget.
//!
//! After setup hands control to the run loop, [`WifiWidget`] is polled to
//! show connection progress: an animated row of dots while waiting, then a
//! single "Connected" or failure message. It never touches the radio; it
//! only samples the link status through [`NetworkLink`].
//!
//! State machine:
//!
//! ```text
//! Connecting --link up--------> Connected
//! Connecting --timeout--------> Failed(reason)
//! ```
//!
//! Both end states are terminal. Whether to reboot after a failure is up to
//! the caller.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::color;
use crate::config::WifiConfig;
use crate::display::{DisplaySurface, Rect, Screen};
use crate::widget::Widget;

/// Longest dots indicator before it wraps back to empty.
pub const MAX_DOTS: usize = 3;

const STATUS_REGION: Rect = Rect::new(0, 100, 240, 100);
const CENTRE_X: i32 = 120;
const HEADLINE_Y: i32 = 80;
const STATUS_Y: i32 = 100;
const STATUS_FONT: u8 = 1;

/// Station link status as reported by the network stack.
///
/// Mirrors the Arduino `wl_status_t` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Idle,
    NoSsidAvailable,
    ScanCompleted,
    Connected,
    ConnectFailed,
    ConnectionLost,
    Disconnected,
    NoShield,
    /// Any code not listed above.
    Other(u8),
}

impl LinkStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => LinkStatus::Idle,
            1 => LinkStatus::NoSsidAvailable,
            2 => LinkStatus::ScanCompleted,
            3 => LinkStatus::Connected,
            4 => LinkStatus::ConnectFailed,
            5 => LinkStatus::ConnectionLost,
            6 => LinkStatus::Disconnected,
            255 => LinkStatus::NoShield,
            other => LinkStatus::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            LinkStatus::Idle => 0,
            LinkStatus::NoSsidAvailable => 1,
            LinkStatus::ScanCompleted => 2,
            LinkStatus::Connected => 3,
            LinkStatus::ConnectFailed => 4,
            LinkStatus::ConnectionLost => 5,
            LinkStatus::Disconnected => 6,
            LinkStatus::NoShield => 255,
            LinkStatus::Other(code) => code,
        }
    }
}

/// Source of the current link status.
pub trait NetworkLink {
    fn status(&self) -> LinkStatus;
}

/// Why the connection attempt was given up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NoSsidAvailable,
    ConnectFailed,
    Idle,
    Disconnected,
    Unknown,
}

impl FailureReason {
    /// Classify the link status sampled at timeout.
    pub fn from_status(status: LinkStatus) -> Self {
        match status {
            LinkStatus::NoSsidAvailable => FailureReason::NoSsidAvailable,
            LinkStatus::ConnectFailed => FailureReason::ConnectFailed,
            LinkStatus::Idle => FailureReason::Idle,
            LinkStatus::Disconnected => FailureReason::Disconnected,
            _ => FailureReason::Unknown,
        }
    }

    /// Text shown on the display.
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::NoSsidAvailable => "No SSID available",
            FailureReason::ConnectFailed => "Connection failed",
            FailureReason::Idle => "Idle status",
            FailureReason::Disconnected => "Disconnected",
            FailureReason::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Connection progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Connecting,
    Connected,
    Failed(FailureReason),
}

impl ConnectionPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ConnectionPhase::Connecting)
    }
}

/// Polled widget rendering WiFi connection progress.
#[derive(Debug)]
pub struct WifiWidget<L> {
    link: L,
    timeout: Duration,
    phase: ConnectionPhase,
    elapsed: Duration,
    dots: String,
    status_text: String,
    success_shown: bool,
    error_shown: bool,
}

impl<L: NetworkLink> WifiWidget<L> {
    pub fn new(link: L, config: &WifiConfig) -> Self {
        Self {
            link,
            timeout: config.connection_timeout,
            phase: ConnectionPhase::Connecting,
            elapsed: Duration::ZERO,
            dots: String::new(),
            status_text: "Connecting".to_string(),
            success_shown: false,
            error_shown: false,
        }
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn is_connected(&self) -> bool {
        self.phase == ConnectionPhase::Connected
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.phase, ConnectionPhase::Failed(_))
    }

    /// Time spent waiting so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Animated waiting indicator, zero to three dots.
    pub fn dots(&self) -> &str {
        &self.dots
    }

    /// Human-readable status: "Connecting", "Connected" or the failure reason.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The terminal message has been drawn.
    pub fn is_settled(&self) -> bool {
        self.success_shown || self.error_shown
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Advance the state machine by one tick. `force` has no effect.
    pub fn update(&mut self, elapsed: Duration, _force: bool) {
        if self.phase.is_terminal() {
            return;
        }

        let status = self.link.status();
        if status == LinkStatus::Connected {
            info!("WiFi link up after {:?}", self.elapsed);
            self.phase = ConnectionPhase::Connected;
            self.status_text = "Connected".to_string();
            return;
        }

        self.elapsed = self.elapsed.saturating_add(elapsed);
        self.dots.push('.');
        if self.dots.len() > MAX_DOTS {
            self.dots.clear();
        }
        debug!("Waiting for WiFi link: {:?} ({:?})", self.elapsed, status);

        if self.elapsed > self.timeout {
            let reason = FailureReason::from_status(self.link.status());
            warn!("WiFi connection timed out: {}", reason);
            self.phase = ConnectionPhase::Failed(reason);
            self.status_text = reason.message().to_string();
        }
    }

    /// Render the current phase on screen 0. `force` has no effect.
    ///
    /// While connecting the dots are redrawn every frame; the terminal
    /// message is drawn on the first frame after the transition only.
    pub fn draw(&mut self, display: &mut dyn DisplaySurface, _force: bool) {
        match self.phase {
            ConnectionPhase::Connecting => {
                display.select_screen(Screen::Index(0));
                display.fill_rect(STATUS_REGION, color::BLACK);
                display.draw_centre_string(&self.dots, CENTRE_X, STATUS_Y, STATUS_FONT);
            }
            ConnectionPhase::Connected if !self.success_shown => {
                self.success_shown = true;
                display.select_screen(Screen::Index(0));
                display.fill_screen(color::BLACK);
                display.draw_centre_string("Connected", CENTRE_X, STATUS_Y, STATUS_FONT);
                info!("Connected to WiFi");
            }
            ConnectionPhase::Failed(reason) if !self.error_shown => {
                self.error_shown = true;
                display.select_screen(Screen::Index(0));
                display.draw_centre_string("Connection", CENTRE_X, HEADLINE_Y, STATUS_FONT);
                display.fill_rect(STATUS_REGION, color::BLACK);
                display.draw_centre_string(reason.message(), CENTRE_X, STATUS_Y, STATUS_FONT);
            }
            _ => {}
        }
    }
}

impl<L: NetworkLink> Widget for WifiWidget<L> {
    fn update(&mut self, elapsed: Duration, force: bool) {
        WifiWidget::update(self, elapsed, force);
    }

    fn draw(&mut self, display: &mut dyn DisplaySurface, force: bool) {
        WifiWidget::draw(self, display, force);
    }

    fn change_mode(&mut self) {}
}
