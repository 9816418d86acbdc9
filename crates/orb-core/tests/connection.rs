//! End-to-end tests for the WiFi status widget.
//!
//! These drive the widget the way the run loop does: alternating `update`
//! and `draw` calls against a scripted link and a recording display.

use std::time::Duration;

use orb_core::{
    ConnectionPhase, FailureReason, LinkStatus, NetworkLink, RecordingSurface, WifiConfig,
    WifiWidget,
};

const TICK: Duration = Duration::from_millis(500);

/// Link whose status the test flips between ticks.
struct ScriptedLink {
    status: LinkStatus,
}

impl NetworkLink for ScriptedLink {
    fn status(&self) -> LinkStatus {
        self.status
    }
}

fn widget_with_timeout(status: LinkStatus, timeout: Duration) -> WifiWidget<ScriptedLink> {
    let config = WifiConfig {
        connection_timeout: timeout,
        ..Default::default()
    };
    WifiWidget::new(ScriptedLink { status }, &config)
}

fn poll(widget: &mut WifiWidget<ScriptedLink>, surface: &mut RecordingSurface) {
    widget.update(TICK, false);
    widget.draw(surface, false);
}

#[test]
fn test_four_updates_reset_dots() {
    let mut widget = widget_with_timeout(LinkStatus::Disconnected, Duration::from_secs(20));

    for _ in 0..4 {
        widget.update(TICK, false);
        assert!(widget.dots().len() <= 3);
    }

    assert_eq!(widget.dots(), "");
    assert_eq!(widget.phase(), ConnectionPhase::Connecting);
}

#[test]
fn test_connected_drawn_exactly_once() {
    let mut widget = widget_with_timeout(LinkStatus::Connected, Duration::from_secs(20));
    let mut surface = RecordingSurface::new();

    for _ in 0..5 {
        poll(&mut widget, &mut surface);
    }

    assert_eq!(surface.count_text("Connected"), 1);
    assert!(widget.is_settled());
}

#[test]
fn test_no_ssid_timeout_fails_and_draws_reason_once() {
    let mut widget = widget_with_timeout(LinkStatus::NoSsidAvailable, Duration::from_secs(2));
    let mut surface = RecordingSurface::new();

    // 2.5 s > 2 s after five ticks
    for _ in 0..5 {
        widget.update(TICK, false);
    }
    assert_eq!(
        widget.phase(),
        ConnectionPhase::Failed(FailureReason::NoSsidAvailable)
    );
    assert_eq!(widget.status_text(), "No SSID available");

    widget.draw(&mut surface, false);
    widget.draw(&mut surface, false);
    widget.draw(&mut surface, true);

    assert_eq!(surface.count_text("No SSID available"), 1);
    assert_eq!(surface.count_text("Connection"), 1);
}

#[test]
fn test_link_up_mid_wait_bypasses_failure() {
    let mut widget = widget_with_timeout(LinkStatus::Disconnected, Duration::from_secs(2));
    let mut surface = RecordingSurface::new();

    poll(&mut widget, &mut surface);
    poll(&mut widget, &mut surface);
    assert!(widget.elapsed() < widget.timeout());

    widget.link_mut().status = LinkStatus::Connected;
    poll(&mut widget, &mut surface);

    assert!(widget.is_connected());
    assert!(!widget.has_failed());

    // Long after the original deadline the widget stays connected.
    widget.link_mut().status = LinkStatus::ConnectFailed;
    for _ in 0..20 {
        poll(&mut widget, &mut surface);
    }
    assert!(widget.is_connected());
    assert_eq!(surface.count_text("Connected"), 1);
    assert_eq!(surface.count_text("Connection failed"), 0);
}

#[test]
fn test_connected_and_failed_never_both_true() {
    let statuses = [
        LinkStatus::Idle,
        LinkStatus::Disconnected,
        LinkStatus::Connected,
        LinkStatus::ConnectFailed,
    ];

    for (i, late) in statuses.iter().enumerate() {
        let mut widget = widget_with_timeout(LinkStatus::Idle, Duration::from_millis(1500));
        let mut surface = RecordingSurface::new();

        for tick in 0..10 {
            if tick == i + 1 {
                widget.link_mut().status = *late;
            }
            poll(&mut widget, &mut surface);
            assert!(!(widget.is_connected() && widget.has_failed()));
        }
        assert!(widget.phase() != ConnectionPhase::Connecting);
    }
}

#[test]
fn test_unknown_status_reports_unknown() {
    let mut widget = widget_with_timeout(LinkStatus::from_code(77), Duration::ZERO);
    let mut surface = RecordingSurface::new();

    poll(&mut widget, &mut surface);

    assert_eq!(widget.phase(), ConnectionPhase::Failed(FailureReason::Unknown));
    assert_eq!(surface.count_text("Unknown"), 1);
}
