//! Orb simulator
//!
//! Runs the WiFi setup flow and the connection status widget on the host,
//! with a simulated link, a simulated captive portal and a display that
//! logs what it would draw. Settings persist in `ORB_CONFIG_DIR`.

mod file_store;
mod sim;

use std::future::Future;
use std::time::Duration;

use orb_core::{
    ConnectionPhase, DataElement, DrawOp, NetworkLink, RecordingSurface, SetupError, SetupOutcome,
    WifiConfig, WifiSetup, WifiWidget,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use file_store::FileConfigStore;
use sim::{SimOptions, SimulatedLink, SimulatedPortal};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,orb_core=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Orb simulator starting...");

    let options = SimOptions::from_env()?;
    let config = WifiConfig {
        ssid: std::env::var("ORB_WIFI_SSID").unwrap_or_else(|_| "orb-home".to_string()),
        ..Default::default()
    };

    let mut display = RecordingSurface::new();
    let mut store = FileConfigStore::new(&options.config_dir);
    let mut portal = SimulatedPortal::new(options.portal_settings.clone(), options.auto_connect);

    // Setup blocks the thread (settle delay, portal), as it does on the device.
    let setup = WifiSetup::new(config.clone());
    let portal_requested = options.portal;
    let outcome = match setup.run(&mut display, &mut store, &mut portal, || portal_requested) {
        Ok(outcome) => outcome,
        Err(SetupError::AutoConnectFailed) => {
            log_frame(&mut display);
            tracing::error!("Auto-connect failed, device would restart now");
            anyhow::bail!("restart required");
        }
        Err(e) => return Err(e.into()),
    };
    log_frame(&mut display);

    if let SetupOutcome::Portal { saved, .. } = &outcome {
        tracing::info!(
            "Portal finished ({}), settings in {}",
            if *saved { "saved" } else { "not saved" },
            store.dir().display()
        );
    }

    let link = SimulatedLink::new(options.connect_after, options.down_status);
    let mut widget = WifiWidget::new(link, &config);

    if !poll_until_settled(
        &mut widget,
        &mut display,
        config.tick_interval,
        tokio::signal::ctrl_c(),
    )
    .await
    {
        tracing::info!("Received Ctrl+C, shutting down...");
        return Ok(());
    }

    if let ConnectionPhase::Failed(reason) = widget.phase() {
        tracing::error!("WiFi connection failed: {}", reason);
        anyhow::bail!("restart required");
    }

    match DataElement::from_document(
        &options.element,
        orb_core::color::WHITE,
        orb_core::color::BLACK,
    ) {
        Some(element) => {
            element.draw(&mut display);
            log_frame(&mut display);
        }
        None => tracing::warn!("Demo element type is not supported"),
    }

    tracing::info!("Simulation complete");
    Ok(())
}

/// Tick the widget until its terminal message is on screen.
///
/// Returns `false` when `shutdown` completes first. The shutdown future is
/// created once by the caller, so a signal between ticks is not lost.
async fn poll_until_settled<L, F>(
    widget: &mut WifiWidget<L>,
    display: &mut RecordingSurface,
    tick: Duration,
    shutdown: F,
) -> bool
where
    L: NetworkLink,
    F: Future,
{
    tokio::pin!(shutdown);
    let mut interval = tokio::time::interval(tick);
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => return false,
            _ = interval.tick() => {}
        }

        widget.update(tick, false);
        widget.draw(display, false);
        log_frame(display);

        if widget.is_settled() {
            return true;
        }
    }
}

/// Log and clear everything drawn since the previous frame.
fn log_frame(display: &mut RecordingSurface) {
    for op in display.drain() {
        match op {
            DrawOp::Text { text, x, y, font, .. } => {
                tracing::info!("draw '{}' at ({}, {}) font {}", text, x, y, font);
            }
            other => tracing::debug!("{:?}", other),
        }
    }
}
