//! Display surface abstraction.
//!
//! The orb renders onto a TFT panel through a driver we do not own. Widgets
//! and data elements only talk to the [`DisplaySurface`] trait, so the same
//! drawing code runs against the real panel on ESP32 and against
//! [`RecordingSurface`] on the host.
//!
//! Colors are packed RGB565 values, the native format of the panel.

/// Which panel subsequent draw calls target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// A single panel by index.
    Index(u8),
    /// Every panel at once (used for clears at startup).
    All,
}

/// Axis-aligned rectangle in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Drawing operations the widgets need from a display driver.
///
/// Text color and size are stateful, like the underlying TFT library: they
/// apply to every following `draw_*` call until changed.
pub trait DisplaySurface {
    /// Route subsequent calls to the given screen.
    fn select_screen(&mut self, screen: Screen);

    /// Fill the whole selected screen.
    fn fill_screen(&mut self, color: u16);

    /// Fill a rectangle on the selected screen.
    fn fill_rect(&mut self, rect: Rect, color: u16);

    /// Set the text magnification factor.
    fn set_text_size(&mut self, size: u8);

    /// Set text foreground and optional background (`None` = transparent).
    fn set_text_color(&mut self, foreground: u16, background: Option<u16>);

    /// Draw text with its top-left corner at (x, y).
    fn draw_string(&mut self, text: &str, x: i32, y: i32, font: u8);

    /// Draw text horizontally centred on x, top edge at y.
    fn draw_centre_string(&mut self, text: &str, x: i32, y: i32, font: u8);
}

/// A single recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    SelectScreen(Screen),
    FillScreen(u16),
    FillRect(Rect, u16),
    TextSize(u8),
    TextColor {
        foreground: u16,
        background: Option<u16>,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        font: u8,
        centred: bool,
    },
}

/// Display surface that records every call instead of drawing.
///
/// Used by tests to assert on rendered output and by the host simulator to
/// log frames.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations recorded so far, oldest first.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded operations, leaving the surface empty.
    pub fn drain(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Texts drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// How many times `text` was drawn.
    pub fn count_text(&self, text: &str) -> usize {
        self.texts().into_iter().filter(|t| *t == text).count()
    }
}

impl DisplaySurface for RecordingSurface {
    fn select_screen(&mut self, screen: Screen) {
        self.ops.push(DrawOp::SelectScreen(screen));
    }

    fn fill_screen(&mut self, color: u16) {
        self.ops.push(DrawOp::FillScreen(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: u16) {
        self.ops.push(DrawOp::FillRect(rect, color));
    }

    fn set_text_size(&mut self, size: u8) {
        self.ops.push(DrawOp::TextSize(size));
    }

    fn set_text_color(&mut self, foreground: u16, background: Option<u16>) {
        self.ops.push(DrawOp::TextColor {
            foreground,
            background,
        });
    }

    fn draw_string(&mut self, text: &str, x: i32, y: i32, font: u8) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font,
            centred: false,
        });
    }

    fn draw_centre_string(&mut self, text: &str, x: i32, y: i32, font: u8) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font,
            centred: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_counts_texts() {
        let mut surface = RecordingSurface::new();
        surface.select_screen(Screen::Index(0));
        surface.draw_centre_string("Connected", 120, 100, 1);
        surface.draw_string("A", 10, 20, 2);
        surface.draw_centre_string("Connected", 120, 100, 1);

        assert_eq!(surface.texts(), vec!["Connected", "A", "Connected"]);
        assert_eq!(surface.count_text("Connected"), 2);
        assert_eq!(surface.count_text("missing"), 0);
    }

    #[test]
    fn test_drain_empties_surface() {
        let mut surface = RecordingSurface::new();
        surface.fill_screen(0);
        surface.fill_rect(Rect::new(0, 100, 240, 100), 0);

        let ops = surface.drain();
        assert_eq!(ops.len(), 2);
        assert!(surface.ops().is_empty());
    }
}
