//! Widget capability interface.
//!
//! Screens on the orb are widgets driven by a cooperative run loop: each
//! pass calls `update` to advance state and `draw` to render it. Neither
//! call may block.

use std::time::Duration;

use crate::display::DisplaySurface;

pub trait Widget {
    /// Advance internal state by `elapsed` since the previous call.
    ///
    /// `force` is reserved for a future "refresh now" request and is
    /// currently ignored by every widget.
    fn update(&mut self, elapsed: Duration, force: bool);

    /// Render onto the display. `force` is reserved, as for `update`.
    fn draw(&mut self, display: &mut dyn DisplaySurface, force: bool);

    /// Cycle the widget's display mode (e.g. on a button press).
    fn change_mode(&mut self);
}
