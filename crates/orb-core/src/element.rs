//! Data elements parsed from JSON documents.
//!
//! Remote data feeds describe what to show as a list of small JSON objects.
//! Each object becomes a data element which remembers its position, content
//! and style, and draws itself onto a [`DisplaySurface`] when asked.
//!
//! Parsing is forgiving: a missing or malformed field is never an error, it
//! simply keeps the value the element already had. This lets a feed send
//! partial updates (e.g. only a new `text`) for an element that was fully
//! described earlier.

use serde_json::Value;
use tracing::{debug, warn};

use crate::color;
use crate::display::DisplaySurface;

/// Numeric color value meaning "not set, use the caller's default".
pub const COLOR_INHERIT: i64 = -1;

/// Font used until a document sets one.
pub const DEFAULT_FONT: u8 = 2;

/// A positioned, colored text element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterElement {
    x: i32,
    y: i32,
    character: String,
    font: u8,
    /// Foreground; `None` inherits `default_color`.
    color: Option<u16>,
    /// Background; `None` inherits `default_background`.
    background: Option<u16>,
    default_color: u16,
    default_background: u16,
}

impl Default for CharacterElement {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            character: String::new(),
            font: DEFAULT_FONT,
            color: None,
            background: None,
            default_color: color::WHITE,
            default_background: color::BLACK,
        }
    }
}

impl CharacterElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn set_character(&mut self, character: impl Into<String>) {
        self.character = character.into();
    }

    pub fn font(&self) -> u8 {
        self.font
    }

    pub fn set_font(&mut self, font: u8) {
        self.font = font;
    }

    /// Explicit foreground color, `None` when inheriting.
    pub fn color(&self) -> Option<u16> {
        self.color
    }

    pub fn set_color(&mut self, color: Option<u16>) {
        self.color = color;
    }

    /// Set the foreground by name or `#RRGGBB`; unknown names inherit.
    pub fn set_color_name(&mut self, name: &str) {
        self.color = resolve_name(name);
    }

    /// Explicit background color, `None` when inheriting.
    pub fn background(&self) -> Option<u16> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<u16>) {
        self.background = background;
    }

    /// Set the background by name or `#RRGGBB`; unknown names inherit.
    pub fn set_background_name(&mut self, name: &str) {
        self.background = resolve_name(name);
    }

    /// Update the element from a JSON object.
    ///
    /// Recognized fields: `x`, `y`, `character` (or `text`), `font`,
    /// `color`, `background`. Fields that are absent or of the wrong type
    /// leave the current value unchanged. The defaults are remembered and
    /// used by [`draw`](Self::draw) wherever a color inherits.
    pub fn parse_data(&mut self, document: &Value, default_color: u16, default_background: u16) {
        self.default_color = default_color;
        self.default_background = default_background;

        if !document.is_object() {
            warn!("Element document is not an object, ignoring");
            return;
        }

        if let Some(x) = read_i32(document, "x") {
            self.x = x;
        }
        if let Some(y) = read_i32(document, "y") {
            self.y = y;
        }

        let text = document
            .get("character")
            .and_then(Value::as_str)
            .or_else(|| document.get("text").and_then(Value::as_str));
        if let Some(text) = text {
            self.character = text.to_string();
        }

        if let Some(font) = document.get("font") {
            match font.as_u64().and_then(|f| u8::try_from(f).ok()) {
                Some(font) => self.font = font,
                None => debug!("Ignoring malformed font value: {}", font),
            }
        }

        if let Some(value) = document.get("color") {
            if let Some(resolved) = read_color(value) {
                self.color = resolved;
            }
        }
        if let Some(value) = document.get("background") {
            if let Some(resolved) = read_color(value) {
                self.background = resolved;
            }
        }
    }

    /// Draw the character at (x, y), substituting defaults for inherited colors.
    pub fn draw(&self, display: &mut dyn DisplaySurface) {
        let foreground = self.color.unwrap_or(self.default_color);
        let background = self.background.unwrap_or(self.default_background);
        display.set_text_color(foreground, Some(background));
        display.draw_string(&self.character, self.x, self.y, self.font);
    }
}

/// Closed set of drawable element kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataElement {
    Character(CharacterElement),
}

impl DataElement {
    /// Create an empty element for the document's `type` field.
    ///
    /// A document without `type` describes a character element. Returns
    /// `None` for kinds this device does not render.
    pub fn for_document(document: &Value) -> Option<Self> {
        match document.get("type").and_then(Value::as_str) {
            None | Some("character") => Some(DataElement::Character(CharacterElement::new())),
            Some(other) => {
                debug!("Unsupported element type: {}", other);
                None
            }
        }
    }

    /// Build and parse an element in one step.
    pub fn from_document(document: &Value, default_color: u16, default_background: u16) -> Option<Self> {
        let mut element = Self::for_document(document)?;
        element.parse_data(document, default_color, default_background);
        Some(element)
    }

    pub fn parse_data(&mut self, document: &Value, default_color: u16, default_background: u16) {
        match self {
            DataElement::Character(element) => {
                element.parse_data(document, default_color, default_background)
            }
        }
    }

    pub fn draw(&self, display: &mut dyn DisplaySurface) {
        match self {
            DataElement::Character(element) => element.draw(display),
        }
    }
}

fn read_i32(document: &Value, key: &str) -> Option<i32> {
    let value = document.get(key)?;
    let parsed = value.as_i64().and_then(|v| i32::try_from(v).ok());
    if parsed.is_none() {
        debug!("Ignoring malformed {} value: {}", key, value);
    }
    parsed
}

/// Decode a color field.
///
/// Outer `None`: the field had an unusable type and is ignored. Inner
/// `None`: the field asks to inherit (sentinel, out-of-range number or
/// unknown name).
fn read_color(value: &Value) -> Option<Option<u16>> {
    match value {
        Value::Number(n) => Some(n.as_i64().and_then(color_from_number)),
        Value::String(name) => Some(resolve_name(name)),
        other => {
            debug!("Ignoring malformed color value: {}", other);
            None
        }
    }
}

fn color_from_number(value: i64) -> Option<u16> {
    if value == COLOR_INHERIT {
        return None;
    }
    let packed = u16::try_from(value).ok();
    if packed.is_none() {
        debug!("Color {} out of range, inheriting default", value);
    }
    packed
}

fn resolve_name(name: &str) -> Option<u16> {
    let resolved = color::lookup(name);
    if resolved.is_none() {
        debug!("Unknown color name '{}', inheriting default", name);
    }
    resolved
}
