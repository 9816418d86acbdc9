//! Named colors.
//!
//! Element documents may give colors by name (`"red"`) instead of a packed
//! value. Names resolve through a static table of the display library's
//! stock RGB565 colors; `#RRGGBB` strings are also accepted.

pub const BLACK: u16 = 0x0000;
pub const WHITE: u16 = 0xFFFF;

/// Name → packed RGB565 value. Names are lowercase and unique.
pub const NAMED_COLORS: &[(&str, u16)] = &[
    ("black", BLACK),
    ("navy", 0x000F),
    ("darkgreen", 0x03E0),
    ("darkcyan", 0x03EF),
    ("maroon", 0x7800),
    ("purple", 0x780F),
    ("olive", 0x7BE0),
    ("lightgrey", 0xD69A),
    ("darkgrey", 0x7BEF),
    ("blue", 0x001F),
    ("green", 0x07E0),
    ("cyan", 0x07FF),
    ("red", 0xF800),
    ("magenta", 0xF81F),
    ("yellow", 0xFFE0),
    ("white", WHITE),
    ("orange", 0xFDA0),
    ("greenyellow", 0xB7E0),
    ("pink", 0xFE19),
    ("brown", 0x9A60),
    ("gold", 0xFEA0),
    ("silver", 0xC618),
    ("skyblue", 0x867D),
    ("violet", 0x915C),
];

/// Pack 8-bit RGB components into RGB565.
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Resolve a color name or `#RRGGBB` string to a packed value.
///
/// Lookup is case-insensitive and ignores surrounding whitespace.
pub fn lookup(name: &str) -> Option<u16> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, value)| *value)
}

fn parse_hex(hex: &str) -> Option<u16> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(rgb565(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_unique_and_lowercase() {
        let mut seen = HashSet::new();
        for (name, _) in NAMED_COLORS {
            assert_eq!(*name, name.to_ascii_lowercase(), "{} not lowercase", name);
            assert!(seen.insert(*name), "duplicate color name {}", name);
        }
        assert_eq!(NAMED_COLORS.len(), 24);
    }

    #[test]
    fn test_table_resolves_every_entry() {
        for (name, value) in NAMED_COLORS {
            assert_eq!(lookup(name), Some(*value));
        }
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("RED"), Some(0xF800));
        assert_eq!(lookup("  SkyBlue "), Some(0x867D));
    }

    #[test]
    fn test_lookup_hex() {
        assert_eq!(lookup("#FF0000"), Some(0xF800));
        assert_eq!(lookup("#ffffff"), Some(WHITE));
        assert_eq!(lookup("#000000"), Some(BLACK));
        assert_eq!(lookup("#00FF00"), Some(0x07E0));
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(lookup("chartreuse"), None);
        assert_eq!(lookup("#12345"), None);
        assert_eq!(lookup("#GGGGGG"), None);
        assert_eq!(lookup("#+F+F+F"), None);
        assert_eq!(lookup(""), None);
    }
}
