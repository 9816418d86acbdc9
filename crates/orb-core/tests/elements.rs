//! Data element parsing and drawing through the public API.

use orb_core::color;
use orb_core::{CharacterElement, DataElement, DrawOp, RecordingSurface};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_partial_update_keeps_previous_values() {
    let mut element = CharacterElement::new();
    element.parse_data(
        &json!({
            "x": 40, "y": 90, "character": "12:30", "font": 7,
            "color": "yellow", "background": "navy"
        }),
        color::WHITE,
        color::BLACK,
    );

    let partial_documents = [
        json!({}),
        json!({"character": "12:31"}),
        json!({"x": 44}),
        json!({"font": 4, "y": 95}),
    ];
    for document in &partial_documents {
        let before = element.clone();
        element.parse_data(document, color::WHITE, color::BLACK);

        for (key, unchanged) in [
            ("x", element.x() == before.x()),
            ("y", element.y() == before.y()),
            ("character", element.character() == before.character()),
            ("font", element.font() == before.font()),
            ("color", element.color() == before.color()),
            ("background", element.background() == before.background()),
        ] {
            if document.get(key).is_none() {
                assert!(unchanged, "{} changed by {}", key, document);
            }
        }
    }

    assert_eq!(element.x(), 44);
    assert_eq!(element.y(), 95);
    assert_eq!(element.character(), "12:31");
    assert_eq!(element.font(), 4);
    assert_eq!(element.color(), color::lookup("yellow"));
    assert_eq!(element.background(), color::lookup("navy"));
}

#[test]
fn test_every_named_color_matches_numeric_literal() {
    for (name, value) in color::NAMED_COLORS {
        let mut by_name = CharacterElement::new();
        by_name.parse_data(&json!({ "color": name, "background": name }), 0, 0);

        let mut by_number = CharacterElement::new();
        by_number.parse_data(&json!({ "color": value, "background": value }), 0, 0);

        assert_eq!(by_name, by_number, "color {}", name);
        assert_eq!(by_name.color(), Some(*value));
    }
}

#[test]
fn test_feed_of_elements_draws_in_order() {
    let feed = json!([
        {"type": "character", "x": 10, "y": 10, "character": "A"},
        {"type": "sparkline", "points": [1, 2, 3]},
        {"x": 30, "y": 10, "text": "B", "color": "#FF0000"}
    ]);

    let elements: Vec<DataElement> = feed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|doc| DataElement::from_document(doc, color::WHITE, color::BLACK))
        .collect();
    assert_eq!(elements.len(), 2);

    let mut surface = RecordingSurface::new();
    for element in &elements {
        element.draw(&mut surface);
    }

    assert_eq!(surface.texts(), vec!["A", "B"]);
    assert_eq!(
        surface.ops()[2],
        DrawOp::TextColor {
            foreground: 0xF800,
            background: Some(color::BLACK),
        }
    );
}

#[test]
fn test_defaults_follow_latest_parse() {
    let mut element = CharacterElement::new();
    element.parse_data(&json!({"character": "x"}), color::WHITE, color::BLACK);
    element.parse_data(&json!({}), 0x07E0, 0x001F);

    let mut surface = RecordingSurface::new();
    element.draw(&mut surface);

    assert_eq!(
        surface.ops()[0],
        DrawOp::TextColor {
            foreground: 0x07E0,
            background: Some(0x001F),
        }
    );
}
