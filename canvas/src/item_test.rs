#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

#[test]
fn spawned_item_lands_at_default_point() {
    let item = CanvasItem::spawned("a cat", "https://img/cat.png");
    assert_eq!(item.position, Position::new(50.0, 50.0));
    assert!(item.id.is_none());
    assert!(!item.is_persisted());
}

#[test]
fn duplicate_clears_id_and_offsets() {
    let source = CanvasItem::new("a cat", "https://img/cat.png", Position::new(100.0, 40.0)).with_id(7);
    let dup = source.duplicate();
    assert_eq!(dup.id, None);
    assert_eq!(dup.image_url, source.image_url);
    assert_eq!(dup.prompt, source.prompt);
    assert_eq!(dup.position, Position::new(120.0, 60.0));
    // Source untouched.
    assert_eq!(source.id, Some(7));
    assert_eq!(source.position, Position::new(100.0, 40.0));
}

#[test]
fn wire_format_uses_camel_case() {
    let item = CanvasItem::new("p", "u", Position::new(1.0, 2.0)).with_id(3);
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(
        value,
        json!({ "id": 3, "prompt": "p", "imageUrl": "u", "position": { "x": 1.0, "y": 2.0 } })
    );
}

#[test]
fn wire_format_omits_missing_id() {
    let item = CanvasItem::new("p", "u", Position::default());
    let value = serde_json::to_value(&item).unwrap();
    assert!(value.get("id").is_none());
}

#[test]
fn deserialize_without_id() {
    let item: CanvasItem =
        serde_json::from_value(json!({ "prompt": "p", "imageUrl": "u", "position": { "x": 5, "y": 6 } })).unwrap();
    assert_eq!(item.id, None);
    assert_eq!(item.position, Position::new(5.0, 6.0));
}

#[test]
fn variation_into_item_is_unsaved() {
    let item = Variation::new("a cat, at dusk", "https://img/v.png").into_item(Position::new(-120.0, 100.0));
    assert_eq!(item.id, None);
    assert_eq!(item.prompt, "a cat, at dusk");
    assert_eq!(item.position, Position::new(-120.0, 100.0));
}
