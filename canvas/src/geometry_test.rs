#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Position
// =============================================================

#[test]
fn position_default_is_origin() {
    assert_eq!(Position::default(), Position::new(0.0, 0.0));
}

#[test]
fn position_offset_adds_components() {
    let p = Position::new(10.0, -5.0).offset(2.5, 7.0);
    assert_eq!(p, Position::new(12.5, 2.0));
}

#[test]
fn position_delta_from() {
    let (dx, dy) = Position::new(50.0, 80.0).delta_from(Position::new(10.0, 10.0));
    assert_eq!(dx, 40.0);
    assert_eq!(dy, 70.0);
}

#[test]
fn position_distance() {
    assert_eq!(Position::new(3.0, 4.0).distance_to(Position::default()), 5.0);
}

#[test]
fn position_serde_shape() {
    let json = serde_json::to_value(Position::new(1.5, 2.0)).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 1.5, "y": 2.0 }));
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn clamp_inside_is_identity() {
    let b = Bounds::new(1000.0, 800.0);
    let p = Position::new(100.0, 100.0);
    assert_eq!(b.clamp_item(p, 200.0), p);
}

#[test]
fn clamp_negative_pins_to_zero() {
    let b = Bounds::new(1000.0, 800.0);
    assert_eq!(b.clamp_item(Position::new(-40.0, -1.0), 200.0), Position::new(0.0, 0.0));
}

#[test]
fn clamp_keeps_whole_item_inside() {
    let b = Bounds::new(1000.0, 800.0);
    assert_eq!(b.clamp_item(Position::new(950.0, 799.0), 200.0), Position::new(800.0, 600.0));
}

#[test]
fn clamp_container_smaller_than_item() {
    let b = Bounds::new(150.0, 120.0);
    assert_eq!(b.clamp_item(Position::new(30.0, 30.0), 200.0), Position::new(0.0, 0.0));
}

#[test]
fn clamp_nan_container_does_not_panic() {
    let b = Bounds::new(f64::NAN, f64::NAN);
    assert_eq!(b.clamp_item(Position::new(30.0, 30.0), 200.0), Position::new(0.0, 0.0));
}

// =============================================================
// item_contains
// =============================================================

#[test]
fn contains_inside_and_edges() {
    let origin = Position::new(10.0, 10.0);
    assert!(item_contains(origin, 200.0, Position::new(10.0, 10.0)));
    assert!(item_contains(origin, 200.0, Position::new(110.0, 110.0)));
    assert!(item_contains(origin, 200.0, Position::new(210.0, 210.0)));
}

#[test]
fn contains_outside() {
    let origin = Position::new(10.0, 10.0);
    assert!(!item_contains(origin, 200.0, Position::new(9.0, 50.0)));
    assert!(!item_contains(origin, 200.0, Position::new(50.0, 211.0)));
}
