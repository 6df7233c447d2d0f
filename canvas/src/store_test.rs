#![allow(clippy::float_cmp)]

use super::*;

fn item(n: u32) -> CanvasItem {
    CanvasItem::new(format!("prompt {n}"), format!("https://img/{n}.png"), Position::new(f64::from(n), 0.0))
}

fn urls(store: &CanvasStore) -> Vec<String> {
    store.iter().map(|i| i.image_url.clone()).collect()
}

// =============================================================
// Adding
// =============================================================

#[test]
fn new_store_is_empty() {
    let store = CanvasStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert_eq!(store.revision(), 0);
}

#[test]
fn add_item_appends_in_order() {
    let mut store = CanvasStore::new();
    store.add_item(item(1));
    store.add_item(item(2));
    assert_eq!(urls(&store), vec!["https://img/1.png", "https://img/2.png"]);
    assert_eq!(store.revision(), 2);
}

#[test]
fn add_items_is_one_update() {
    let mut store = CanvasStore::new();
    store.add_item(item(0));
    let before = store.revision();
    store.add_items((1..=4).map(item));
    assert_eq!(store.len(), 5);
    assert_eq!(store.revision(), before + 1);
    assert_eq!(store.items()[4].image_url, "https://img/4.png");
}

#[test]
fn add_items_empty_is_noop() {
    let mut store = CanvasStore::new();
    store.add_items(Vec::new());
    assert_eq!(store.revision(), 0);
}

// =============================================================
// Removing
// =============================================================

#[test]
fn remove_item_removes_all_and_only_matching() {
    let mut store = CanvasStore::new();
    let original = item(1).with_id(9);
    store.add_item(original.clone());
    store.add_item(item(2));
    store.add_item(original.duplicate());
    store.add_item(item(3));

    let removed = store.remove_item("https://img/1.png");
    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0].id, Some(9));
    assert_eq!(removed[1].id, None);
    assert_eq!(urls(&store), vec!["https://img/2.png", "https://img/3.png"]);
}

#[test]
fn remove_unknown_is_noop() {
    let mut store = CanvasStore::new();
    store.add_item(item(1));
    let rev = store.revision();
    assert!(store.remove_item("https://img/404.png").is_empty());
    assert_eq!(store.len(), 1);
    assert_eq!(store.revision(), rev);
}

// =============================================================
// Positions
// =============================================================

#[test]
fn update_position_touches_only_position() {
    let mut store = CanvasStore::new();
    store.add_item(item(1).with_id(4));
    store.add_item(item(2));
    assert!(store.update_position("https://img/1.png", Position::new(300.0, 400.0)));

    let moved = store.get("https://img/1.png").unwrap();
    assert_eq!(moved.position, Position::new(300.0, 400.0));
    assert_eq!(moved.id, Some(4));
    assert_eq!(moved.prompt, "prompt 1");
    assert_eq!(store.get("https://img/2.png").unwrap().position, Position::new(2.0, 0.0));
    assert_eq!(urls(&store), vec!["https://img/1.png", "https://img/2.png"]);
}

#[test]
fn update_position_unknown_is_noop() {
    let mut store = CanvasStore::new();
    store.add_item(item(1));
    let before = store.snapshot();
    let rev = store.revision();
    assert!(!store.update_position("https://img/404.png", Position::new(1.0, 1.0)));
    assert_eq!(&*store.snapshot(), &*before);
    assert_eq!(store.revision(), rev);
}

#[test]
fn apply_positions_is_one_update() {
    let mut store = CanvasStore::new();
    store.add_items((0..3).map(item));
    let rev = store.revision();
    store.apply_positions(&[Position::new(10.0, 710.0), Position::new(220.0, 710.0), Position::new(430.0, 710.0)]);
    assert_eq!(store.revision(), rev + 1);
    assert_eq!(store.items()[2].position, Position::new(430.0, 710.0));
}

#[test]
fn apply_positions_short_slice_leaves_tail() {
    let mut store = CanvasStore::new();
    store.add_items((0..3).map(item));
    store.apply_positions(&[Position::new(5.0, 5.0)]);
    assert_eq!(store.items()[0].position, Position::new(5.0, 5.0));
    assert_eq!(store.items()[1].position, Position::new(1.0, 0.0));
}

#[test]
fn apply_positions_where_skips_rejected_items() {
    let mut store = CanvasStore::new();
    store.add_items((0..3).map(item));
    let rev = store.revision();
    let moved = store.apply_positions_where(
        &[Position::new(10.0, 710.0), Position::new(220.0, 710.0), Position::new(430.0, 710.0)],
        |item| item.image_url != "https://img/1.png",
    );
    assert_eq!(moved, 2);
    assert_eq!(store.revision(), rev + 1);
    assert_eq!(store.items()[1].position, Position::new(1.0, 0.0));
    assert_eq!(store.items()[2].position, Position::new(430.0, 710.0));
}

#[test]
fn apply_positions_where_rejecting_all_is_not_an_update() {
    let mut store = CanvasStore::new();
    store.add_items((0..2).map(item));
    let rev = store.revision();
    assert_eq!(store.apply_positions_where(&[Position::new(5.0, 5.0)], |_| false), 0);
    assert_eq!(store.revision(), rev);
}

// =============================================================
// Replace / saved ids
// =============================================================

#[test]
fn replace_item_keeps_slot() {
    let mut store = CanvasStore::new();
    store.add_items((1..=3).map(item));
    let saved = item(2).with_id(11);
    assert!(store.replace_item("https://img/2.png", saved));
    assert_eq!(store.items()[1].id, Some(11));
    assert_eq!(urls(&store), vec!["https://img/1.png", "https://img/2.png", "https://img/3.png"]);
}

#[test]
fn replace_unknown_returns_false() {
    let mut store = CanvasStore::new();
    assert!(!store.replace_item("https://img/1.png", item(1)));
    assert!(store.is_empty());
}

#[test]
fn apply_saved_id_keeps_newer_position() {
    let mut store = CanvasStore::new();
    store.add_item(item(1));
    // Save starts, then the user drags before it completes.
    store.update_position("https://img/1.png", Position::new(500.0, 500.0));
    assert!(store.apply_saved_id("https://img/1.png", 21));

    let it = store.get("https://img/1.png").unwrap();
    assert_eq!(it.id, Some(21));
    assert_eq!(it.position, Position::new(500.0, 500.0));
}

#[test]
fn apply_saved_id_for_deleted_item_is_skipped() {
    let mut store = CanvasStore::new();
    store.add_item(item(1));
    store.remove_item("https://img/1.png");
    assert!(!store.apply_saved_id("https://img/1.png", 21));
    assert!(store.is_empty());
}

#[test]
fn apply_saved_id_never_rekeys_a_different_row() {
    let mut store = CanvasStore::new();
    store.add_item(item(1).with_id(3));
    assert!(!store.apply_saved_id("https://img/1.png", 4));
    assert_eq!(store.get("https://img/1.png").unwrap().id, Some(3));
}

#[test]
fn apply_saved_id_same_id_is_quiet() {
    let mut store = CanvasStore::new();
    store.add_item(item(1).with_id(3));
    let rev = store.revision();
    assert!(store.apply_saved_id("https://img/1.png", 3));
    assert_eq!(store.revision(), rev);
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn snapshot_is_independent_of_later_mutation() {
    let mut store = CanvasStore::new();
    store.add_items((0..3).map(item));
    let snap = store.snapshot();

    store.remove_item("https://img/0.png");
    store.update_position("https://img/1.png", Position::new(-1.0, -1.0));

    assert_eq!(snap.len(), 3);
    assert_eq!(snap[1].position, Position::new(1.0, 0.0));
    assert_eq!(store.len(), 2);
}

#[test]
fn load_replaces_everything() {
    let mut store = CanvasStore::new();
    store.add_item(item(1));
    store.load(vec![item(7).with_id(1), item(8).with_id(2)]);
    assert_eq!(urls(&store), vec!["https://img/7.png", "https://img/8.png"]);
}
