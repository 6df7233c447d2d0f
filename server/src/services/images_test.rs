#![allow(clippy::float_cmp)]

use super::*;

async fn pool() -> SqlitePool {
    crate::db::memory_pool().await.unwrap()
}

fn item(url: &str, x: f64, y: f64) -> CanvasItem {
    CanvasItem::new(format!("prompt for {url}"), url, Position::new(x, y))
}

async fn row_count(pool: &SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM images")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// =========================================================================
// save_image
// =========================================================================

#[tokio::test]
async fn save_without_id_inserts() {
    let pool = pool().await;
    let outcome = save_image(&pool, &item("https://img/a.png", 50.0, 50.0)).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Inserted(1));
    assert_eq!(row_count(&pool).await, 1);
}

#[tokio::test]
async fn save_without_id_updates_row_with_same_url() {
    let pool = pool().await;
    save_image(&pool, &item("https://img/a.png", 50.0, 50.0)).await.unwrap();

    let outcome = save_image(&pool, &item("https://img/a.png", 300.0, 400.0)).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Updated(1));
    assert_eq!(row_count(&pool).await, 1);
    let stored = get_image(&pool, 1).await.unwrap();
    assert_eq!(stored.position, Position::new(300.0, 400.0));
}

#[tokio::test]
async fn save_with_id_updates_that_row() {
    let pool = pool().await;
    save_image(&pool, &item("https://img/a.png", 0.0, 0.0)).await.unwrap();
    save_image(&pool, &item("https://img/b.png", 0.0, 0.0)).await.unwrap();

    let moved = item("https://img/b.png", 220.0, 710.0).with_id(2);
    assert_eq!(save_image(&pool, &moved).await.unwrap(), SaveOutcome::Updated(2));
    assert_eq!(get_image(&pool, 2).await.unwrap().position, Position::new(220.0, 710.0));
    assert_eq!(get_image(&pool, 1).await.unwrap().position, Position::new(0.0, 0.0));
}

#[tokio::test]
async fn save_with_unknown_id_is_not_found() {
    let pool = pool().await;
    let ghost = item("https://img/a.png", 0.0, 0.0).with_id(42);
    assert!(matches!(save_image(&pool, &ghost).await, Err(ImageError::NotFound(42))));
    assert_eq!(row_count(&pool).await, 0);
}

// =========================================================================
// list / get / update
// =========================================================================

#[tokio::test]
async fn list_is_ordered_by_id() {
    let pool = pool().await;
    for url in ["c", "a", "b"] {
        save_image(&pool, &item(url, 1.0, 2.0)).await.unwrap();
    }
    let urls: Vec<String> = list_images(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.image_url)
        .collect();
    assert_eq!(urls, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn listed_items_carry_ids() {
    let pool = pool().await;
    save_image(&pool, &item("a", 1.0, 2.0)).await.unwrap();
    let items = list_images(&pool).await.unwrap();
    assert_eq!(items[0].id, Some(1));
    assert_eq!(items[0].prompt, "prompt for a");
    assert_eq!(items[0].position, Position::new(1.0, 2.0));
}

#[tokio::test]
async fn update_applies_only_given_fields() {
    let pool = pool().await;
    save_image(&pool, &item("a", 1.0, 2.0)).await.unwrap();

    let patch = ImagePatch { prompt: None, position: Some(Position::new(9.0, 8.0)) };
    let updated = update_image(&pool, 1, patch).await.unwrap();
    assert_eq!(updated.prompt, "prompt for a");
    assert_eq!(updated.position, Position::new(9.0, 8.0));

    let patch = ImagePatch { prompt: Some("renamed".into()), position: None };
    let updated = update_image(&pool, 1, patch).await.unwrap();
    assert_eq!(updated.prompt, "renamed");
    assert_eq!(updated.position, Position::new(9.0, 8.0));
}

#[tokio::test]
async fn update_missing_row_is_not_found() {
    let pool = pool().await;
    let result = update_image(&pool, 5, ImagePatch::default()).await;
    assert!(matches!(result, Err(ImageError::NotFound(5))));
}

// =========================================================================
// delete / clear
// =========================================================================

#[tokio::test]
async fn delete_removes_row() {
    let pool = pool().await;
    save_image(&pool, &item("a", 0.0, 0.0)).await.unwrap();
    delete_image(&pool, 1).await.unwrap();
    assert_eq!(row_count(&pool).await, 0);
    assert!(matches!(delete_image(&pool, 1).await, Err(ImageError::NotFound(1))));
}

#[tokio::test]
async fn clear_removes_everything() {
    let pool = pool().await;
    for url in ["a", "b", "c"] {
        save_image(&pool, &item(url, 0.0, 0.0)).await.unwrap();
    }
    assert_eq!(clear_images(&pool).await.unwrap(), 3);
    assert!(list_images(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let pool = pool().await;
    save_image(&pool, &item("a", 0.0, 0.0)).await.unwrap();
    delete_image(&pool, 1).await.unwrap();
    assert_eq!(save_image(&pool, &item("b", 0.0, 0.0)).await.unwrap(), SaveOutcome::Inserted(2));
}
