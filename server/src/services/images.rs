//! Image service: durable CRUD over the `images` table.
//!
//! DESIGN
//! ======
//! Rows are identified by `id`, but a save without an id is matched on
//! `image_url` first so that re-saving an item that lost its id (or was
//! never told it) updates the existing row instead of creating a twin.
//! The lookup and the write run in one transaction.

use sqlx::SqlitePool;
use tracing::info;

use canvas::{CanvasItem, ItemId, Position, SaveOutcome};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(ItemId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Partial update for an existing row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    pub prompt: Option<String>,
    pub position: Option<Position>,
}

type ImageRow = (ItemId, String, String, f64, f64);

fn row_to_item((id, prompt, image_url, x, y): ImageRow) -> CanvasItem {
    CanvasItem::new(prompt, image_url, Position::new(x, y)).with_id(id)
}

// =============================================================================
// QUERIES
// =============================================================================

/// Every row, oldest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_images(pool: &SqlitePool) -> Result<Vec<CanvasItem>, ImageError> {
    let rows = sqlx::query_as::<_, ImageRow>(
        "SELECT id, prompt, image_url, position_x, position_y FROM images ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(row_to_item).collect())
}

/// One row by id.
///
/// # Errors
///
/// Returns `NotFound` if no row has that id.
pub async fn get_image(pool: &SqlitePool, id: ItemId) -> Result<CanvasItem, ImageError> {
    sqlx::query_as::<_, ImageRow>("SELECT id, prompt, image_url, position_x, position_y FROM images WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(row_to_item)
        .ok_or(ImageError::NotFound(id))
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Create or update a row from a canvas item.
///
/// With an `id` that row is overwritten. Without one, the oldest row with the
/// same `image_url` is overwritten, otherwise a row is inserted.
///
/// # Errors
///
/// Returns `NotFound` when an explicit `id` matches no row.
pub async fn save_image(pool: &SqlitePool, item: &CanvasItem) -> Result<SaveOutcome, ImageError> {
    let mut tx = pool.begin().await?;

    let target = match item.id {
        Some(id) => Some(id),
        None => {
            sqlx::query_as::<_, (ItemId,)>("SELECT id FROM images WHERE image_url = ? ORDER BY id LIMIT 1")
                .bind(&item.image_url)
                .fetch_optional(&mut *tx)
                .await?
                .map(|(id,)| id)
        }
    };

    let outcome = if let Some(id) = target {
        let result = sqlx::query(
            "UPDATE images SET prompt = ?, image_url = ?, position_x = ?, position_y = ? WHERE id = ?",
        )
        .bind(&item.prompt)
        .bind(&item.image_url)
        .bind(item.position.x)
        .bind(item.position.y)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ImageError::NotFound(id));
        }
        SaveOutcome::Updated(id)
    } else {
        let result = sqlx::query("INSERT INTO images (prompt, image_url, position_x, position_y) VALUES (?, ?, ?, ?)")
            .bind(&item.prompt)
            .bind(&item.image_url)
            .bind(item.position.x)
            .bind(item.position.y)
            .execute(&mut *tx)
            .await?;
        SaveOutcome::Inserted(result.last_insert_rowid())
    };

    tx.commit().await?;
    info!(id = outcome.id(), inserted = matches!(outcome, SaveOutcome::Inserted(_)), "image saved");
    Ok(outcome)
}

/// Apply a partial update to an existing row and return the result.
///
/// # Errors
///
/// Returns `NotFound` if no row has that id.
pub async fn update_image(pool: &SqlitePool, id: ItemId, patch: ImagePatch) -> Result<CanvasItem, ImageError> {
    let mut item = get_image(pool, id).await?;
    if let Some(prompt) = patch.prompt {
        item.prompt = prompt;
    }
    if let Some(position) = patch.position {
        item.position = position;
    }
    save_image(pool, &item).await?;
    Ok(item)
}

/// Delete one row.
///
/// # Errors
///
/// Returns `NotFound` if no row has that id.
pub async fn delete_image(pool: &SqlitePool, id: ItemId) -> Result<(), ImageError> {
    let result = sqlx::query("DELETE FROM images WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ImageError::NotFound(id));
    }
    info!(id, "image deleted");
    Ok(())
}

/// Delete every row. Returns how many were removed.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn clear_images(pool: &SqlitePool) -> Result<u64, ImageError> {
    let result = sqlx::query("DELETE FROM images").execute(pool).await?;
    info!(count = result.rows_affected(), "images cleared");
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "images_test.rs"]
mod tests;
