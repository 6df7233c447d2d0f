use super::*;
use crate::state::test_helpers;

fn body(url: &str, x: f64, y: f64) -> CanvasItem {
    CanvasItem::new("a prompt", url, Position::new(x, y))
}

#[test]
fn image_error_to_status_maps_not_found() {
    assert_eq!(image_error_to_status(ImageError::NotFound(3)), StatusCode::NOT_FOUND);
}

#[test]
fn image_error_to_status_maps_database() {
    let err = ImageError::Database(sqlx::Error::PoolClosed);
    assert_eq!(image_error_to_status(err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn save_response_from_outcome() {
    assert_eq!(SaveResponse::from(SaveOutcome::Inserted(4)), SaveResponse { id: 4, created: true });
    assert_eq!(SaveResponse::from(SaveOutcome::Updated(4)), SaveResponse { id: 4, created: false });
}

#[tokio::test]
async fn save_then_resave_by_url() {
    let state = test_helpers::test_app_state().await;

    let (status, Json(first)) = save_image(State(state.clone()), Json(body("https://img/a.png", 50.0, 50.0)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first, SaveResponse { id: 1, created: true });

    let (status, Json(second)) = save_image(State(state.clone()), Json(body("https://img/a.png", 70.0, 70.0)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, SaveResponse { id: 1, created: false });

    let Json(items) = list_images(State(state)).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn save_rejects_blank_url() {
    let state = test_helpers::test_app_state().await;
    let result = save_image(State(state), Json(body("  ", 0.0, 0.0))).await;
    assert_eq!(result.unwrap_err(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_get() {
    let state = test_helpers::test_app_state().await;
    save_image(State(state.clone()), Json(body("https://img/a.png", 0.0, 0.0)))
        .await
        .unwrap();

    let update = UpdateImageBody { prompt: None, position: Some(Position::new(10.0, 20.0)) };
    let Json(updated) = update_image(State(state.clone()), Path(1), Json(update)).await.unwrap();
    assert_eq!(updated.position, Position::new(10.0, 20.0));

    let Json(fetched) = get_image(State(state), Path(1)).await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn delete_and_clear() {
    let state = test_helpers::test_app_state().await;
    for url in ["a", "b", "c"] {
        save_image(State(state.clone()), Json(body(url, 0.0, 0.0))).await.unwrap();
    }

    assert_eq!(delete_image(State(state.clone()), Path(2)).await.unwrap(), StatusCode::NO_CONTENT);
    assert_eq!(delete_image(State(state.clone()), Path(2)).await.unwrap_err(), StatusCode::NOT_FOUND);

    let Json(cleared) = clear_images(State(state.clone())).await.unwrap();
    assert_eq!(cleared.deleted, 2);
    let Json(items) = list_images(State(state)).await.unwrap();
    assert!(items.is_empty());
}

#[test]
fn update_body_accepts_camel_case_position() {
    let parsed: UpdateImageBody = serde_json::from_str(r#"{"position":{"x":1.5,"y":2}}"#).unwrap();
    assert_eq!(parsed.position, Some(Position::new(1.5, 2.0)));
    assert!(parsed.prompt.is_none());
}
