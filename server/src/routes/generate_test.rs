use super::*;
use crate::fal::FalError;
use crate::llm::types::LlmError;
use crate::state::test_helpers;
use canvas::gateway::VariationError;

#[test]
fn generate_error_to_status_maps_bad_request() {
    assert_eq!(generate_error_to_status(GenerateError::EmptyPrompt), StatusCode::BAD_REQUEST);
}

#[test]
fn generate_error_to_status_maps_unconfigured() {
    assert_eq!(generate_error_to_status(GenerateError::ImagesUnavailable), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(generate_error_to_status(GenerateError::LlmUnavailable), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn generate_error_to_status_maps_upstream() {
    let errors = [
        GenerateError::Fal(FalError::MissingImage),
        GenerateError::Llm(LlmError::ApiRequest("timeout".into())),
        GenerateError::MalformedPrompts("eof".into()),
        GenerateError::Variation(VariationError::TooFew(3)),
    ];
    for err in errors {
        assert_eq!(generate_error_to_status(err), StatusCode::BAD_GATEWAY);
    }
}

#[tokio::test]
async fn generate_without_credentials_is_unavailable() {
    let state = test_helpers::test_app_state().await;
    let result = generate_image(State(state), Json(PromptBody { prompt: "a cat".into() })).await;
    assert_eq!(result.unwrap_err(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn blank_prompt_is_bad_request() {
    let state = test_helpers::test_app_state().await;
    let result = generate_variations(State(state), Json(PromptBody { prompt: " ".into() })).await;
    assert_eq!(result.unwrap_err(), StatusCode::BAD_REQUEST);
}

#[test]
fn generate_response_uses_camel_case() {
    let value = serde_json::to_value(GenerateResponse { image_url: "https://img/a.png".into() }).unwrap();
    assert_eq!(value, serde_json::json!({ "imageUrl": "https://img/a.png" }));
}
