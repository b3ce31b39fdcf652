//! Integration tests that call the real Gemini API.
//!
//! These tests require Gen_API to be set (via .env file or environment).
//! Run with: `cargo test -p gemini --test api_integration -- --ignored`

use gemini::{Error, Gemini, Request, API_KEY_VAR};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var(API_KEY_VAR).is_ok()
}

#[tokio::test]
#[ignore]
async fn test_generate_short_story() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: {API_KEY_VAR} not set");
        return;
    }

    let client = Gemini::from_env().expect("Failed to create client");
    let request = Request::user("Write a Fantasy story in Minimalistic style: a lost key")
        .with_max_output_tokens(256);

    let response = client
        .generate_content(request)
        .await
        .expect("Generation failed");

    assert!(!response.text().is_empty(), "Expected generated text");
}

#[tokio::test]
#[ignore]
async fn test_invalid_key_is_rejected() {
    setup();

    let client = Gemini::new("definitely-not-a-key").expect("Failed to create client");
    match client.generate_text("Hello").await {
        Err(Error::Api { status, .. }) => assert!(status == 400 || status == 401 || status == 403),
        other => panic!("expected API error, got {other:?}"),
    }
}
