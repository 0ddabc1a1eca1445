//! Integration tests for the Gemini client over HTTP.
//!
//! Each test starts a local fake of the `generateContent` endpoint and points
//! the client at it through `GEMINI_API_URL`.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use kirana_mitra_advisor::{AdvisoryEngine, GeminiClient, GeminiError};
use kirana_mitra_core::{InventoryStore, ReportSource};
use kirana_mitra_integration_tests::{
    FakeGemini, FakeReply, STRUCTURED_REPLY, TEST_API_KEY, TEST_MODEL,
};

// =============================================================================
// Request Shape Tests
// =============================================================================

#[tokio::test]
async fn test_request_shape() {
    let server = FakeGemini::start(FakeReply::text(STRUCTURED_REPLY)).await;
    let engine = AdvisoryEngine::from_config(&server.config()).expect("engine");

    engine.analyze(InventoryStore::demo().snapshot()).await;

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = requests.first().expect("one request");
    assert_eq!(request.call, format!("{TEST_MODEL}:generateContent"));
    assert_eq!(request.api_key.as_deref(), Some(TEST_API_KEY));

    let body = &request.body;
    assert_eq!(body["contents"][0]["role"], "user");
    let user = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .expect("user text");
    assert!(user.contains("Rice (Basmati)"));
    let system = body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system text");
    assert!(system.contains("## FAST SELLERS"));
    assert!(system.contains("plain English"));
    assert!(body["generationConfig"]["maxOutputTokens"].is_number());
}

// =============================================================================
// Success Tests
// =============================================================================

#[tokio::test]
async fn test_structured_response() {
    let server = FakeGemini::start(FakeReply::text(STRUCTURED_REPLY)).await;
    let engine = AdvisoryEngine::from_config(&server.config()).expect("engine");

    let report = engine.analyze(InventoryStore::demo().snapshot()).await;

    assert_eq!(report.source, ReportSource::Generated);
    assert_eq!(report.status, "Two items need attention.");
    assert_eq!(report.advice, "Order before the weekend rush.");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_multi_part_text_is_joined() {
    let body = json!({
        "candidates": [{
            "content": {"role": "model", "parts": [
                {"text": "## STATUS\nok\n## ACTIONS\nnone\n"},
                {"text": "## FAST SELLERS\nSalt\n## ADVICE\nkeep going"}
            ]},
            "finishReason": "STOP"
        }]
    });
    let server = FakeGemini::start(FakeReply::json(StatusCode::OK, body)).await;
    let client = GeminiClient::new(&server.config().gemini).expect("client");

    let text = client.generate_text("system", "user").await.expect("text");
    assert!(text.contains("## ACTIONS\nnone\n## FAST SELLERS"));
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_rate_limited() {
    let reply = FakeReply::json(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}),
    )
    .with_retry_after(17);
    let server = FakeGemini::start(reply).await;
    let client = GeminiClient::new(&server.config().gemini).expect("client");

    let err = client.generate_text("s", "u").await.expect_err("should fail");
    assert!(matches!(err, GeminiError::RateLimited(17)));
}

#[tokio::test]
async fn test_unauthorized() {
    let reply = FakeReply::json(
        StatusCode::FORBIDDEN,
        json!({"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}),
    );
    let server = FakeGemini::start(reply).await;
    let client = GeminiClient::new(&server.config().gemini).expect("client");

    let err = client.generate_text("s", "u").await.expect_err("should fail");
    assert!(matches!(err, GeminiError::Unauthorized(_)));
}

#[tokio::test]
async fn test_server_error_envelope() {
    let reply = FakeReply::json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"code": 500, "message": "Internal error encountered.", "status": "INTERNAL"}}),
    );
    let server = FakeGemini::start(reply).await;
    let client = GeminiClient::new(&server.config().gemini).expect("client");

    match client.generate_text("s", "u").await {
        Err(GeminiError::Api { status, message }) => {
            assert_eq!(status, "INTERNAL");
            assert_eq!(message, "Internal error encountered.");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blocked_prompt() {
    let reply = FakeReply::json(
        StatusCode::OK,
        json!({"promptFeedback": {"blockReason": "SAFETY"}}),
    );
    let server = FakeGemini::start(reply).await;
    let client = GeminiClient::new(&server.config().gemini).expect("client");

    let err = client.generate_text("s", "u").await.expect_err("should fail");
    assert!(matches!(err, GeminiError::Blocked(reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn test_empty_candidates() {
    let reply = FakeReply::json(StatusCode::OK, json!({"candidates": []}));
    let server = FakeGemini::start(reply).await;
    let client = GeminiClient::new(&server.config().gemini).expect("client");

    let err = client.generate_text("s", "u").await.expect_err("should fail");
    assert!(matches!(err, GeminiError::EmptyResponse(_)));
}

// =============================================================================
// Degraded Report Tests
// =============================================================================

#[tokio::test]
async fn test_http_failures_degrade_without_retry() {
    let replies = [
        FakeReply::json(StatusCode::TOO_MANY_REQUESTS, json!({})),
        FakeReply::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": {"code": 500, "message": "boom", "status": "INTERNAL"}}),
        ),
        FakeReply::json(StatusCode::BAD_GATEWAY, json!("upstream down")),
        FakeReply::json(StatusCode::OK, json!({"candidates": []})),
        FakeReply::text("   \n  "),
    ];

    for reply in replies {
        let server = FakeGemini::start(reply).await;
        let engine = AdvisoryEngine::from_config(&server.config()).expect("engine");

        let report = engine.analyze(InventoryStore::demo().snapshot()).await;

        assert!(report.is_degraded(), "expected degraded report");
        assert!(report.advice.contains("temporarily unavailable"));
        assert_eq!(server.hits(), 1, "exactly one call, no retries");
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server =
        FakeGemini::start(FakeReply::text(STRUCTURED_REPLY).with_delay(Duration::from_secs(10)))
            .await;
    let engine = AdvisoryEngine::from_config(&server.config())
        .expect("engine")
        .with_timeout(Duration::from_millis(200));

    let report = engine.analyze(InventoryStore::demo().snapshot()).await;
    assert!(report.is_degraded());
}

#[tokio::test]
async fn test_unreachable_server_degrades() {
    // Bind then drop a listener to get a port nothing is serving on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let mut config = FakeGemini::start(FakeReply::text(STRUCTURED_REPLY))
        .await
        .config();
    config.gemini.base_url = format!("http://{addr}").parse().expect("url");

    let engine = AdvisoryEngine::from_config(&config).expect("engine");
    let report = engine.analyze(InventoryStore::demo().snapshot()).await;
    assert!(report.is_degraded());
}
