//! End-to-end tests for the video generation proxy.

use reqwest::StatusCode;
use serde_json::json;

mod common;

use common::{client, config_with, secret, start_gateway, start_json_upstream, MockUpstream};

const GENERATIONS_PATH: &str = "/dream-machine/v1/generations";

fn video_config(upstream: &MockUpstream) -> content_gateway::GatewayConfig {
    config_with(|c| {
        c.video.api_key = secret("luma-test-key");
        c.video.endpoint = upstream.url(GENERATIONS_PATH);
    })
}

#[tokio::test]
async fn test_generation_record_is_wrapped() {
    let record = json!({ "id": "gen-42", "state": "queued", "assets": null });
    let upstream = start_json_upstream(201, record.clone()).await;
    let gateway = start_gateway(video_config(&upstream)).await;

    let res = client()
        .post(gateway.url("/api/generate-video"))
        .json(&json!({ "prompt": "a cat surfing", "aspectRatio": "16:9", "loop": true }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "data": record }));

    let captured = upstream.last_request();
    assert_eq!(captured.path, GENERATIONS_PATH);
    assert_eq!(captured.header("authorization"), Some("Bearer luma-test-key"));
    assert_eq!(
        captured.json(),
        json!({ "prompt": "a cat surfing", "aspect_ratio": "16:9", "loop": true })
    );
}

#[tokio::test]
async fn test_optional_fields_are_omitted_upstream() {
    let upstream = start_json_upstream(200, json!({ "id": "gen-1" })).await;
    let gateway = start_gateway(video_config(&upstream)).await;

    let res = client()
        .post(gateway.url("/api/generate-video"))
        .json(&json!({ "prompt": "sunrise" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(upstream.last_request().json(), json!({ "prompt": "sunrise" }));
}

#[tokio::test]
async fn test_upstream_detail_is_passed_through() {
    let upstream = start_json_upstream(400, json!({ "detail": "Insufficient credits" })).await;
    let gateway = start_gateway(video_config(&upstream)).await;

    let res = client()
        .post(gateway.url("/api/generate-video"))
        .json(&json!({ "prompt": "a cat surfing" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Insufficient credits" }));
}

#[tokio::test]
async fn test_upstream_failure_without_message() {
    let upstream = common::start_mock_upstream(500, "text/plain", "oops").await;
    let gateway = start_gateway(video_config(&upstream)).await;

    let res = client()
        .post(gateway.url("/api/generate-video"))
        .json(&json!({ "prompt": "a cat surfing" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Video generation failed" }));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_upstream() {
    let upstream = start_json_upstream(200, json!({ "id": "unused" })).await;
    let gateway = start_gateway(video_config(&upstream)).await;

    let cases = [
        (json!({}), "Prompt is required"),
        (json!({ "prompt": "   " }), "Prompt is required"),
        (
            json!({ "prompt": "ok", "aspectRatio": "2:1" }),
            "Unsupported aspect ratio",
        ),
    ];
    for (body, expected) in cases {
        let res = client()
            .post(gateway.url("/api/generate-video"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": expected }));
    }

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_not_configured() {
    let upstream = start_json_upstream(200, json!({ "id": "unused" })).await;
    let gateway = start_gateway(config_with(|c| {
        c.video.endpoint = upstream.url(GENERATIONS_PATH);
    }))
    .await;

    let res = client()
        .post(gateway.url("/api/generate-video"))
        .json(&json!({ "prompt": "a cat surfing" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Video generation not configured" }));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_silent_upstream_hits_request_deadline() {
    let upstream = common::start_silent_upstream().await;
    let gateway = start_gateway(config_with(|c| {
        c.timeouts.request_secs = 1;
        c.video.api_key = secret("luma-test-key");
        c.video.endpoint = upstream.url(GENERATIONS_PATH);
    }))
    .await;

    let res = client()
        .post(gateway.url("/api/generate-video"))
        .json(&json!({ "prompt": "a cat surfing" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Request timed out" }));
    assert_eq!(upstream.calls(), 1);
}
