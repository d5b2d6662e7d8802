mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{app, app_with, get, post_json, test_config, START_FEN};

#[tokio::test]
async fn test_health_with_engine() {
    let (status, body) = get(app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "engine_available": true }));
}

#[tokio::test]
async fn test_health_without_engine() {
    if common::system_engine_installed() {
        return;
    }
    let (status, body) = get(app_with(test_config(None)), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["engine_available"], false);
}

#[tokio::test]
async fn test_settings() {
    let (status, body) = get(app(), "/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hash"], 64);
    assert_eq!(body["default_depth"], 18);
    assert_eq!(body["cloud_mode"], false);
}

#[tokio::test]
async fn test_index_page() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_validate_fen() {
    let (status, body) = post_json(app(), "/api/validate-fen", json!({ "fen": START_FEN })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "valid": true, "message": "Valid FEN" }));

    let (status, body) = post_json(app(), "/api/validate-fen", json!({ "fen": "8/8/8/8/8/8/8/8 w - - 0 1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], "Invalid board position");

    let (_, body) = post_json(app(), "/api/validate-fen", json!({ "fen": "hello world" })).await;
    assert_eq!(body["valid"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid FEN: "));
}

#[tokio::test]
async fn test_validate_fen_missing_field() {
    let (status, body) = post_json(app(), "/api/validate-fen", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn test_analyze_requires_input() {
    let (status, body) = post_json(app(), "/api/analyze", json!({ "depth": 10 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No FEN or image provided" }));

    let (status, body) = post_json(app(), "/api/analyze", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");
}

#[tokio::test]
async fn test_analyze_without_body() {
    let response = app()
        .oneshot(Request::post("/api/analyze").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_invalid_fen() {
    let (status, body) = post_json(app(), "/api/analyze", json!({ "fen": "rnbqkbnr/pppppppp/8" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Analysis error: Invalid FEN"));
}

#[tokio::test]
async fn test_analyze_start_position() {
    let (status, body) = post_json(
        app(),
        "/api/analyze",
        json!({ "fen": START_FEN, "depth": 12, "num_moves": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    assert_eq!(body["turn"], "white");
    assert_eq!(body["analysis_depth"], 12);

    let moves = body["best_moves"].as_array().unwrap();
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[0]["rank"], 1);
    assert_eq!(moves[0]["move"], "e2e4");
    assert_eq!(moves[0]["move_san"], "e4");
    assert_eq!(moves[0]["score"], "+0.35");
    assert_eq!(moves[0]["score_value"], 35);
    assert_eq!(moves[0]["line"], "e4 e5 Nf3 Nc6");
    assert_eq!(moves[1]["move_san"], "d4");

    let context = &body["position_context"];
    assert_eq!(context["legal_moves_count"], 20);
    assert_eq!(context["phase"], "opening");
    assert_eq!(context["material_balance"]["balance"], 0);

    let explanation = body["explanation"].as_str().unwrap();
    assert!(explanation.contains("e4"));
}

#[tokio::test]
async fn test_analyze_depth_clamped_and_lang() {
    let (status, body) = post_json(
        app(),
        "/api/analyze",
        json!({ "fen": START_FEN, "depth": 99, "lang": "pt" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["analysis_depth"], 22);
    assert_eq!(body["best_moves"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_analyze_zero_moves_rejected() {
    let (status, body) = post_json(app(), "/api/analyze", json!({ "fen": START_FEN, "num_moves": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "num_moves must be at least 1");
}

#[tokio::test]
async fn test_analyze_missing_engine() {
    if common::system_engine_installed() {
        return;
    }
    let (status, body) = post_json(app_with(test_config(None)), "/api/analyze", json!({ "fen": START_FEN })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Analysis error: Stockfish not found"));
}

#[tokio::test]
async fn test_analyze_image_without_key() {
    let (status, body) = post_json(app(), "/api/analyze", json!({ "image": "data:image/png;base64,iVBORw0KGgo=" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Image processing error: OpenAI API key not configured"));
}

#[tokio::test]
async fn test_recognize_errors() {
    let (status, body) = post_json(app(), "/api/recognize", json!({ "image": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image provided");

    let (status, body) = post_json(app(), "/api/recognize", json!({ "image": "!!not base64!!" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Image processing error: Invalid base64"));
}

#[tokio::test]
async fn test_correct_position_with_rules() {
    let (status, body) = post_json(
        app(),
        "/api/correct-position",
        json!({
            "original_fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "correction": "the white knight should be on f3 not g1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["fen"].as_str().unwrap().starts_with("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R"));
    assert_eq!(body["turn"], "white");
}

#[tokio::test]
async fn test_correct_position_errors() {
    let (status, body) = post_json(app(), "/api/correct-position", json!({ "original_fen": START_FEN })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Both original_fen and correction are required");

    let (status, body) = post_json(
        app(),
        "/api/correct-position",
        json!({ "original_fen": START_FEN, "correction": "looks wrong somehow" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Could not apply the correction. Please try editing the FEN directly."
    );
}
