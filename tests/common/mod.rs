#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};
use server::config::Config;
use server::settings::EngineSettings;
use server::{build_router, Services};
use tower::ServiceExt;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Speaks just enough UCI to answer every search with three lines from the start position.
const FAKE_ENGINE: &str = r#"#!/bin/sh
while read -r line; do
  case "$line" in
    uci)
      echo "id name FakeFish"
      echo "uciok"
      ;;
    isready)
      echo "readyok"
      ;;
    go*)
      echo "info depth 12 seldepth 16 multipv 1 score cp 35 nodes 4021 pv e2e4 e7e5 g1f3 b8c6"
      echo "info depth 12 seldepth 15 multipv 2 score cp 30 nodes 4021 pv d2d4 d7d5 c2c4"
      echo "info depth 12 seldepth 15 multipv 3 score cp 24 nodes 4021 pv g1f3 g8f6"
      echo "bestmove e2e4 ponder e7e5"
      ;;
    quit)
      exit 0
      ;;
  esac
done
"#;

/// Reads commands and never answers, not even `uciok`.
const SILENT_ENGINE: &str = r#"#!/bin/sh
while read -r line; do
  :
done
"#;

/// Dies on its first `go`; later processes behave like `FAKE_ENGINE`.
const CRASH_ONCE_ENGINE: &str = r#"#!/bin/sh
while read -r line; do
  case "$line" in
    uci)
      echo "uciok"
      ;;
    isready)
      echo "readyok"
      ;;
    go*)
      if [ ! -e "@MARKER@" ]; then
        : > "@MARKER@"
        exit 1
      fi
      echo "info depth 8 multipv 1 score cp 35 pv e2e4 e7e5"
      echo "bestmove e2e4"
      ;;
    quit)
      exit 0
      ;;
  esac
done
"#;

pub struct FakeEngines {
    pub working: PathBuf,
    pub silent: PathBuf,
    pub crash_once: PathBuf,
}

/// Engine scripts for this test binary. All of them are written before any
/// test can spawn one, so no script is still open for writing at exec time.
pub fn engines() -> &'static FakeEngines {
    static ENGINES: OnceLock<FakeEngines> = OnceLock::new();
    ENGINES.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("fake-uci-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let marker = dir.join("crashed");
        let _ = std::fs::remove_file(&marker);

        let write = |name: &str, script: &str| {
            let path = dir.join(name);
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        FakeEngines {
            working: write("working.sh", FAKE_ENGINE),
            silent: write("silent.sh", SILENT_ENGINE),
            crash_once: write(
                "crash-once.sh",
                &CRASH_ONCE_ENGINE.replace("@MARKER@", &marker.display().to_string()),
            ),
        }
    })
}

pub fn fake_engine() -> &'static Path {
    &engines().working
}

/// A real Stockfish on this machine would be found even when the configured path is bogus.
pub fn system_engine_installed() -> bool {
    server::stockfish::locate_engine(None).is_some()
}

pub fn test_config(engine: Option<&Path>) -> Config {
    Config {
        stockfish_path: Some(
            engine
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "/nonexistent/stockfish".to_string()),
        ),
        openai_api_key: None,
        engine_timeout_secs: 10,
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
        ..Config::default()
    }
}

/// Router backed by the fake engine and no OpenAI key.
pub fn app() -> Router {
    app_with(test_config(Some(fake_engine())))
}

pub fn app_with(config: Config) -> Router {
    let services = Services::from_config(&config, EngineSettings::for_memory(2_000)).unwrap();
    build_router(&config, &services)
}

/// Router backed by the fake engine and a chat API at `openai_base_url`.
pub fn app_with_openai(openai_base_url: String) -> Router {
    app_with(Config {
        openai_api_key: Some("test-key".to_string()),
        openai_base_url,
        ..test_config(Some(fake_engine()))
    })
}

/// Maps the serialized request messages to a reply; `None` answers HTTP 500.
pub type ChatReply = fn(&str) -> Option<String>;

async fn chat_completions(
    State(reply): State<ChatReply>,
    Json(body): Json<JsonValue>,
) -> (StatusCode, Json<JsonValue>) {
    match reply(&body["messages"].to_string()) {
        Some(text) => (
            StatusCode::OK,
            Json(json!({
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": text } }]
            })),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": "service unavailable" } })),
        ),
    }
}

/// Serve a stand-in chat completions API on a local port and return its base URL.
pub async fn mock_openai(reply: ChatReply) -> String {
    let app = Router::new()
        .route("/chat/completions", post(chat_completions))
        .with_state(reply);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn get(app: Router, path: &str) -> (StatusCode, JsonValue) {
    let response = app
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

pub async fn post_json(app: Router, path: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    let response = app
        .oneshot(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, JsonValue) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, value)
}
