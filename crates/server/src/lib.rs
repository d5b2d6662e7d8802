pub mod analyzer;
pub mod clients;
pub mod config;
pub mod correction;
pub mod error;
pub mod explain;
pub mod middleware;
pub mod routes;
pub mod settings;
pub mod stockfish;
pub mod vision;

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use analyzer::ChessAnalyzer;
use clients::openai::{OpenAiClient, OpenAiError};
use config::Config;
use settings::EngineSettings;
use vision::ImageRecognizer;

/// Long-lived handles shared by every request.
pub struct Services {
    pub analyzer: Arc<ChessAnalyzer>,
    pub recognizer: Arc<ImageRecognizer>,
    pub llm: Option<Arc<OpenAiClient>>,
}

impl Services {
    pub fn from_config(config: &Config, settings: EngineSettings) -> Result<Self, OpenAiError> {
        let llm = match config.openai_api_key.as_deref() {
            Some(key) => {
                let client = OpenAiClient::new(key, config)?;
                tracing::info!(model = client.model(), "OpenAI client configured");
                Some(Arc::new(client))
            }
            None => {
                tracing::info!("OPENAI_API_KEY not set - using template explanations, image recognition disabled");
                None
            }
        };

        Ok(Self {
            analyzer: Arc::new(ChessAnalyzer::new(config, settings, llm.clone())),
            recognizer: Arc::new(ImageRecognizer::new(llm.clone())),
            llm,
        })
    }
}

pub fn build_router(config: &Config, services: &Services) -> Router {
    let static_dir = Path::new(&config.static_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/api/health", get(routes::health::health_check))
        .route("/api/settings", get(routes::settings::get_settings))
        .route("/api/validate-fen", post(routes::fen::validate_fen))
        .route("/api/analyze", post(routes::analyze::analyze_position))
        .route("/api/recognize", post(routes::recognize::recognize_position))
        .route("/api/correct-position", post(routes::correct::correct_position))
        // Shared state
        .layer(Extension(services.analyzer.clone()))
        .layer(Extension(services.recognizer.clone()))
        .layer(Extension(services.llm.clone()))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(axum::middleware::from_fn(middleware::timing_layer))
        .layer(CompressionLayer::new())
        .layer(cors)
}
