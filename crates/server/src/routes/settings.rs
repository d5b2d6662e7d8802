use std::sync::Arc;

use axum::{Extension, Json};

use crate::analyzer::ChessAnalyzer;
use crate::settings::EngineSettings;

/// GET /api/settings
pub async fn get_settings(Extension(analyzer): Extension<Arc<ChessAnalyzer>>) -> Json<EngineSettings> {
    Json(analyzer.settings().clone())
}
