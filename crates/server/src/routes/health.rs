use std::sync::Arc;

use axum::{Extension, Json};
use serde::Serialize;

use crate::analyzer::ChessAnalyzer;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub engine_available: bool,
}

/// GET /api/health
pub async fn health_check(Extension(analyzer): Extension<Arc<ChessAnalyzer>>) -> Json<HealthResponse> {
    let engine_available = analyzer.engine_available();
    Json(HealthResponse {
        status: if engine_available { "healthy" } else { "degraded" },
        engine_available,
    })
}
