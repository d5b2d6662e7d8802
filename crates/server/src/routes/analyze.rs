use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::recognize::recognize_image;
use super::{non_empty, parse_body, resolve_num_moves};
use crate::analyzer::{AnalysisResult, ChessAnalyzer};
use crate::error::AppError;
use crate::explain::Lang;
use crate::vision::ImageRecognizer;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub fen: Option<String>,
    /// Base64 screenshot, optionally as a data URL
    pub image: Option<String>,
    pub depth: Option<u32>,
    pub num_moves: Option<usize>,
    pub lang: Option<String>,
}

/// POST /api/analyze
/// Analyze a position given as FEN, or as a screenshot when no FEN is sent.
pub async fn analyze_position(
    Extension(analyzer): Extension<Arc<ChessAnalyzer>>,
    Extension(recognizer): Extension<Arc<ImageRecognizer>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let req: AnalyzeRequest = parse_body(payload)?;

    let fen = non_empty(req.fen);
    let image = non_empty(req.image);
    if fen.is_none() && image.is_none() {
        return Err(AppError::BadRequest("No FEN or image provided".into()));
    }
    let num_moves = resolve_num_moves(req.num_moves)?;

    let fen = match fen {
        Some(fen) => fen,
        None => {
            let image = image.unwrap_or_default();
            recognize_image(&recognizer, &image).await?.ok_or_else(|| {
                AppError::BadRequest("Could not recognize chess position from image".into())
            })?
        }
    };

    let lang = Lang::from_code(req.lang.as_deref());
    let result = analyzer
        .analyze(&fen, req.depth, num_moves, lang)
        .await
        .map_err(|e| AppError::BadRequest(format!("Analysis error: {e}")))?;

    Ok(Json(result))
}
