use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{non_empty, parse_body, resolve_num_moves};
use crate::analyzer::{AnalysisResult, ChessAnalyzer};
use crate::clients::openai::OpenAiClient;
use crate::correction::apply_fen_correction;
use crate::error::AppError;
use crate::explain::Lang;

#[derive(Debug, Deserialize)]
pub struct CorrectionRequest {
    pub original_fen: Option<String>,
    pub correction: Option<String>,
    pub depth: Option<u32>,
    pub num_moves: Option<usize>,
    pub lang: Option<String>,
}

/// POST /api/correct-position
/// Apply a plain-English fix to a recognized position, then analyse the result.
pub async fn correct_position(
    Extension(analyzer): Extension<Arc<ChessAnalyzer>>,
    Extension(llm): Extension<Option<Arc<OpenAiClient>>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let req: CorrectionRequest = parse_body(payload)?;

    let (Some(original_fen), Some(correction)) = (non_empty(req.original_fen), non_empty(req.correction))
    else {
        return Err(AppError::BadRequest(
            "Both original_fen and correction are required".into(),
        ));
    };
    let num_moves = resolve_num_moves(req.num_moves)?;

    let corrected = apply_fen_correction(llm.as_deref(), &original_fen, &correction)
        .await
        .ok_or_else(|| {
            AppError::BadRequest(
                "Could not apply the correction. Please try editing the FEN directly.".into(),
            )
        })?;
    tracing::info!(from = %original_fen, to = %corrected, "Applied correction");

    let result = analyzer
        .analyze(&corrected, req.depth, num_moves, Lang::from_code(req.lang.as_deref()))
        .await
        .map_err(|e| AppError::BadRequest(format!("Correction error: {e}")))?;

    Ok(Json(result))
}
