use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use chess_core::fen::{has_piece_placement, side_to_move};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{non_empty, parse_body};
use crate::error::AppError;
use crate::vision::{decode_image, ImageRecognizer, VisionError};

#[derive(Debug, Deserialize)]
pub struct RecognizeRequest {
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecognizeResponse {
    pub success: bool,
    pub fen: String,
    pub turn: &'static str,
}

/// POST /api/recognize
/// Recognize a screenshot without analysing it, so the user can review the FEN.
pub async fn recognize_position(
    Extension(recognizer): Extension<Arc<ImageRecognizer>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<RecognizeResponse>, AppError> {
    let req: RecognizeRequest = parse_body(payload)?;
    let image = non_empty(req.image).ok_or_else(|| AppError::BadRequest("No image provided".into()))?;

    let fen = recognize_image(&recognizer, &image).await?.ok_or_else(|| {
        AppError::BadRequest(
            "Could not recognize chess position from image. Try using Manual Entry instead.".into(),
        )
    })?;

    if !has_piece_placement(&fen) {
        return Err(AppError::BadRequest(
            "Recognition produced invalid format. Try using Manual Entry instead.".into(),
        ));
    }

    tracing::info!(%fen, "Recognized position");
    Ok(Json(RecognizeResponse {
        success: true,
        turn: side_to_move(&fen),
        fen,
    }))
}

/// Decode a base64 screenshot and run it through the recognizer.
pub(crate) async fn recognize_image(
    recognizer: &ImageRecognizer,
    image: &str,
) -> Result<Option<String>, AppError> {
    let bytes = decode_image(image).map_err(image_error)?;
    recognizer.recognize(&bytes).await.map_err(image_error)
}

fn image_error(e: VisionError) -> AppError {
    AppError::BadRequest(format!("Image processing error: {e}"))
}
