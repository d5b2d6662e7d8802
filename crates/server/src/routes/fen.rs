use axum::extract::rejection::JsonRejection;
use axum::Json;
use chess_core::fen::{parse_position, VALID_FEN_MESSAGE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ValidateFenRequest {
    pub fen: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateFenResponse {
    pub valid: bool,
    pub message: String,
}

/// POST /api/validate-fen
pub async fn validate_fen(
    payload: Result<Json<ValidateFenRequest>, JsonRejection>,
) -> Json<ValidateFenResponse> {
    let fen = payload.ok().and_then(|Json(req)| req.fen).unwrap_or_default();

    let response = match parse_position(&fen) {
        Ok(_) => ValidateFenResponse {
            valid: true,
            message: VALID_FEN_MESSAGE.to_string(),
        },
        Err(e) => ValidateFenResponse {
            valid: false,
            message: e.to_string(),
        },
    };
    Json(response)
}
