pub mod analyze;
pub mod correct;
pub mod fen;
pub mod health;
pub mod recognize;
pub mod settings;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::AppError;

pub const DEFAULT_NUM_MOVES: usize = 3;
pub const MAX_NUM_MOVES: usize = 20;

/// Deserialize a JSON body. A missing body, `null` or `{}` counts as no data.
pub(crate) fn parse_body<T: DeserializeOwned>(
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<T, AppError> {
    let value = match payload {
        Ok(Json(value)) => value,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(AppError::BadRequest(rejection.body_text()));
        }
        Err(_) => return Err(AppError::BadRequest("No data provided".into())),
    };

    let empty = value.is_null() || value.as_object().is_some_and(|o| o.is_empty());
    if empty {
        return Err(AppError::BadRequest("No data provided".into()));
    }

    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("Invalid request: {e}")))
}

/// Treat empty and whitespace-only strings as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Requested number of moves, defaulting to 3 and capped at `MAX_NUM_MOVES`.
pub(crate) fn resolve_num_moves(requested: Option<usize>) -> Result<usize, AppError> {
    match requested {
        None => Ok(DEFAULT_NUM_MOVES),
        Some(0) => Err(AppError::BadRequest("num_moves must be at least 1".into())),
        Some(n) => Ok(n.min(MAX_NUM_MOVES)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        fen: Option<String>,
    }

    #[test]
    fn test_empty_object_is_no_data() {
        let err = parse_body::<Probe>(Ok(Json(json!({})))).unwrap_err();
        assert_eq!(err.to_string(), "No data provided");
    }

    #[test]
    fn test_wrong_field_type() {
        let err = parse_body::<Probe>(Ok(Json(json!({ "fen": 5 })))).unwrap_err();
        assert!(err.to_string().starts_with("Invalid request: "));
    }

    #[test]
    fn test_parses_fields() {
        let probe: Probe = parse_body(Ok(Json(json!({ "fen": "8/8/8/8/8/8/8/8" })))).unwrap();
        assert_eq!(probe.fen.as_deref(), Some("8/8/8/8/8/8/8/8"));
    }

    #[test]
    fn test_num_moves_bounds() {
        assert_eq!(resolve_num_moves(None).unwrap(), 3);
        assert_eq!(resolve_num_moves(Some(1)).unwrap(), 1);
        assert_eq!(resolve_num_moves(Some(500)).unwrap(), MAX_NUM_MOVES);
        assert!(resolve_num_moves(Some(0)).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" e4 ".into())).as_deref(), Some("e4"));
        assert_eq!(non_empty(None), None);
    }
}
