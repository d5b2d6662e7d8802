//! FEN validation, plus recovery of FEN strings from free-form text
//! (vision and language model replies rarely come back clean).

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::{fen::Fen, CastlingMode, Chess};

pub const VALID_FEN_MESSAGE: &str = "Valid FEN";

const RANK: &str = "[rnbqkpRNBQKP1-8]+";

static FEN_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)FEN:\s*(.+)").unwrap());

static FULL_FEN: LazyLock<Regex> = LazyLock::new(|| {
    let placement = vec![RANK; 8].join("/");
    Regex::new(&format!(
        r"({placement})\s+([wb])\s+([KQkq-]+)\s+([a-h][36]|-)\s+(\d+)\s+(\d+)"
    ))
    .unwrap()
});

static PLACEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(&vec![RANK; 8].join("/")).unwrap());

static TRAILING_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?].*$").unwrap());
static CASTLING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[KQkq-]+$").unwrap());
static EN_PASSANT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([a-h][36]|-)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("Invalid FEN: {0}")]
    Malformed(String),

    #[error("Invalid board position")]
    IllegalPosition,
}

/// Parse a FEN into a legal standard chess position.
///
/// Trailing fields may be omitted; they default to `w - - 0 1`.
pub fn parse_position(fen: &str) -> Result<Chess, FenError> {
    parse_fen(fen)?
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|_| FenError::IllegalPosition)
}

/// Parse the FEN syntax only, without checking that the position is legal.
pub fn parse_fen(fen: &str) -> Result<Fen, FenError> {
    let normalized = fen.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(FenError::Malformed("empty fen".to_string()));
    }
    Fen::from_ascii(normalized.as_bytes()).map_err(|e| FenError::Malformed(e.to_string()))
}

pub fn is_valid_fen(fen: &str) -> bool {
    parse_position(fen).is_ok()
}

/// Whether `fen` parses, legal or not. A misread board with a missing king
/// still passes so it can be corrected.
pub fn is_well_formed_fen(fen: &str) -> bool {
    parse_fen(fen).is_ok()
}

/// "white" unless the side-to-move field says `b`.
pub fn side_to_move(fen: &str) -> &'static str {
    match fen.split_whitespace().nth(1) {
        Some("b") => "black",
        _ => "white",
    }
}

/// Whether the first field at least looks like a piece placement.
pub fn has_piece_placement(fen: &str) -> bool {
    fen.split_whitespace().next().is_some_and(|p| p.contains('/'))
}

/// Rebuild a six-field FEN around the first token that contains `/`,
/// substituting defaults for missing or malformed fields.
pub fn clean_fen(raw: &str) -> String {
    let stripped = raw.replace('`', "");
    let stripped = TRAILING_TEXT.replace(stripped.trim(), "");
    let stripped = stripped.trim();

    let parts: Vec<&str> = stripped.split_whitespace().collect();
    let Some(idx) = parts.iter().position(|p| p.contains('/')) else {
        return stripped.to_string();
    };

    let mut rest = &parts[idx + 1..];
    let fields = [
        parts[idx],
        next_field(&mut rest, |p| p == "w" || p == "b", "w"),
        next_field(&mut rest, |p| CASTLING.is_match(p), "-"),
        next_field(&mut rest, |p| EN_PASSANT.is_match(p), "-"),
        next_field(&mut rest, is_number, "0"),
        next_field(&mut rest, is_number, "1"),
    ];
    fields.join(" ")
}

fn next_field<'a>(rest: &mut &[&'a str], accept: impl Fn(&str) -> bool, default: &'a str) -> &'a str {
    match rest.first() {
        Some(part) if accept(part) => {
            let part = *part;
            *rest = &rest[1..];
            part
        }
        _ => default,
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Pull a FEN out of a model reply.
///
/// Tries, in order: a `FEN:` prefixed line, a complete six-field FEN, and a
/// bare eight-rank placement (completed with `w - - 0 1`).
pub fn extract_fen(response: &str) -> Option<String> {
    if let Some(caps) = FEN_LINE.captures(response) {
        let cleaned = clean_fen(caps[1].trim());
        if is_well_formed_fen(&cleaned) {
            return Some(cleaned);
        }
    }

    if let Some(m) = FULL_FEN.find(response) {
        return Some(m.as_str().to_string());
    }

    let placement = PLACEMENT.find(response)?.as_str();
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() == 8 && ranks.iter().all(|r| rank_width(r) == 8) {
        return Some(format!("{placement} w - - 0 1"));
    }
    None
}

fn rank_width(rank: &str) -> u32 {
    rank.chars().map(|c| c.to_digit(10).unwrap_or(1)).sum()
}
