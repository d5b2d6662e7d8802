//! Applying a plain-English correction to a recognized position.

use chess_core::correction::apply_simple_correction;
use chess_core::fen::is_valid_fen;

use crate::clients::openai::{ChatMessage, OpenAiClient};

const MAX_TOKENS: u32 = 200;

const SYSTEM: &str =
    "You correct FEN chess positions based on user instructions. Return only the corrected FEN string.";

fn correction_prompt(original_fen: &str, correction: &str) -> String {
    format!(
        "You are a chess FEN correction assistant.

Given this FEN position:
{original_fen}

The user says this correction is needed:
\"{correction}\"

Apply the correction to the FEN and return ONLY the corrected FEN string.

Rules:
- Only change what the user specified
- Keep all other pieces in their original positions
- Maintain valid FEN format
- The FEN has 6 fields separated by spaces: position, turn, castling, en-passant, halfmove, fullmove

Square notation reminder:
- Files: a=1st column (left), h=8th column (right)
- Ranks: 1=bottom (white's back rank), 8=top (black's back rank)
- So h8 is top-right corner, a1 is bottom-left corner

Return ONLY the corrected FEN string, nothing else."
    )
}

/// Corrected FEN for `original_fen`, or `None` if the correction could not
/// be applied.
///
/// The model's answer is only accepted when it is a valid position. If the
/// model cannot be reached, or none is configured, the rule-based parser is
/// used instead.
pub async fn apply_fen_correction(
    llm: Option<&OpenAiClient>,
    original_fen: &str,
    correction: &str,
) -> Option<String> {
    let Some(llm) = llm else {
        return apply_simple_correction(original_fen, correction);
    };

    let messages = [
        ChatMessage::system(SYSTEM),
        ChatMessage::user(correction_prompt(original_fen, correction)),
    ];
    match llm.chat(&messages, MAX_TOKENS, 0.0).await {
        Ok(reply) => {
            let candidate = reply.replace('`', "").trim().to_string();
            is_valid_fen(&candidate).then_some(candidate)
        }
        Err(e) => {
            tracing::warn!("OpenAI correction error: {e}");
            apply_simple_correction(original_fen, correction)
        }
    }
}
