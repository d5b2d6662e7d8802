//! Prose explanations of an analysed position.
//!
//! A configured language model writes the explanation; otherwise (or when
//! the model call fails) a fixed template is filled in from the engine lines.

mod template;

use std::sync::Arc;

use chess_core::PositionContext;

use crate::analyzer::MoveCandidate;
use crate::clients::openai::{ChatMessage, OpenAiClient};

pub use template::template_explanation;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_EN: &str = "You are an expert chess coach providing position analysis. Be concise but thorough. \
Focus on explaining the key ideas behind the moves rather than just listing variations.";

const SYSTEM_PT: &str = "Você é um treinador de xadrez experiente fornecendo análise de posições. \
Seja conciso mas completo. Foque em explicar as ideias principais por trás dos lances, não apenas \
listar variantes. IMPORTANTE: Responda SEMPRE em Português do Brasil.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Pt,
}

impl Lang {
    /// `"pt"` selects Portuguese; anything else is English.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(c) if c.eq_ignore_ascii_case("pt") => Lang::Pt,
            _ => Lang::En,
        }
    }

    pub(crate) fn side(self, white: bool) -> &'static str {
        match (self, white) {
            (Lang::En, true) => "White",
            (Lang::En, false) => "Black",
            (Lang::Pt, true) => "Brancas",
            (Lang::Pt, false) => "Pretas",
        }
    }
}

/// Everything an explanation is written from.
pub struct ExplainInput<'a> {
    pub fen: &'a str,
    pub white_to_move: bool,
    pub moves: &'a [MoveCandidate],
    pub context: &'a PositionContext,
    pub lang: Lang,
}

pub struct Explainer {
    llm: Option<Arc<OpenAiClient>>,
}

impl Explainer {
    pub fn new(llm: Option<Arc<OpenAiClient>>) -> Self {
        Self { llm }
    }

    pub async fn explain(&self, input: &ExplainInput<'_>) -> String {
        match &self.llm {
            Some(llm) if !input.moves.is_empty() => self.llm_explanation(llm, input).await,
            _ => template_explanation(input),
        }
    }

    async fn llm_explanation(&self, llm: &OpenAiClient, input: &ExplainInput<'_>) -> String {
        let system = match input.lang {
            Lang::En => SYSTEM_EN,
            Lang::Pt => SYSTEM_PT,
        };
        let messages = [ChatMessage::system(system), ChatMessage::user(llm_prompt(input))];

        match llm.chat(&messages, MAX_TOKENS, TEMPERATURE).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("LLM explanation failed, using template: {e}");
                let note = match input.lang {
                    Lang::En => "(Note: AI explanation unavailable)",
                    Lang::Pt => "(Nota: explicação da IA indisponível)",
                };
                format!("{}\n\n{note}: {e}", template_explanation(input))
            }
        }
    }
}

fn llm_prompt(input: &ExplainInput<'_>) -> String {
    let turn = input.lang.side(input.white_to_move);

    let moves_text: String = input
        .moves
        .iter()
        .take(3)
        .map(|m| format!("\n- {} (eval: {}): {}", m.move_san, m.score, m.line))
        .collect();

    let balance = input.context.material_balance.balance;
    let material = if balance > 0 {
        format!("White is up by {balance} pawns worth of material")
    } else if balance < 0 {
        format!("Black is up by {} pawns worth of material", balance.abs())
    } else {
        "Material is equal".to_string()
    };

    let check = match (input.context.is_check, input.white_to_move) {
        (true, true) => "White is in check!",
        (true, false) => "Black is in check!",
        (false, _) => "",
    };

    format!(
        "Analyze this chess position and explain the best moves in a clear, instructive way.

Position (FEN): {fen}
Turn: {turn} to move
Game phase: {phase}
Material: {material}
{check}

Top engine moves:{moves_text}

Please provide:
1. A brief assessment of the position (who stands better and why)
2. An explanation of why the top move is best
3. What the main strategic or tactical ideas are
4. What to avoid and why

Keep the explanation clear and accessible, suitable for intermediate players. Use chess notation where helpful.",
        fen = input.fen,
        phase = input.context.phase.as_str(),
    )
}
