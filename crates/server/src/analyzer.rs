//! Position analysis: FEN validation, engine search, move formatting and
//! explanation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chess_core::fen::{parse_position, FenError};
use chess_core::pv::pv_to_san;
use chess_core::PositionContext;
use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::{Chess, Color, EnPassantMode, Position};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::clients::openai::OpenAiClient;
use crate::config::Config;
use crate::explain::{ExplainInput, Explainer, Lang};
use crate::settings::EngineSettings;
use crate::stockfish::{locate_engine, EngineError, PvLine, StockfishEngine};

/// Longest line kept from the engine, in plies.
const MAX_PV_LEN: usize = 10;
/// Plies shown in the short `line` string.
const SHORT_LINE_LEN: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveCandidate {
    pub rank: usize,
    #[serde(rename = "move")]
    pub move_uci: String,
    pub move_san: String,
    /// Display score from the side to move's perspective.
    pub score: String,
    pub score_value: i32,
    /// `score_value` from White's perspective.
    pub raw_score_value: i32,
    pub line: String,
    pub full_line: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub fen: String,
    pub turn: &'static str,
    pub position_context: PositionContext,
    pub best_moves: Vec<MoveCandidate>,
    pub explanation: String,
    pub analysis_depth: u32,
}

pub struct ChessAnalyzer {
    engine_path: Option<PathBuf>,
    settings: EngineSettings,
    engine_timeout: Duration,
    engine: Mutex<Option<StockfishEngine>>,
    explainer: Explainer,
}

impl ChessAnalyzer {
    pub fn new(config: &Config, settings: EngineSettings, llm: Option<Arc<OpenAiClient>>) -> Self {
        let engine_path = locate_engine(config.stockfish_path.as_deref());
        match &engine_path {
            Some(path) => info!(path = %path.display(), "Using Stockfish"),
            None => warn!("Stockfish not found - analysis requests will fail"),
        }

        Self {
            engine_path,
            settings,
            engine_timeout: Duration::from_secs(config.engine_timeout_secs),
            engine: Mutex::new(None),
            explainer: Explainer::new(llm),
        }
    }

    /// Whether an engine binary was found. Does not start the engine.
    pub fn engine_available(&self) -> bool {
        self.engine_path.is_some()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Analyse `fen` and return at most `num_moves` candidate moves, best first.
    ///
    /// `depth` defaults to the configured default and is capped at the
    /// configured maximum.
    pub async fn analyze(
        &self,
        fen: &str,
        depth: Option<u32>,
        num_moves: usize,
        lang: Lang,
    ) -> Result<AnalysisResult, AnalysisError> {
        let pos = parse_position(fen)?;
        let depth = self.settings.resolve_depth(depth);
        let full_fen = Fen::from_position(&pos, EnPassantMode::Legal).to_string();

        // Nothing to search once the game is over
        let lines = if pos.legal_moves().is_empty() || num_moves == 0 {
            Vec::new()
        } else {
            self.run_engine(&full_fen, depth, num_moves).await?
        };

        let best_moves = build_candidates(&pos, lines);
        let context = PositionContext::from_position(&pos);
        let white_to_move = pos.turn() == Color::White;

        let explanation = self
            .explainer
            .explain(&ExplainInput {
                fen: &full_fen,
                white_to_move,
                moves: &best_moves,
                context: &context,
                lang,
            })
            .await;

        Ok(AnalysisResult {
            fen: fen.to_string(),
            turn: if white_to_move { "white" } else { "black" },
            position_context: context,
            best_moves,
            explanation,
            analysis_depth: depth,
        })
    }

    /// Run one search on the shared engine, starting it on first use.
    ///
    /// Startup and search share one timeout. An engine that errors or times
    /// out is discarded so the next request starts a fresh process.
    async fn run_engine(
        &self,
        fen: &str,
        depth: u32,
        multipv: usize,
    ) -> Result<Vec<PvLine>, EngineError> {
        let mut slot = self.engine.lock().await;

        let outcome = tokio::time::timeout(
            self.engine_timeout,
            self.search(&mut slot, fen, depth, multipv),
        )
        .await;

        match outcome {
            Ok(Ok(lines)) => Ok(lines),
            Ok(Err(e)) => {
                warn!("Stockfish failed, discarding process: {e}");
                *slot = None;
                Err(e)
            }
            Err(_) => {
                warn!(fen, depth, "Stockfish timed out, discarding process");
                *slot = None;
                Err(EngineError::Timeout(self.engine_timeout.as_secs()))
            }
        }
    }

    async fn search(
        &self,
        slot: &mut Option<StockfishEngine>,
        fen: &str,
        depth: u32,
        multipv: usize,
    ) -> Result<Vec<PvLine>, EngineError> {
        let engine = match slot.take() {
            Some(engine) => engine,
            None => {
                let path = self.engine_path.as_deref().ok_or(EngineError::NotFound)?;
                let engine = StockfishEngine::new(path, &self.settings).await?;
                info!(
                    hash = self.settings.hash,
                    threads = self.settings.threads,
                    memory_mb = self.settings.memory_mb,
                    "Stockfish started"
                );
                engine
            }
        };

        slot.insert(engine).analyse(fen, depth, multipv).await
    }

    /// Stop the engine process if one is running.
    pub async fn shutdown(&self) {
        if let Some(mut engine) = self.engine.lock().await.take() {
            engine.quit().await;
        }
    }
}

/// Turn raw engine lines into ranked candidates. Lines without a PV are
/// skipped but keep their rank slot.
fn build_candidates(pos: &Chess, lines: Vec<PvLine>) -> Vec<MoveCandidate> {
    let white_to_move = pos.turn() == Color::White;

    lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let move_uci = line.pv.first()?.clone();
            let pv: Vec<String> = line.pv.into_iter().take(MAX_PV_LEN).collect();
            let full_line = pv_to_san(pos, &pv);

            let (score, score_value, raw_score_value) = match line.score {
                Some(s) => {
                    let white_pov = if white_to_move { s } else { s.flip() };
                    (s.display(), s.value(), white_pov.value())
                }
                None => ("N/A".to_string(), 0, 0),
            };

            Some(MoveCandidate {
                rank: i + 1,
                move_san: full_line.first().cloned().unwrap_or_else(|| move_uci.clone()),
                move_uci,
                score,
                score_value,
                raw_score_value,
                line: full_line
                    .iter()
                    .take(SHORT_LINE_LEN)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" "),
                full_line,
            })
        })
        .collect()
}
