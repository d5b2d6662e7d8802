//! Stockfish engine wrapper using UCI protocol (async I/O)

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use chess_core::Score;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::settings::EngineSettings;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(
        "Stockfish not found. Install it (brew install stockfish / apt install stockfish) \
         or set the STOCKFISH_PATH environment variable"
    )]
    NotFound,

    #[error("Failed to spawn Stockfish: {0}")]
    Spawn(String),

    #[error("Stockfish I/O error: {0}")]
    Io(String),

    #[error("Stockfish exited unexpectedly")]
    Exited,

    #[error("Stockfish did not finish within {0} seconds")]
    Timeout(u64),
}

/// A single PV line from multi-PV analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PvLine {
    /// Principal variation in UCI notation
    pub pv: Vec<String>,
    /// Score from the side to move's perspective
    pub score: Option<Score>,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process, initialize UCI and apply hash/thread settings
    pub async fn new(path: &Path, settings: &EngineSettings) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| EngineError::Spawn("stdout not captured".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine
            .send(&format!("setoption name Hash value {}", settings.hash))
            .await?;
        engine
            .send(&format!("setoption name Threads value {}", settings.threads))
            .await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| EngineError::Io(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| EngineError::Io(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| EngineError::Io(format!("Failed to read from Stockfish: {e}")))?;
        if read == 0 {
            return Err(EngineError::Exited);
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "SF >");
        Ok(trimmed)
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), EngineError> {
        while self.read_line().await? != expected {}
        Ok(())
    }

    /// Search `fen` to `depth` plies and return up to `multipv` lines, best first.
    ///
    /// Slots the engine never reported stay empty; lines past `multipv` are dropped.
    pub async fn analyse(
        &mut self,
        fen: &str,
        depth: u32,
        multipv: usize,
    ) -> Result<Vec<PvLine>, EngineError> {
        self.send(&format!("setoption name MultiPV value {multipv}")).await?;
        self.send("isready").await?;
        self.wait_for("readyok").await?;
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        let mut lines = vec![PvLine::default(); multipv];
        loop {
            let line = self.read_line().await?;

            if line.starts_with("info") && line.contains(" pv ") {
                let pv_idx = parse_field::<usize>(&line, "multipv").unwrap_or(1);
                if let Some(entry) = pv_idx.checked_sub(1).and_then(|i| lines.get_mut(i)) {
                    entry.pv = parse_pv(&line);
                    if let Some(score) = parse_score(&line) {
                        entry.score = Some(score);
                    }
                }
            } else if line.starts_with("bestmove") {
                break;
            }
        }

        Ok(lines)
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Find the engine binary: the configured path first, then common install
/// locations, then `PATH`.
pub fn locate_engine(configured: Option<&str>) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = configured {
        candidates.push(PathBuf::from(path));
    }
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        candidates.push(exe_dir.join("bin").join("stockfish"));
    }
    if let Some(home) = env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join("bin").join("stockfish"));
    }
    candidates.extend(
        [
            "./bin/stockfish",
            "/usr/local/bin/stockfish",
            "/usr/bin/stockfish",
            "/usr/games/stockfish",
            "/opt/homebrew/bin/stockfish",
            "./engines/stockfish",
        ]
        .map(PathBuf::from),
    );

    candidates
        .into_iter()
        .find(|p| p.is_file())
        .or_else(|| search_path(configured.unwrap_or("stockfish")))
        .or_else(|| search_path("stockfish"))
}

fn search_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|p| p.is_file())
}

/// Parse the value following `key` in an info line
fn parse_field<T: std::str::FromStr>(line: &str, key: &str) -> Option<T> {
    let mut parts = line.split_whitespace();
    parts.by_ref().find(|part| *part == key)?;
    parts.next()?.parse().ok()
}

/// Parse `score cp N` / `score mate N` from an info line
fn parse_score(line: &str) -> Option<Score> {
    let mut parts = line.split_whitespace();
    parts.by_ref().find(|part| *part == "score")?;
    let kind = parts.next()?;
    let value: i32 = parts.next()?.parse().ok()?;
    match kind {
        "cp" => Some(Score::Cp(value)),
        "mate" => Some(Score::Mate(value)),
        _ => None,
    }
}

/// Parse PV moves from info line
fn parse_pv(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut in_pv = false;
    let mut moves = Vec::new();

    for part in parts {
        if part == "pv" {
            in_pv = true;
            continue;
        }
        if in_pv {
            // PV ends at next keyword or end of line
            if part.starts_with("bmc") || part == "string" {
                break;
            }
            moves.push(part.to_string());
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cp() {
        let line = "info depth 20 seldepth 25 multipv 1 score cp 35 nodes 100000 pv e2e4";
        assert_eq!(parse_score(line), Some(Score::Cp(35)));
    }

    #[test]
    fn test_parse_mate() {
        let line = "info depth 20 score mate -3 nodes 100000 pv e2e4";
        assert_eq!(parse_score(line), Some(Score::Mate(-3)));
    }

    #[test]
    fn test_parse_bounded_score() {
        let line = "info depth 12 multipv 2 score cp 18 lowerbound nodes 5000 pv d2d4";
        assert_eq!(parse_score(line), Some(Score::Cp(18)));
        assert_eq!(parse_field::<usize>(line, "multipv"), Some(2));
    }

    #[test]
    fn test_parse_depth_and_multipv() {
        let line = "info depth 18 seldepth 22 multipv 3 score cp -12 pv g1f3";
        assert_eq!(parse_field::<u32>(line, "depth"), Some(18));
        assert_eq!(parse_field::<usize>(line, "multipv"), Some(3));
        assert_eq!(parse_field::<u32>(line, "nodes"), None);
    }

    #[test]
    fn test_parse_pv() {
        let line = "info depth 20 score cp 35 pv e2e4 e7e5 g1f3";
        let pv = parse_pv(line);
        assert_eq!(pv, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn test_locate_configured_missing_falls_through() {
        let found = locate_engine(Some("/definitely/not/here/stockfish"));
        assert_ne!(found, Some(PathBuf::from("/definitely/not/here/stockfish")));
    }
}
