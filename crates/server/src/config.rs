use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
    /// Explicit engine binary; the usual install locations are searched when unset.
    pub stockfish_path: Option<String>,
    pub engine_timeout_secs: u64,
    pub static_dir: String,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o".to_string(),
            openai_timeout_secs: 60,
            stockfish_path: None,
            engine_timeout_secs: 120,
            static_dir: "static".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed_var("PORT").unwrap_or(defaults.port),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_base_url: non_empty_var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            openai_model: non_empty_var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_timeout_secs: parsed_var("OPENAI_TIMEOUT_SECS").unwrap_or(defaults.openai_timeout_secs),
            stockfish_path: non_empty_var("STOCKFISH_PATH"),
            engine_timeout_secs: parsed_var("ENGINE_TIMEOUT_SECS").unwrap_or(defaults.engine_timeout_secs),
            static_dir: non_empty_var("STATIC_DIR").unwrap_or(defaults.static_dir),
            max_body_bytes: parsed_var::<usize>("MAX_BODY_MB")
                .and_then(mb_to_bytes)
                .unwrap_or(defaults.max_body_bytes),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `None` when the size does not fit in `usize`.
fn mb_to_bytes(mb: usize) -> Option<usize> {
    mb.checked_mul(1024 * 1024)
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
