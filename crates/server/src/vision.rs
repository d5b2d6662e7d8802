//! Chess position recognition from screenshots via a vision-capable model.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chess_core::fen::{extract_fen, is_well_formed_fen};

use crate::clients::openai::{ChatMessage, OpenAiClient};

const MAX_TOKENS: u32 = 150;
const CANNOT_RECOGNIZE: &str = "CANNOT_RECOGNIZE";

const PROMPT: &str = "Look at this chess board and output the FEN notation.

Rules:
- White pieces: K Q R B N P (uppercase)
- Black pieces: k q r b n p (lowercase)
- Empty squares: use numbers 1-8
- Ranks separated by /
- Start from rank 8 (top) to rank 1 (bottom)

Output ONLY the FEN position string, like:
r4rk1/pp3ppp/2p2n2/4p3/3P4/3B1P2/PPP2P2/2KR3R

If you cannot recognize the position, output: CANNOT_RECOGNIZE";

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Image is empty")]
    Empty,

    #[error(
        "OpenAI API key not configured. \
         Set OPENAI_API_KEY in your .env file to enable image recognition."
    )]
    NotConfigured,
}

/// Decode a base64 image, with or without a `data:<type>;base64,` prefix.
pub fn decode_image(data: &str) -> Result<Vec<u8>, VisionError> {
    let payload = match data.split_once(',') {
        Some((_, rest)) => rest,
        None => data,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(payload)?;
    if bytes.is_empty() {
        return Err(VisionError::Empty);
    }
    Ok(bytes)
}

/// Sniff the media type from magic bytes, defaulting to PNG.
pub fn media_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/png",
    }
}

pub struct ImageRecognizer {
    llm: Option<Arc<OpenAiClient>>,
}

impl ImageRecognizer {
    pub fn new(llm: Option<Arc<OpenAiClient>>) -> Self {
        Self { llm }
    }

    /// Recognize the position in `image`.
    ///
    /// `Ok(None)` means the model could not produce a parseable FEN; transport
    /// failures are logged and reported the same way.
    pub async fn recognize(&self, image: &[u8]) -> Result<Option<String>, VisionError> {
        let llm = self.llm.as_ref().ok_or(VisionError::NotConfigured)?;

        let message = ChatMessage::user_with_image(PROMPT, media_type(image), &STANDARD.encode(image));
        let reply = match llm.chat(&[message], MAX_TOKENS, 0.0).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("OpenAI recognition error: {e}");
                return Ok(None);
            }
        };

        Ok(parse_reply(&reply))
    }
}

fn parse_reply(reply: &str) -> Option<String> {
    if reply.contains(CANNOT_RECOGNIZE) {
        return None;
    }
    extract_fen(reply).filter(|fen| is_well_formed_fen(fen))
}
