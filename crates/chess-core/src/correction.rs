//! Rule-based position correction for short plain-English fixes such as
//! "the black king is on h8 not g8".

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::{fen::Fen, Color, Piece, Role, Square};

use crate::fen::parse_fen;

static SQUARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([a-h][1-8])\b").unwrap());

const PIECE_NAMES: [(&str, Role); 6] = [
    ("king", Role::King),
    ("queen", Role::Queen),
    ("rook", Role::Rook),
    ("bishop", Role::Bishop),
    ("knight", Role::Knight),
    ("pawn", Role::Pawn),
];

const COLOR_NAMES: [(&str, Color); 2] = [("white", Color::White), ("black", Color::Black)];

/// Move one piece according to `correction` and return the resulting FEN.
///
/// The first square mentioned is where the piece belongs. With "not", the
/// second square is where it wrongly stands; otherwise the piece is taken
/// from wherever that piece currently is. Returns `None` when the text does
/// not resolve to a piece, a colour and both squares.
pub fn apply_simple_correction(original_fen: &str, correction: &str) -> Option<String> {
    let mut setup = parse_fen(original_fen).ok()?.into_setup();
    let text = correction.to_lowercase();
    let negated = text.contains("not");

    let squares: Vec<Square> = SQUARE
        .captures_iter(&text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    let target = *squares.first()?;

    for (name, role) in PIECE_NAMES {
        if !text.contains(name) {
            continue;
        }

        let mut color = COLOR_NAMES
            .iter()
            .find(|(color_name, _)| text.contains(color_name))
            .map(|&(_, c)| c);

        let mut inferred_from = None;
        if color.is_none() && squares.len() >= 2 {
            let sq = if negated { squares[1] } else { squares[0] };
            if let Some(piece) = setup.board.piece_at(sq) {
                if piece.role == role {
                    color = Some(piece.color);
                }
            }
            inferred_from = Some(sq);
        }

        let Some(color) = color else {
            continue;
        };

        let wrong = if squares.len() >= 2 && negated {
            Some(squares[1])
        } else {
            (setup.board.by_color(color) & setup.board.by_role(role))
                .first()
                .or(inferred_from)
        };
        let wrong = wrong?;

        setup.board.remove_piece_at(wrong);
        setup.board.set_piece_at(target, Piece { color, role });
        return Some(Fen::try_from_setup(setup).unwrap_or_else(|e| e.ignore()).to_string());
    }

    None
}
