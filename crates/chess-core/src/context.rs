//! Static facts about a position: material, castling rights, game phase.

use std::collections::BTreeMap;

use serde::Serialize;
use shakmaty::{Board, CastlingSide, Chess, Color, Position, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Opening,
    Middlegame,
    Endgame,
}

impl Phase {
    pub fn from_piece_count(pieces: usize) -> Self {
        if pieces > 24 {
            Phase::Opening
        } else if pieces > 12 {
            Phase::Middlegame
        } else {
            Phase::Endgame
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Opening => "opening",
            Phase::Middlegame => "middlegame",
            Phase::Endgame => "endgame",
        }
    }

    /// Brazilian Portuguese name.
    pub fn as_str_pt(self) -> &'static str {
        match self {
            Phase::Opening => "abertura",
            Phase::Middlegame => "meio-jogo",
            Phase::Endgame => "final",
        }
    }
}

/// Piece counts per side keyed by plural piece name; absent pieces are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PieceCounts {
    pub white: BTreeMap<&'static str, u32>,
    pub black: BTreeMap<&'static str, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialBalance {
    pub white: i32,
    pub black: i32,
    /// White minus black, in pawns.
    pub balance: i32,
    pub piece_counts: PieceCounts,
}

fn role_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "pawns",
        Role::Knight => "knights",
        Role::Bishop => "bishops",
        Role::Rook => "rooks",
        Role::Queen => "queens",
        Role::King => "kings",
    }
}

impl MaterialBalance {
    pub fn of(board: &Board) -> Self {
        let mut white = 0;
        let mut black = 0;
        let mut piece_counts = PieceCounts::default();

        for color in Color::ALL {
            for role in Role::ALL {
                let count = (board.by_color(color) & board.by_role(role)).count() as u32;
                if count == 0 {
                    continue;
                }
                let value = role_value(role) * count as i32;
                match color {
                    Color::White => {
                        white += value;
                        piece_counts.white.insert(role_name(role), count);
                    }
                    Color::Black => {
                        black += value;
                        piece_counts.black.insert(role_name(role), count);
                    }
                }
            }
        }

        Self {
            white,
            black,
            balance: white - black,
            piece_counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionContext {
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub can_castle_kingside_white: bool,
    pub can_castle_queenside_white: bool,
    pub can_castle_kingside_black: bool,
    pub can_castle_queenside_black: bool,
    pub material_balance: MaterialBalance,
    pub move_number: u32,
    pub legal_moves_count: usize,
    pub phase: Phase,
}

impl PositionContext {
    pub fn from_position(pos: &Chess) -> Self {
        let castles = pos.castles();
        Self {
            is_check: pos.is_check(),
            is_checkmate: pos.is_checkmate(),
            is_stalemate: pos.is_stalemate(),
            can_castle_kingside_white: castles.has(Color::White, CastlingSide::KingSide),
            can_castle_queenside_white: castles.has(Color::White, CastlingSide::QueenSide),
            can_castle_kingside_black: castles.has(Color::Black, CastlingSide::KingSide),
            can_castle_queenside_black: castles.has(Color::Black, CastlingSide::QueenSide),
            material_balance: MaterialBalance::of(pos.board()),
            move_number: pos.fullmoves().get(),
            legal_moves_count: pos.legal_moves().len(),
            phase: Phase::from_piece_count(pos.board().occupied().count()),
        }
    }

    pub fn white_can_castle(&self) -> bool {
        self.can_castle_kingside_white || self.can_castle_queenside_white
    }

    pub fn black_can_castle(&self) -> bool {
        self.can_castle_kingside_black || self.can_castle_queenside_black
    }
}
