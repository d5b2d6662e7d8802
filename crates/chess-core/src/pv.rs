use shakmaty::{san::SanPlus, uci::UciMove, Chess};

/// Replay a UCI principal variation from `pos`, returning SAN (with check
/// suffixes). Stops at the first move that does not parse or is illegal.
pub fn pv_to_san(pos: &Chess, pv: &[String]) -> Vec<String> {
    let mut pos = pos.clone();
    let mut san_moves = Vec::with_capacity(pv.len());

    for uci_str in pv {
        let Ok(uci_move) = uci_str.parse::<UciMove>() else {
            break;
        };
        let Ok(legal_move) = uci_move.to_move(&pos) else {
            break;
        };
        san_moves.push(SanPlus::from_move_and_play_unchecked(&mut pos, legal_move).to_string());
    }

    san_moves
}
