pub mod context;
pub mod correction;
pub mod fen;
pub mod pv;
pub mod score;

pub use context::{MaterialBalance, Phase, PositionContext};
pub use fen::{parse_position, FenError};
pub use score::Score;
