//! Engine scores as reported over UCI.

/// Centipawn value used for forced mates.
pub const MATE_SCORE: i32 = 10_000;

/// A score from the perspective of one side, normally the side to move.
///
/// `Mate(0)` means that side has already been mated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Cp(i32),
    Mate(i32),
}

impl Score {
    /// Centipawns, with mate in `n` mapped to `10000 - n` and being mated
    /// in `n` to `-(10000 - n)`.
    pub fn value(self) -> i32 {
        match self {
            Score::Cp(cp) => cp,
            Score::Mate(n) if n > 0 => MATE_SCORE - n,
            Score::Mate(n) => -MATE_SCORE - n,
        }
    }

    /// Same score from the opponent's point of view.
    pub fn flip(self) -> Self {
        match self {
            Score::Cp(cp) => Score::Cp(-cp),
            Score::Mate(n) => Score::Mate(-n),
        }
    }

    /// `"+0.35"`, `"-1.20"`, `"Mate in 3"` or `"Mated in 2"`.
    pub fn display(self) -> String {
        match self {
            Score::Mate(n) if n > 0 => format!("Mate in {n}"),
            Score::Mate(n) => format!("Mated in {}", n.abs()),
            Score::Cp(cp) => format!("{:+.2}", cp as f64 / 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centipawn_display() {
        assert_eq!(Score::Cp(35).display(), "+0.35");
        assert_eq!(Score::Cp(-120).display(), "-1.20");
        assert_eq!(Score::Cp(0).display(), "+0.00");
    }

    #[test]
    fn test_mate_display() {
        assert_eq!(Score::Mate(3).display(), "Mate in 3");
        assert_eq!(Score::Mate(-2).display(), "Mated in 2");
    }

    #[test]
    fn test_mate_values() {
        assert_eq!(Score::Mate(3).value(), 9997);
        assert_eq!(Score::Mate(-2).value(), -9998);
        assert_eq!(Score::Mate(0).value(), -MATE_SCORE);
    }

    #[test]
    fn test_flip() {
        assert_eq!(Score::Cp(40).flip(), Score::Cp(-40));
        assert_eq!(Score::Mate(2).flip().display(), "Mated in 2");
        assert_eq!(Score::Mate(-4).flip().value(), 9996);
    }
}
