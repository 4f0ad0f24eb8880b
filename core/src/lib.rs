use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use assets::*;
pub use card::*;
pub use clock::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use layout::*;
pub use score::*;
pub use session::*;
pub use sound::*;
pub use types::*;

mod assets;
mod card;
mod clock;
mod deck;
mod engine;
mod error;
mod layout;
mod score;
mod session;
mod sound;
mod types;

/// Grid shape of a board, always with an even, non-zero number of cards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
}

impl GameConfig {
    pub fn new(rows: Coord, cols: Coord) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        if mult(rows, cols) % 2 != 0 {
            return Err(GameError::OddCardCount { rows, cols });
        }
        Ok(Self { size: (rows, cols) })
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn total_pairs(&self) -> CellCount {
        self.total_cells() / 2
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { size: (6, 7) }
    }
}

/// Timing and hint knobs of a board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    pub hint_budget: u8,
    pub hint_duration: Duration,
    pub mismatch_delay: Duration,
}

impl Rules {
    pub const DEFAULT_HINT_BUDGET: u8 = 3;
    pub const DEFAULT_HINT_DURATION: Duration = Duration::from_secs(2);
    pub const DEFAULT_MISMATCH_DELAY: Duration = Duration::from_millis(700);
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            hint_budget: Self::DEFAULT_HINT_BUDGET,
            hint_duration: Self::DEFAULT_HINT_DURATION,
            mismatch_delay: Self::DEFAULT_MISMATCH_DELAY,
        }
    }
}

/// Outcome of clicking a card
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected,
    Matched,
    Mismatched,
    Won,
}

impl ClickOutcome {
    /// Whether the click counts as a move
    pub const fn is_move(self) -> bool {
        use ClickOutcome::*;
        match self {
            Ignored => false,
            Selected => true,
            Matched => true,
            Mismatched => true,
            Won => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HintOutcome {
    NoChange,
    Revealed,
}

impl HintOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Revealed => true,
        }
    }
}

/// Outcome of checking the pending timer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerOutcome {
    NoChange,
    MismatchHidden,
    HintExpired,
}

impl TimerOutcome {
    pub const fn has_update(self) -> bool {
        use TimerOutcome::*;
        match self {
            NoChange => false,
            MismatchHidden => true,
            HintExpired => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_counts_pairs() {
        let config = GameConfig::new(6, 7).unwrap();

        assert_eq!(config.total_cells(), 42);
        assert_eq!(config.total_pairs(), 21);
    }

    #[test]
    fn config_rejects_odd_total() {
        assert_eq!(
            GameConfig::new(3, 3),
            Err(GameError::OddCardCount { rows: 3, cols: 3 })
        );
        assert!(GameConfig::new(3, 4).is_ok());
    }

    #[test]
    fn config_rejects_empty() {
        assert_eq!(GameConfig::new(0, 4), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new(4, 0), Err(GameError::EmptyBoard));
    }

    #[test]
    fn only_ignored_click_is_not_a_move() {
        use ClickOutcome::*;

        assert!(!Ignored.is_move());
        for outcome in [Selected, Matched, Mismatched, Won] {
            assert!(outcome.is_move());
        }
    }
}
