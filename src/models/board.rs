use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a board size outside the allowed set is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid board size {0}: must be one of 5, 7 or 9")]
pub struct InvalidBoardSize(pub i32);

/// Side length of a bingo board.
///
/// Only odd sizes are allowed so every board has a single well-defined
/// center cell (the free cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum BoardSize {
    Five,
    Seven,
    Nine,
}

impl BoardSize {
    pub const ALL: [Self; 3] = [Self::Five, Self::Seven, Self::Nine];

    /// Number of cells along one edge.
    #[must_use]
    pub const fn side(self) -> i32 {
        match self {
            Self::Five => 5,
            Self::Seven => 7,
            Self::Nine => 9,
        }
    }

    /// Row (and column) index of the free center cell.
    #[must_use]
    pub const fn center(self) -> i32 {
        self.side() / 2
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(self) -> i32 {
        self.side() * self.side()
    }

    #[must_use]
    pub const fn is_center(self, row: i32, col: i32) -> bool {
        row == self.center() && col == self.center()
    }

    #[must_use]
    pub const fn contains(self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.side() && col >= 0 && col < self.side()
    }
}

impl TryFrom<i32> for BoardSize {
    type Error = InvalidBoardSize;

    fn try_from(value: i32) -> Result<Self, InvalidBoardSize> {
        match value {
            5 => Ok(Self::Five),
            7 => Ok(Self::Seven),
            9 => Ok(Self::Nine),
            other => Err(InvalidBoardSize(other)),
        }
    }
}

impl From<BoardSize> for i32 {
    fn from(size: BoardSize) -> Self {
        size.side()
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}
