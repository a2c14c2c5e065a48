use serde::{Deserialize, Serialize};

/// A user's bingo card.
///
/// `board_size` is a snapshot of the site-wide dimension at creation time
/// and never changes afterwards, even if the admin reconfigures the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i32,
    pub username: String,
    pub board_size: i32,
    pub created_at: String,
    /// Number of marked non-free cells.
    pub marked_count: i64,
}

/// One position on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: i32,
    pub row: i32,
    pub col: i32,
    pub text: String,
    pub is_free: bool,
    pub is_marked: bool,
}

/// One leaderboard row: cards ranked by marked non-free cells,
/// ties broken by username.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub board_size: i32,
    pub filled_count: i64,
}

/// Card listing row for the admin screen.
#[derive(Debug, Clone, Serialize)]
pub struct CardSummary {
    pub id: i32,
    pub username: String,
    pub board_size: i32,
    pub created_at: String,
}
