use serde::{Deserialize, Serialize};

/// What a cell holds, fixed once the board is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    Mine,
    /// Number of mines among the cell's neighbors, `0..=8`.
    Count(u8),
}

impl CellContent {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            Self::Count(count) => Some(count),
        }
    }
}

/// Player-visible mask state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Revealed,
    Flagged,
}

/// A board cell: content and visibility live together so they cannot drift apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub content: CellContent,
    pub visibility: Visibility,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.content.is_mine()
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.visibility, Visibility::Revealed)
    }
}
