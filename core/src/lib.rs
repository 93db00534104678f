//! Minesweeper game state: mine placement, adjacency hints, the visibility
//! mask and the moves that change them.
//!
//! A presentation layer builds a [`GameBoard`], feeds it reveal, flag and
//! chord commands, and polls its state for drawing.
#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use display::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use types::*;

mod board;
mod cell;
mod display;
mod error;
mod generator;
mod layout;
mod types;

/// Smallest and largest side accepted by [`GameConfig::square`].
pub const SQUARE_SIZE_RANGE: (Coord, Coord) = (5, 25);

/// Percentage of cells that hold a mine in [`GameConfig::square`] boards.
pub const SQUARE_MINE_PERCENT: CellCount = 15;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// A board needs at least one cell and at least one cell without a mine,
    /// otherwise it can never be won.
    pub fn new((rows, cols): Coord2, mines: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 || mines >= mult(rows, cols) {
            return Err(GameError::InvalidConfiguration { rows, cols, mines });
        }
        Ok(Self::new_unchecked((rows, cols), mines))
    }

    /// Square board with a fixed mine density, the side is clamped into
    /// [`SQUARE_SIZE_RANGE`].
    pub fn square(size: Coord) -> Self {
        let (min, max) = SQUARE_SIZE_RANGE;
        let size = size.clamp(min, max);
        let mines = mult(size, size) * SQUARE_MINE_PERCENT / 100;
        Self::new_unchecked((size, size), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

/// Used to merge outcomes when one move reveals several cells
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
