use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {rows}x{cols} board cannot hold {mines} mines")]
    InvalidConfiguration {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board state is inconsistent")]
    InconsistentBoard,
}

pub type Result<T> = core::result::Result<T, GameError>;
