use alloc::collections::VecDeque;
use core::num::Saturating;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// Nothing revealed or flagged yet
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A single game from construction until it is won or lost.
///
/// Commands never fail: coordinates outside the board, moves on a finished
/// game and moves that make no sense for the target cell all come back as
/// `NoChange`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameBoard {
    cells: Array2<Cell>,
    mine_count: CellCount,
    safe_revealed: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    lost: bool,
    triggered_mine: Option<Coord2>,
}

impl GameBoard {
    /// Random board with `mines` mines on `rows` x `cols` cells, `seed` picks the layout.
    pub fn new(mines: CellCount, rows: Coord, cols: Coord, seed: u64) -> Result<Self> {
        let config = GameConfig::new((rows, cols), mines)?;
        Self::generate(config, RandomLayoutGenerator::new(seed))
    }

    pub fn generate(config: GameConfig, generator: impl LayoutGenerator) -> Result<Self> {
        Ok(Self::from_layout(&generator.generate(config)?))
    }

    pub fn from_layout(layout: &MineLayout) -> Self {
        let cells = layout.contents().mapv(|content| Cell {
            content,
            visibility: Visibility::Hidden,
        });
        let (rows, cols) = layout.size();
        log::debug!(
            "New {}x{} board with {} mines",
            rows,
            cols,
            layout.mine_count()
        );

        Self {
            cells,
            mine_count: layout.mine_count(),
            safe_revealed: Saturating(0),
            flagged_count: Saturating(0),
            lost: false,
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> BoardState {
        if self.lost {
            BoardState::Lost
        } else if self.check_win() {
            BoardState::Won
        } else if self.safe_revealed.0 == 0 && self.flagged_count.0 == 0 {
            BoardState::Ready
        } else {
            BoardState::Active
        }
    }

    pub fn is_finished(&self) -> bool {
        self.lost || self.check_win()
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// All non-mine cells are revealed and no mine went off.
    pub fn check_win(&self) -> bool {
        !self.lost && self.total_cells() - self.safe_revealed.0 == self.mine_count
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_count
    }

    /// Revealed cells without a mine.
    pub fn revealed_count(&self) -> CellCount {
        self.safe_revealed.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.flagged_count.0 as isize)
    }

    /// The mine whose reveal lost the game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn visibility_at(&self, coords: Coord2) -> Option<Visibility> {
        self.cell_at(coords).map(|cell| cell.visibility)
    }

    pub fn value_at(&self, coords: Coord2) -> Option<CellContent> {
        self.cell_at(coords).map(|cell| cell.content)
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_some_and(Cell::is_mine)
    }

    pub fn cells(&self) -> ArrayView2<'_, Cell> {
        self.cells.view()
    }

    /// The full content grid regardless of visibility.
    pub fn snapshot(&self) -> Array2<CellContent> {
        self.cells.mapv(|cell| cell.content)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        use Visibility::*;

        if self.is_finished() {
            return MarkOutcome::NoChange;
        }
        let Some(cell) = self.cells.get_mut(coords.to_nd_index()) else {
            return MarkOutcome::NoChange;
        };

        match cell.visibility {
            Hidden => {
                cell.visibility = Flagged;
                self.flagged_count += 1;
                MarkOutcome::Changed
            }
            Flagged => {
                cell.visibility = Hidden;
                self.flagged_count -= 1;
                MarkOutcome::Changed
            }
            Revealed => MarkOutcome::NoChange,
        }
    }

    /// Reveals a hidden cell, flooding through connected zero cells.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if self.is_finished() || !in_bounds(coords, self.size()) {
            return RevealOutcome::NoChange;
        }
        self.reveal_hidden(coords)
    }

    /// Reveals every hidden neighbor of a revealed count once exactly that many
    /// neighbors are flagged. A misplaced flag makes this hit a mine.
    pub fn chord(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.is_finished() {
            return NoChange;
        }
        let Some(Cell {
            content: CellContent::Count(count),
            visibility: Visibility::Revealed,
        }) = self.cell_at(coords)
        else {
            return NoChange;
        };
        if count == 0 || count != self.count_flagged_neighbors(coords) {
            return NoChange;
        }

        let mut outcome = NoChange;
        for neighbor in self.cells.iter_neighbors(coords) {
            outcome = outcome | self.reveal_hidden(neighbor);
        }
        outcome
    }

    /// Chord on a revealed cell, plain reveal otherwise.
    pub fn reveal_or_chord(&mut self, coords: Coord2) -> RevealOutcome {
        match self.visibility_at(coords) {
            Some(Visibility::Revealed) => self.chord(coords),
            _ => self.reveal(coords),
        }
    }

    /// Shows every mine, flagged or not. Other cells are left alone.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine()) {
            if cell.visibility == Visibility::Flagged {
                self.flagged_count -= 1;
            }
            cell.visibility = Visibility::Revealed;
        }
    }

    fn reveal_hidden(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.cells[coords.to_nd_index()];
        if cell.visibility != Visibility::Hidden {
            return RevealOutcome::NoChange;
        }

        if cell.is_mine() {
            log::debug!("Hit mine at {:?}", coords);
            self.cells[coords.to_nd_index()].visibility = Visibility::Revealed;
            self.triggered_mine = Some(coords);
            self.lost = true;
            self.reveal_all_mines();
            return RevealOutcome::HitMine;
        }

        let mut to_visit = VecDeque::from([coords]);
        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = &mut self.cells[visit_coords.to_nd_index()];
            // flags stop the flood, revealed cells were already handled
            if cell.visibility != Visibility::Hidden {
                continue;
            }
            cell.visibility = Visibility::Revealed;
            let content = cell.content;
            self.safe_revealed += 1;
            log::trace!("Revealed {:?}: {:?}", visit_coords, content);

            if content == CellContent::Count(0) {
                let cells = &self.cells;
                to_visit.extend(
                    cells
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| cells[pos.to_nd_index()].visibility == Visibility::Hidden),
                );
            }
        }

        if self.check_win() {
            log::debug!("Board cleared after revealing {:?}", coords);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].visibility == Visibility::Flagged)
            .count()
            .try_into()
            .unwrap()
    }
}

/// Serialized form of [`GameBoard`], checked before it becomes a board.
#[derive(Deserialize)]
struct BoardRecord {
    cells: Array2<Cell>,
    mine_count: CellCount,
    safe_revealed: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    lost: bool,
    triggered_mine: Option<Coord2>,
}

impl BoardRecord {
    /// Rejects records whose hints, counters or loss marker disagree with the cells.
    fn validate(self) -> Result<GameBoard> {
        let layout = MineLayout::from_mine_mask(self.cells.mapv(Cell::is_mine))?;
        if layout.contents() != self.cells.mapv(|cell| cell.content) {
            return Err(GameError::InconsistentBoard);
        }

        let count = |predicate: fn(&Cell) -> bool| -> CellCount {
            self.cells
                .iter()
                .filter(|cell| predicate(cell))
                .count()
                .try_into()
                .unwrap()
        };
        let safe_revealed = count(|cell| !cell.is_mine() && cell.is_revealed());
        let flagged_count = count(|cell| cell.visibility == Visibility::Flagged);

        let triggered_ok = match self.triggered_mine {
            Some(coords) => self
                .cells
                .get(coords.to_nd_index())
                .is_some_and(|cell| cell.is_mine() && cell.is_revealed()),
            None => true,
        };

        if self.mine_count != layout.mine_count()
            || self.safe_revealed.0 != safe_revealed
            || self.flagged_count.0 != flagged_count
            || self.lost != self.triggered_mine.is_some()
            || !triggered_ok
        {
            return Err(GameError::InconsistentBoard);
        }

        Ok(GameBoard {
            cells: self.cells,
            mine_count: self.mine_count,
            safe_revealed: self.safe_revealed,
            flagged_count: self.flagged_count,
            lost: self.lost,
            triggered_mine: self.triggered_mine,
        })
    }
}

impl<'de> Deserialize<'de> for GameBoard {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        BoardRecord::deserialize(deserializer)?
            .validate()
            .map_err(serde::de::Error::custom)
    }
}
