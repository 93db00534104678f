use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

/// Where the mines are. Always holds fewer mines than cells and at least one cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub(crate) fn new_unchecked(mine_mask: Array2<bool>, mine_count: CellCount) -> Self {
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let (Ok(rows), Ok(cols)) = (Coord::try_from(rows), Coord::try_from(cols)) else {
            return Err(GameError::InvalidCoords);
        };
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();

        GameConfig::new((rows, cols), mine_count)?;
        Ok(Self::new_unchecked(mine_mask, mine_count))
    }

    /// Builds a layout from explicit mine positions, duplicates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mine_mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()) && self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    /// Mine sentinels and hint values for every cell.
    pub fn contents(&self) -> Array2<CellContent> {
        Array2::from_shape_fn(self.mine_mask.dim(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            if self[coords] {
                CellContent::Mine
            } else {
                CellContent::Count(self.adjacent_mine_count(coords))
            }
        })
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

#[derive(Deserialize)]
struct LayoutRecord {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl<'de> Deserialize<'de> for MineLayout {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let record = LayoutRecord::deserialize(deserializer)?;
        let layout = MineLayout::from_mine_mask(record.mine_mask).map_err(D::Error::custom)?;
        if layout.mine_count != record.mine_count {
            return Err(D::Error::custom(GameError::InconsistentBoard));
        }
        Ok(layout)
    }
}
