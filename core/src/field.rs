use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    cells, CellCount, Coord2, GameError, NeighborIter, NeighborIterExt, Result, ToNdIndex,
};

/// Player-chosen board dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates the setup values: both dimensions must be at least 1, and
    /// the mine count must be positive while leaving at least one safe cell.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimension);
        }
        if mines == 0 || mines >= cells(width, height) {
            return Err(GameError::InvalidMineCount);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        cells(self.size.0, self.size.1)
    }
}

/// Mine locations for one game. Fixed once generated; the player-facing
/// grid lives in [`Board`](crate::Board), layered on top of this.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineField {
    mask: Array2<bool>,
    mines: CellCount,
}

impl MineField {
    pub fn from_mask(mask: Array2<bool>) -> Self {
        let mines = mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self { mask, mines }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mask(mask))
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mines,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.mask.len().try_into().unwrap()
    }

    pub fn mines(&self) -> CellCount {
        self.mines
    }

    pub fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Number of mines among the in-bounds neighbors of `coords`, regardless
    /// of what the player has revealed.
    pub fn adjacent_mines(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineField {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mask[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_zero_dimensions() {
        assert_eq!(GameConfig::new((0, 1), 1), Err(GameError::InvalidDimension));
        assert_eq!(GameConfig::new((1, 0), 1), Err(GameError::InvalidDimension));
    }

    #[test]
    fn config_rejects_mine_counts_without_a_safe_cell() {
        assert_eq!(GameConfig::new((5, 5), 0), Err(GameError::InvalidMineCount));
        assert_eq!(
            GameConfig::new((5, 5), 25),
            Err(GameError::InvalidMineCount)
        );
        assert_eq!(
            GameConfig::new((5, 5), 26),
            Err(GameError::InvalidMineCount)
        );
    }

    #[test]
    fn config_accepts_a_nearly_full_board() {
        let config = GameConfig::new((5, 5), 24).unwrap();
        assert_eq!(config.total_cells(), 25);
    }

    #[test]
    fn adjacent_mines_counts_in_bounds_neighbors_only() {
        let field = MineField::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(field.adjacent_mines((1, 1)), 2);
        assert_eq!(field.adjacent_mines((0, 1)), 1);
        assert_eq!(field.adjacent_mines((2, 0)), 0);
        assert_eq!(field.adjacent_mines((0, 0)), 0);
    }

    #[test]
    fn mine_coords_outside_the_board_are_rejected() {
        assert_eq!(
            MineField::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn safe_cells_is_total_minus_mines() {
        let field = MineField::from_mine_coords((4, 2), &[(0, 0), (3, 1)]).unwrap();
        assert_eq!(field.total_cells(), 8);
        assert_eq!(field.mines(), 2);
        assert_eq!(field.safe_cells(), 6);
    }
}
