use ndarray::Array2;

use super::*;
use crate::{Coord2, ToNdIndex};

/// Uniform placement over the full board. Every cell is a candidate: the
/// starting position gets no protection, so the first reveal can hit a mine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMineFieldGenerator {
    seed: u64,
}

impl RandomMineFieldGenerator {
    /// The same seed always yields the same field for a given config.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineFieldGenerator for RandomMineFieldGenerator {
    fn generate(self, config: GameConfig) -> MineField {
        use rand::prelude::*;

        let (width, height) = config.size;
        let total_cells = config.total_cells();

        if config.mines >= total_cells {
            log::warn!(
                "minefield already full, requested {} mines but only {} cells",
                config.mines,
                total_cells
            );
            return MineField::from_mask(Array2::from_elem(config.size.to_nd_index(), true));
        }

        // Shrinking pool of not-yet-selected cells: every pick is uniform
        // over the remaining candidates, and no cell is ever resampled.
        let mut pool: Vec<Coord2> = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .collect();
        let mut mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for _ in 0..config.mines {
            let pick = rng.random_range(0..pool.len());
            let coords = pool.swap_remove(pick);
            mask[coords.to_nd_index()] = true;
        }

        log::debug!(
            "placed {} mines on a {}x{} board",
            config.mines,
            width,
            height
        );
        MineField::from_mask(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mine_count() {
        for seed in 0..16 {
            let config = GameConfig::new((9, 7), 20).unwrap();
            let field = RandomMineFieldGenerator::new(seed).generate(config);

            // from_mask recounts the mask, so this checks the actual cells
            assert_eq!(field.mines(), 20);
            assert_eq!(field.size(), (9, 7));
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_field() {
        let config = GameConfig::new((8, 8), 10).unwrap();
        let first = RandomMineFieldGenerator::new(77).generate(config);
        let second = RandomMineFieldGenerator::new(77).generate(config);

        assert_eq!(first, second);
    }

    #[test]
    fn nearly_full_board_leaves_the_single_safe_cell() {
        let config = GameConfig::new((4, 4), 15).unwrap();
        let field = RandomMineFieldGenerator::new(3).generate(config);

        assert_eq!(field.mines(), 15);
        assert_eq!(field.safe_cells(), 1);
    }
}
