use crate::{GameConfig, MineField};

pub use random::*;

mod random;

/// Strategy seam for mine placement; a generator is consumed per game.
pub trait MineFieldGenerator {
    fn generate(self, config: GameConfig) -> MineField;
}
