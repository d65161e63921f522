use std::collections::{HashSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{Cell, CellCount, Coord2, GameConfig, GameError, MineField, Result, ToNdIndex};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of a reveal action.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// The player-facing grid layered over a fixed [`MineField`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    field: MineField,
    grid: Array2<Cell>,
    revealed: CellCount,
    flagged: CellCount,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    pub fn new(field: MineField) -> Self {
        let size = field.size();
        Self {
            field,
            grid: Array2::default(size.to_nd_index()),
            revealed: 0,
            flagged: 0,
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.field.config()
    }

    pub fn size(&self) -> Coord2 {
        self.field.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.field.mines()
    }

    /// Mines minus flags placed; goes negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.field.mines() as isize) - (self.flagged as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords.to_nd_index()]
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.field.validate_coords(coords)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Mine lookup. Kept crate-private so collaborators can only learn mine
    /// locations through the end-of-game views.
    pub(crate) fn has_mine_at(&self, coords: Coord2) -> bool {
        self.field.has_mine_at(coords)
    }

    /// Toggles a flag between `Hidden` and `Flagged`; a revealed cell is
    /// left untouched.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use FlagOutcome::*;

        let coords = self.field.validate_coords(coords)?;
        self.check_in_progress()?;

        Ok(match self.grid[coords.to_nd_index()] {
            Cell::Hidden => {
                self.grid[coords.to_nd_index()] = Cell::Flagged;
                self.flagged += 1;
                Changed
            }
            Cell::Flagged => {
                self.grid[coords.to_nd_index()] = Cell::Hidden;
                self.flagged -= 1;
                Changed
            }
            Cell::Revealed(_) => NoChange,
        })
    }

    /// Opens one cell. A mine loses the game on the spot; a zero-count cell
    /// cascades through its empty region. Revealing a revealed or flagged
    /// cell changes nothing.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.field.validate_coords(coords)?;
        self.check_in_progress()?;
        Ok(self.reveal_cell(coords))
    }

    fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        match (self.grid[coords.to_nd_index()], self.field.has_mine_at(coords)) {
            (Cell::Hidden, true) => {
                self.triggered_mine = Some(coords);
                self.state = GameState::Lost;
                log::debug!("mine hit at {coords:?}");
                RevealOutcome::HitMine
            }
            (Cell::Hidden, false) => {
                let count = self.field.adjacent_mines(coords);
                self.open(coords, count);
                if count == 0 {
                    self.cascade(coords);
                }

                if self.revealed == self.field.safe_cells() {
                    self.state = GameState::Won;
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
            _ => RevealOutcome::NoChange,
        }
    }

    fn open(&mut self, coords: Coord2, count: u8) {
        self.grid[coords.to_nd_index()] = Cell::Revealed(count);
        self.revealed += 1;
    }

    /// Worklist flood fill: opens the connected zero-count region around
    /// `seed` plus its bordering ring of numbered cells. Each cell enters
    /// the worklist at most once, so the fill always terminates.
    fn cascade(&mut self, seed: Coord2) {
        let mut visited = HashSet::from([seed]);
        let mut worklist: VecDeque<_> = self.hidden_neighbors(seed).collect();
        log::trace!("cascade from {seed:?}, initial worklist: {worklist:?}");

        while let Some(coords) = worklist.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            // flagged cells and anything opened since enqueueing stay put
            if !matches!(self.grid[coords.to_nd_index()], Cell::Hidden) {
                continue;
            }

            let count = self.field.adjacent_mines(coords);
            self.open(coords, count);
            log::trace!("cascade opened {coords:?} with count {count}");

            if count == 0 {
                let next: Vec<_> = self
                    .hidden_neighbors(coords)
                    .filter(|pos| !visited.contains(pos))
                    .collect();
                worklist.extend(next);
            }
        }
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.field
            .iter_neighbors(coords)
            .filter(|&pos| matches!(self.grid[pos.to_nd_index()], Cell::Hidden))
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
