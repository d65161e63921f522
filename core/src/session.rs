use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    Board, Cell, Coord2, FlagOutcome, GameOutcome, GameState, MineField, Result, RevealOutcome,
    StatsRecord,
};

/// What a collaborator may see of one cell. Mine locations only show up
/// once the game has ended; until then a hidden mine views as `Hidden`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
    TriggeredMine,
    Misflagged,
}

/// One play-through from setup to win or loss. Wraps the board with the
/// session clock and the move counter, and finalizes into a statistics
/// record exactly once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    started_at: NaiveDateTime,
    move_count: u32,
}

impl GameSession {
    /// Starts a session over a freshly generated mine field; the session
    /// clock starts now.
    pub fn start(field: MineField) -> Self {
        Self::start_at(field, Local::now().naive_local())
    }

    fn start_at(field: MineField, started_at: NaiveDateTime) -> Self {
        Self {
            board: Board::new(field),
            started_at,
            move_count: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.board.state()
    }

    pub fn is_finished(&self) -> bool {
        self.board.is_finished()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.board.state() {
            GameState::Won => Some(GameOutcome::Win),
            GameState::Lost => Some(GameOutcome::Loss),
            GameState::InProgress => None,
        }
    }

    /// Reveal verb. A flagged target is rejected here, before the reveal
    /// engine runs; the flag has to come off first. A move is counted only
    /// when the board actually changed.
    pub fn reveal_at(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if matches!(self.board.cell_at(coords), Cell::Flagged) {
            log::debug!("reveal at {coords:?} blocked by flag");
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = self.board.reveal(coords)?;
        if outcome.has_update() {
            self.move_count += 1;
        }
        Ok(outcome)
    }

    /// Flag verb; never consumes a move.
    pub fn toggle_flag_at(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        self.board.toggle_flag(coords)
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        let cell = self.board.cell_at(coords);

        if !self.board.is_finished() {
            return Self::plain_view(cell);
        }

        let has_mine = self.board.has_mine_at(coords);
        match (self.board.state(), cell) {
            (GameState::Won, Cell::Hidden | Cell::Flagged) if has_mine => CellView::Flagged,
            (GameState::Lost, Cell::Hidden) if has_mine => {
                if self.board.triggered_mine() == Some(coords) {
                    CellView::TriggeredMine
                } else {
                    CellView::Mine
                }
            }
            (GameState::Lost, Cell::Flagged) if !has_mine => CellView::Misflagged,
            _ => Self::plain_view(cell),
        }
    }

    fn plain_view(cell: Cell) -> CellView {
        match cell {
            Cell::Hidden => CellView::Hidden,
            Cell::Flagged => CellView::Flagged,
            Cell::Revealed(count) => CellView::Revealed(count),
        }
    }

    /// Finalizes a finished session into its statistics record, computing
    /// the elapsed wall-clock time here and nowhere else. An unfinished
    /// (abandoned) session yields no record.
    pub fn into_record(self) -> Option<StatsRecord> {
        let outcome = self.outcome()?;
        let config = self.board.config();

        let elapsed = Local::now().naive_local() - self.started_at;
        let elapsed_secs = (elapsed.num_milliseconds().max(0) as f64 / 10.0).round() / 100.0;
        log::debug!("session finished: {outcome:?} after {elapsed_secs}s");

        Some(StatsRecord {
            started_at: self
                .started_at
                .with_nanosecond(0)
                .unwrap_or(self.started_at),
            elapsed_secs,
            moves: self.move_count,
            outcome,
            mines: config.mines,
            width: config.size.0,
            height: config.size.1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::start(MineField::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn flagged_cells_block_the_reveal_verb_without_a_move() {
        let mut session = session((2, 2), &[(0, 0)]);

        session.toggle_flag_at((1, 1)).unwrap();
        assert_eq!(session.reveal_at((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.board().cell_at((1, 1)), Cell::Flagged);
    }

    #[test]
    fn only_effective_reveals_count_as_moves() {
        let mut session = session((3, 3), &[(0, 0)]);

        session.reveal_at((1, 1)).unwrap();
        assert_eq!(session.move_count(), 1);

        // repeat reveal is a no-op and flag toggles never count
        session.reveal_at((1, 1)).unwrap();
        session.toggle_flag_at((2, 2)).unwrap();
        session.toggle_flag_at((2, 2)).unwrap();
        assert_eq!(session.move_count(), 1);
    }

    #[test]
    fn hidden_mines_are_invisible_while_in_progress() {
        let session = session((2, 2), &[(0, 0)]);

        assert_eq!(session.outcome(), None);
        assert_eq!(session.cell_view((0, 0)), CellView::Hidden);
    }

    #[test]
    fn loss_disclosure_shows_mines_and_wrong_flags() {
        let mut session = session((3, 1), &[(0, 0), (2, 0)]);

        session.toggle_flag_at((1, 0)).unwrap();
        session.toggle_flag_at((1, 0)).unwrap();
        session.toggle_flag_at((1, 0)).unwrap(); // left flagged on a safe cell
        session.reveal_at((0, 0)).unwrap();

        assert_eq!(session.outcome(), Some(GameOutcome::Loss));
        assert_eq!(session.cell_view((0, 0)), CellView::TriggeredMine);
        assert_eq!(session.cell_view((2, 0)), CellView::Mine);
        assert_eq!(session.cell_view((1, 0)), CellView::Misflagged);
    }

    #[test]
    fn win_disclosure_flags_the_remaining_mines() {
        let mut session = session((2, 1), &[(0, 0)]);

        session.reveal_at((1, 0)).unwrap();

        assert_eq!(session.outcome(), Some(GameOutcome::Win));
        assert_eq!(session.cell_view((0, 0)), CellView::Flagged);
        assert_eq!(session.cell_view((1, 0)), CellView::Revealed(1));
    }

    #[test]
    fn finished_sessions_finalize_into_a_record() {
        let mut session = session((2, 1), &[(0, 0)]);
        session.reveal_at((1, 0)).unwrap();

        let record = session.into_record().unwrap();
        assert_eq!(record.outcome, GameOutcome::Win);
        assert_eq!(record.moves, 1);
        assert_eq!(record.mines, 1);
        assert_eq!((record.width, record.height), (2, 1));
        assert!(record.elapsed_secs >= 0.0);
        assert_eq!(record.started_at.nanosecond(), 0);
    }

    #[test]
    fn abandoned_sessions_yield_no_record() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.reveal_at((1, 1)).unwrap();
        assert!(!session.is_finished());

        assert_eq!(session.into_record(), None);
    }
}
