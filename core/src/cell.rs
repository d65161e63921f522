use serde::{Deserialize, Serialize};

/// Canonical player-visible state of one grid cell. The adjacent-mine count
/// only exists on revealed cells, and a revealed cell can never be flagged.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Revealed(u8),
    Flagged,
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
