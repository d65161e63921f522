use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCount, Coord};

/// Timestamp layout used in the statistics log.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Win,
    Loss,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Win => "Win",
            Self::Loss => "Loss",
        })
    }
}

impl FromStr for GameOutcome {
    type Err = RecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Win" => Ok(Self::Win),
            "Loss" => Ok(Self::Loss),
            other => Err(RecordParseError::new(format!("unknown outcome {other:?}"))),
        }
    }
}

/// One finished game as persisted: comma-space-separated fields in a fixed
/// order, one line per game, oldest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub started_at: NaiveDateTime,
    pub elapsed_secs: f64,
    pub moves: u32,
    pub outcome: GameOutcome,
    pub mines: CellCount,
    pub width: Coord,
    pub height: Coord,
}

impl fmt::Display for StatsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {:.2}, {}, {}, {}, {}, {}",
            self.started_at.format(TIMESTAMP_FORMAT),
            self.elapsed_secs,
            self.moves,
            self.outcome,
            self.mines,
            self.width,
            self.height,
        )
    }
}

/// Why one persisted line could not be turned back into a [`StatsRecord`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RecordParseError(String);

impl RecordParseError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

fn parse_field<T: FromStr>(field: &str, what: &str) -> Result<T, RecordParseError>
where
    T::Err: fmt::Display,
{
    field
        .parse()
        .map_err(|err| RecordParseError::new(format!("bad {what}: {err}")))
}

impl FromStr for StatsRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[started_at, elapsed, moves, outcome, mines, width, height] = fields.as_slice() else {
            return Err(RecordParseError::new(format!(
                "expected 7 fields, found {}",
                fields.len()
            )));
        };

        Ok(Self {
            started_at: NaiveDateTime::parse_from_str(started_at, TIMESTAMP_FORMAT)
                .map_err(|err| RecordParseError::new(format!("bad start timestamp: {err}")))?,
            elapsed_secs: parse_field(elapsed, "elapsed seconds")?,
            moves: parse_field(moves, "move count")?,
            outcome: outcome.parse()?,
            mines: parse_field(mines, "mine count")?,
            width: parse_field(width, "width")?,
            height: parse_field(height, "height")?,
        })
    }
}

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("statistics file error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed statistics record on line {line}: {source}")]
    Parse {
        line: usize,
        source: RecordParseError,
    },
}

/// Append-only log of finished games backed by a plain UTF-8 text file.
#[derive(Clone, Debug)]
pub struct StatsLog {
    path: PathBuf,
}

impl StatsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record. The file is opened, written, and released per
    /// call; existing records are never rewritten.
    pub fn append(&self, record: &StatsRecord) -> Result<(), StatsError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{record}")?;
        log::debug!("recorded game to {}", self.path.display());
        Ok(())
    }

    /// Opens the log and lazily parses it, oldest record first. Blank lines
    /// are skipped; a malformed line surfaces as a parse error carrying its
    /// 1-based line number, never as a fabricated record.
    pub fn load_all(
        &self,
    ) -> Result<impl Iterator<Item = Result<StatsRecord, StatsError>>, StatsError> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(reader
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(line) if line.trim().is_empty()))
            .map(|(index, line)| {
                line?.parse().map_err(|source| StatsError::Parse {
                    line: index + 1,
                    source,
                })
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> StatsRecord {
        StatsRecord {
            started_at: NaiveDate::from_ymd_opt(2026, 8, 7)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            elapsed_secs: 3.5,
            moves: 7,
            outcome: GameOutcome::Win,
            mines: 5,
            width: 8,
            height: 8,
        }
    }

    #[test]
    fn records_render_in_the_fixed_field_order() {
        assert_eq!(
            record().to_string(),
            "2026-08-07 12:00:00, 3.50, 7, Win, 5, 8, 8"
        );
    }

    #[test]
    fn a_written_line_parses_back_to_an_equal_record() {
        let record = record();
        let parsed: StatsRecord = record.to_string().parse().unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn append_then_load_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = StatsLog::new(dir.path().join("stats.txt"));

        let win = record();
        let loss = StatsRecord {
            outcome: GameOutcome::Loss,
            moves: 2,
            ..record()
        };
        log.append(&win).unwrap();
        log.append(&loss).unwrap();

        let records: Vec<_> = log.load_all().unwrap().map(Result::unwrap).collect();
        assert_eq!(records, [win, loss]);
    }

    #[test]
    fn malformed_lines_report_their_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let log = StatsLog::new(dir.path().join("stats.txt"));

        std::fs::write(log.path(), format!("{}\nnot a record\n", record())).unwrap();

        let results: Vec<_> = log.load_all().unwrap().collect();
        assert!(results[0].is_ok());
        assert!(matches!(
            &results[1],
            Err(StatsError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn loading_a_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = StatsLog::new(dir.path().join("missing.txt"));

        assert!(matches!(log.load_all(), Err(StatsError::Io(_))));
    }

    #[test]
    fn unknown_outcomes_are_rejected() {
        let line = "2026-08-07 12:00:00, 3.50, 7, Draw, 5, 8, 8";
        assert!(line.parse::<StatsRecord>().is_err());
    }

    #[test]
    fn short_lines_are_rejected() {
        assert!("2026-08-07 12:00:00, 3.50, 7".parse::<StatsRecord>().is_err());
    }
}
