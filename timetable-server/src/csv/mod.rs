//! CSV import: text block → complete replacement [`Grid`].
//!
//! The accepted format is a fixed grid:
//!
//! ```text
//! Time,Monday,Tuesday,Wednesday,Thursday,Friday
//! 9-10,Algo(CS101,Lecture),---,---,---,---
//! 10-11,---,"Nets(CS202,Lab)",,---,---
//! ```
//!
//! * The header must match [`CSV_HEADER`] exactly (after trimming).
//! * Every non-blank data row must split into exactly six fields
//!   (see [`line::split_line`]).
//! * Field 0 must be one of [`CSV_TIME_SLOTS`].
//! * Each day cell is `---`, empty, or `Name(Module,Type)`: the first `(` and
//!   last `)` delimit the details, which split once on the first comma.
//!
//! Parsing is all-or-nothing: [`parse_timetable`] either returns the whole
//! staged grid or a [`CsvError`] describing the first problem.  The live store
//! is only touched by the caller, after success.

pub mod line;

use thiserror::Error;
use tracing::debug;

use crate::lecture::{Grid, Lecture, CSV_TIME_SLOTS, WEEKDAYS};

use line::split_line;

// ── Constants ─────────────────────────────────────────────────────────────────

/// The only accepted header row.
pub const CSV_HEADER: &str = "Time,Monday,Tuesday,Wednesday,Thursday,Friday";

/// Fields per row: time + five weekdays.
pub const CSV_COLUMNS: usize = 1 + WEEKDAYS.len();

/// Cell text meaning "no lecture".
pub const EMPTY_CELL: &str = "---";

// ── Error type ────────────────────────────────────────────────────────────────

/// Reasons a CSV block is rejected.  Row numbers are 1-based lines of the
/// submitted block, header included.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    #[error("CSV does not contain header and at least one data row.")]
    MissingRows,

    #[error("CSV header is incorrect. Expected: {}", CSV_HEADER)]
    BadHeader,

    #[error("Expected {expected} columns, but got {found}. Line: {line}")]
    ColumnCount {
        expected: usize,
        found: usize,
        line: String,
    },

    #[error("Invalid time slot on row {row}: {slot}")]
    InvalidTimeSlot { row: usize, slot: String },

    /// The cell has no `(...)` group.
    #[error("Invalid lecture format in row {row} for {day}: {cell}")]
    InvalidLectureFormat {
        row: usize,
        day: String,
        cell: String,
    },

    /// The `(...)` group has no `Module,Type` comma.
    #[error("Invalid lecture details in row {row} for {day}: {cell}")]
    InvalidLectureDetails {
        row: usize,
        day: String,
        cell: String,
    },

    #[error("Duplicate lecture for {day} at {slot}")]
    Duplicate { day: String, slot: String },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses a full CSV block into a staged [`Grid`].
///
/// # Errors
/// The first [`CsvError`] encountered; nothing is partially applied.
pub fn parse_timetable(text: &str) -> Result<Grid, CsvError> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.len() < 2 {
        return Err(CsvError::MissingRows);
    }
    if lines[0].trim() != CSV_HEADER {
        return Err(CsvError::BadHeader);
    }

    let mut grid = Grid::new();

    for (idx, raw) in lines.iter().enumerate().skip(1) {
        let row = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let cols = split_line(raw, CSV_COLUMNS)?;

        let slot = cols[0].trim();
        if !CSV_TIME_SLOTS.contains(&slot) {
            return Err(CsvError::InvalidTimeSlot {
                row,
                slot: slot.to_string(),
            });
        }

        for (day, raw_cell) in WEEKDAYS.iter().zip(&cols[1..]) {
            let Some(lecture) = parse_cell(raw_cell, row, day, slot)? else {
                continue;
            };

            let schedule = grid.entry(day.to_string()).or_default();
            if schedule.contains_key(slot) {
                return Err(CsvError::Duplicate {
                    day: day.to_string(),
                    slot: slot.to_string(),
                });
            }
            schedule.insert(slot.to_string(), lecture);
        }
    }

    debug!(
        days = grid.len(),
        lectures = grid.values().map(|s| s.len()).sum::<usize>(),
        "CSV block parsed"
    );
    Ok(grid)
}

/// Interprets one day cell.  `Ok(None)` for an empty cell.
fn parse_cell(raw: &str, row: usize, day: &str, slot: &str) -> Result<Option<Lecture>, CsvError> {
    let cell = strip_matching_quotes(raw.trim());
    if cell.is_empty() || cell == EMPTY_CELL {
        return Ok(None);
    }

    let (open, close) = match (cell.find('('), cell.rfind(')')) {
        (Some(open), Some(close)) if close > open => (open, close),
        _ => {
            return Err(CsvError::InvalidLectureFormat {
                row,
                day: day.to_string(),
                cell: cell.to_string(),
            })
        }
    };

    let name = cell[..open].trim();
    let details = cell[open + 1..close].trim();
    let Some((module, lecture_type)) = details.split_once(',') else {
        return Err(CsvError::InvalidLectureDetails {
            row,
            day: day.to_string(),
            cell: cell.to_string(),
        });
    };

    Ok(Some(Lecture::new(
        slot,
        day,
        name,
        module.trim(),
        lecture_type.trim(),
    )))
}

/// Drops one pair of surrounding `"` or `'` quotes, trimming what is inside.
fn strip_matching_quotes(cell: &str) -> &str {
    for q in ['"', '\''] {
        if cell.len() >= 2 && cell.starts_with(q) && cell.ends_with(q) {
            return cell[1..cell.len() - 1].trim();
        }
    }
    cell
}

// ── Tests ─────────────────────────────────────────────────────────────────────
