//! Text renderings of a timetable [`Grid`] for `VIEW_TIMETABLE` and
//! `GET_LECTURES`.

use crate::csv::EMPTY_CELL;
use crate::lecture::{hour_cmp, Grid, WEEKDAYS, WORKING_DAY_SLOTS};

/// Width of the leading time-label column.
const TIME_COLUMN: usize = 10;

/// Width of each day column.
const DAY_COLUMN: usize = 30;

/// Reply to `GET_LECTURES` when the store is empty.
pub const NO_LECTURES: &str = "No lectures available.";

/// Fixed Monday–Friday × working-day grid.  Cells show
/// `ClassName(Module,LectureType)` or `---`; every row ends with `\n`.
///
/// Days or slots outside the fixed calendar are not shown.
pub fn render_grid(grid: &Grid) -> String {
    let mut out = format!("{:<w$}", "", w = TIME_COLUMN);
    for day in WEEKDAYS {
        out.push_str(&format!("{day:<w$}", w = DAY_COLUMN));
    }
    out.push('\n');

    for slot in WORKING_DAY_SLOTS {
        out.push_str(&format!("{slot:<w$}", w = TIME_COLUMN));
        for day in WEEKDAYS {
            let cell = grid
                .get(day)
                .and_then(|s| s.get(slot))
                .map(|l| l.cell())
                .unwrap_or_else(|| EMPTY_CELL.to_string());
            out.push_str(&format!("{cell:<w$}", w = DAY_COLUMN));
        }
        out.push('\n');
    }
    out
}

/// One `day,time: ClassName (Module, LectureType)` line per lecture.
///
/// Days are lexicographic; slots follow [`hour_cmp`].
pub fn render_listing(grid: &Grid) -> String {
    if grid.is_empty() {
        return NO_LECTURES.to_string();
    }

    let mut out = String::new();
    for (day, schedule) in grid {
        let mut slots: Vec<_> = schedule.iter().collect();
        slots.sort_by(|(a, _), (b, _)| hour_cmp(a, b));
        for (slot, lecture) in slots {
            out.push_str(&format!("{day},{slot}: {lecture}\n"));
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
