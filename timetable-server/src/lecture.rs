/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core lecture data structures and the fixed weekly calendar.
//!
//! ```text
//! Day (String) ──► TimeSlot (String) ──► Lecture
//!   "Monday"         "9-10"               Algo(CS101,Lecture)
//! ```
//!
//! A [`Lecture`] is an immutable value.  It carries its own `day` and
//! `time_slot` for rendering, but it is only meaningful under the
//! `(day, slot)` key it is stored at; there is no identity beyond the field
//! values.  Moving a lecture (early shift, undo) always builds a new value.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

// ── Calendar constants ────────────────────────────────────────────────────────

/// Weekdays in display / CSV column order.
pub const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Every slot of the working day, chronological.  These are the rows of the
/// `VIEW_TIMETABLE` grid.
pub const WORKING_DAY_SLOTS: [&str; 9] = [
    "9-10", "10-11", "11-12", "12-1", "1-2", "2-3", "3-4", "4-5", "5-6",
];

/// Slots a CSV import may reference.
///
/// Deliberately excludes the final `5-6` slot even though `ADD_LECTURE`
/// accepts it; imports have always rejected that row.
pub const CSV_TIME_SLOTS: [&str; 8] = [
    "9-10", "10-11", "11-12", "12-1", "1-2", "2-3", "3-4", "4-5",
];

/// The first four slots of the working day, targets of the early-lecture
/// rebalancing pass.
pub const EARLY_SLOTS: [&str; 4] = ["9-10", "10-11", "11-12", "12-1"];

// ── Lecture ───────────────────────────────────────────────────────────────────

/// One scheduled class occupying a single `(day, time_slot)` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecture {
    pub time_slot: String,
    pub day: String,
    pub class_name: String,
    pub module: String,
    pub lecture_type: String,
}

impl Lecture {
    pub fn new(
        time_slot: impl Into<String>,
        day: impl Into<String>,
        class_name: impl Into<String>,
        module: impl Into<String>,
        lecture_type: impl Into<String>,
    ) -> Self {
        Self {
            time_slot: time_slot.into(),
            day: day.into(),
            class_name: class_name.into(),
            module: module.into(),
            lecture_type: lecture_type.into(),
        }
    }

    /// A copy of this lecture re-keyed to `slot` on the same day.
    pub fn moved_to(&self, slot: &str) -> Self {
        Self {
            time_slot: slot.to_string(),
            ..self.clone()
        }
    }

    /// Grid cell form: `ClassName(Module,LectureType)`.
    pub fn cell(&self) -> String {
        format!("{}({},{})", self.class_name, self.module, self.lecture_type)
    }

    /// Pipe-separated form used in history descriptions.
    pub fn audit_line(&self) -> String {
        format!(
            "{} | {} | {} | {} | {}",
            self.day, self.time_slot, self.class_name, self.module, self.lecture_type
        )
    }
}

/// Listing form: `ClassName (Module, LectureType)`.
impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.class_name, self.module, self.lecture_type
        )
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// One day's schedule: time slot → lecture.
///
/// `BTreeMap` so iteration is deterministic; chronological ordering is applied
/// explicitly where it matters (see [`chronological_cmp`]).
pub type DaySchedule = BTreeMap<String, Lecture>;

/// Complete timetable: day → [`DaySchedule`].  Days iterate lexicographically.
///
/// Invariant maintained by every writer: no day maps to an empty schedule.
pub type Grid = BTreeMap<String, DaySchedule>;

// ── Slot ordering ─────────────────────────────────────────────────────────────

/// Leading hour of a slot label (`"10-11"` → `10`), or `None` if it does not
/// parse.
pub fn leading_hour(slot: &str) -> Option<u32> {
    slot.split('-').next()?.trim().parse().ok()
}

/// Listing order used by `GET_LECTURES`: ascending leading hour, ties broken by
/// label.  Labels without a numeric hour sort after every parsable label.
pub fn hour_cmp(a: &str, b: &str) -> Ordering {
    match (leading_hour(a), leading_hour(b)) {
        (Some(ha), Some(hb)) => ha.cmp(&hb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Chronological order within a working day.
///
/// Known slots order by their position in [`WORKING_DAY_SLOTS`] (so `1-2`
/// comes after `12-1`).  Any other label follows all known slots, ordered by
/// [`hour_cmp`].
pub fn chronological_cmp(a: &str, b: &str) -> Ordering {
    let position = |s: &str| WORKING_DAY_SLOTS.iter().position(|w| *w == s);
    match (position(a), position(b)) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => hour_cmp(a, b),
    }
}

/// Returns `true` if `slot` is one of the [`EARLY_SLOTS`].
pub fn is_early_slot(slot: &str) -> bool {
    EARLY_SLOTS.contains(&slot)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn algo() -> Lecture {
        Lecture::new("9-10", "Monday", "Algo", "CS101", "Lecture")
    }

    // ── Lecture ───────────────────────────────────────────────────────────────

    #[test]
    fn cell_and_listing_forms() {
        let l = algo();
        assert_eq!(l.cell(), "Algo(CS101,Lecture)");
        assert_eq!(l.to_string(), "Algo (CS101, Lecture)");
        assert_eq!(l.audit_line(), "Monday | 9-10 | Algo | CS101 | Lecture");
    }

    #[test]
    fn moved_to_changes_only_the_slot() {
        let moved = algo().moved_to("11-12");
        assert_eq!(moved.time_slot, "11-12");
        assert_eq!(moved.day, "Monday");
        assert_eq!(moved.class_name, "Algo");
        assert_eq!(moved.module, "CS101");
    }

    #[test]
    fn equality_is_by_field_values() {
        assert_eq!(algo(), algo());
        assert_ne!(algo(), algo().moved_to("10-11"));
    }

    // ── Ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn leading_hour_parses_first_component() {
        assert_eq!(leading_hour("9-10"), Some(9));
        assert_eq!(leading_hour("12-1"), Some(12));
        assert_eq!(leading_hour(" 3 - 4"), Some(3));
        assert_eq!(leading_hour("noon"), None);
    }

    #[test]
    fn hour_cmp_orders_by_raw_hour_then_unparsable_last() {
        let mut slots = vec!["noon", "9-10", "1-2", "12-1", "10-11", "brunch"];
        slots.sort_by(|a, b| hour_cmp(a, b));
        assert_eq!(slots, vec!["1-2", "9-10", "10-11", "12-1", "brunch", "noon"]);
    }

    #[test]
    fn chronological_cmp_follows_working_day() {
        let mut slots = vec!["1-2", "5-6", "12-1", "9-10", "7-8", "x"];
        slots.sort_by(|a, b| chronological_cmp(a, b));
        assert_eq!(slots, vec!["9-10", "12-1", "1-2", "5-6", "7-8", "x"]);
    }

    #[test]
    fn early_slots_are_first_four_working_slots() {
        assert_eq!(&WORKING_DAY_SLOTS[..4], &EARLY_SLOTS[..]);
        assert!(is_early_slot("12-1"));
        assert!(!is_early_slot("1-2"));
    }

    #[test]
    fn csv_slots_exclude_last_working_slot() {
        assert_eq!(&WORKING_DAY_SLOTS[..8], &CSV_TIME_SLOTS[..]);
        assert!(!CSV_TIME_SLOTS.contains(&"5-6"));
    }
}
