//! Concurrency-safe timetable storage.
//!
//! [`TimetableStore`] holds the whole [`Grid`] behind a copy-on-write pointer:
//!
//! ```text
//! RwLock<Arc<Grid>>
//!   readers ── clone the Arc (brief read lock) ──► render without any lock
//!   writers ── write lock ──► Arc::make_mut ──► mutate in place / swap
//! ```
//!
//! A reader's [`snapshot`](TimetableStore::snapshot) is therefore a
//! point-in-time grid that can never be torn by a later writer: if a snapshot
//! is still alive when a writer arrives, `make_mut` clones the grid first and
//! the snapshot keeps the old version.  Lectures are inserted and removed as
//! whole values only.
//!
//! Each method is atomic on its own.  Multi-step commands (remove + undo
//! record + history) are serialised one level up, in
//! [`Timetable`](crate::timetable::Timetable).

pub mod error;

pub use error::TimetableError;

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::lecture::{Grid, Lecture};

// ── TimetableStore ────────────────────────────────────────────────────────────

/// Day → slot → lecture map with atomic single-cell writes and atomic bulk
/// replacement.
#[derive(Debug, Default)]
pub struct TimetableStore {
    grid: RwLock<Arc<Grid>>,
}

impl TimetableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `lecture` at `(day, slot)`.
    ///
    /// # Errors
    /// [`TimetableError::SlotTaken`] if the cell is occupied; the existing
    /// lecture is left untouched.
    pub fn add(&self, day: &str, slot: &str, lecture: Lecture) -> Result<(), TimetableError> {
        let mut guard = self.grid.write();
        if guard.get(day).is_some_and(|s| s.contains_key(slot)) {
            return Err(TimetableError::SlotTaken {
                day: day.to_string(),
                slot: slot.to_string(),
            });
        }
        Arc::make_mut(&mut guard)
            .entry(day.to_string())
            .or_default()
            .insert(slot.to_string(), lecture);
        Ok(())
    }

    /// Removes and returns the lecture at `(day, slot)`.  A day left without
    /// lectures is pruned in the same write.
    ///
    /// # Errors
    /// [`TimetableError::NotFound`] if the cell is empty.
    pub fn remove(&self, day: &str, slot: &str) -> Result<Lecture, TimetableError> {
        let not_found = || TimetableError::NotFound {
            day: day.to_string(),
            slot: slot.to_string(),
        };

        let mut guard = self.grid.write();
        // Check before make_mut so a miss never clones a shared grid.
        if !guard.get(day).is_some_and(|s| s.contains_key(slot)) {
            return Err(not_found());
        }

        let grid = Arc::make_mut(&mut guard);
        let schedule = grid.get_mut(day).ok_or_else(not_found)?;
        let removed = schedule.remove(slot).ok_or_else(not_found)?;
        if schedule.is_empty() {
            grid.remove(day);
            debug!(day, "pruned empty day");
        }
        Ok(removed)
    }

    /// Returns a copy of the lecture at `(day, slot)`, if any.
    pub fn get(&self, day: &str, slot: &str) -> Option<Lecture> {
        self.snapshot().get(day)?.get(slot).cloned()
    }

    /// Returns `true` if a lecture occupies `(day, slot)`.
    pub fn contains(&self, day: &str, slot: &str) -> bool {
        self.grid
            .read()
            .get(day)
            .is_some_and(|s| s.contains_key(slot))
    }

    /// Point-in-time view of the whole grid.
    pub fn snapshot(&self) -> Arc<Grid> {
        Arc::clone(&self.grid.read())
    }

    /// Atomically replaces the entire content with `grid`.
    ///
    /// Empty day schedules in `grid` are dropped so the "present day ⇒ at
    /// least one lecture" invariant holds after the swap.
    pub fn replace_all(&self, mut grid: Grid) {
        grid.retain(|_, schedule| !schedule.is_empty());
        *self.grid.write() = Arc::new(grid);
    }

    /// Total number of scheduled lectures.
    pub fn lecture_count(&self) -> usize {
        self.snapshot().values().map(|s| s.len()).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lecture::DaySchedule;
    use std::thread;

    fn lecture(day: &str, slot: &str, name: &str) -> Lecture {
        Lecture::new(slot, day, name, "CS101", "Lecture")
    }

    // ── add ───────────────────────────────────────────────────────────────────

    #[test]
    fn add_then_get_returns_lecture() {
        let store = TimetableStore::new();
        store
            .add("Monday", "9-10", lecture("Monday", "9-10", "Algo"))
            .unwrap();
        assert_eq!(
            store.get("Monday", "9-10").unwrap().class_name,
            "Algo"
        );
        assert!(store.get("Monday", "10-11").is_none());
        assert!(store.get("Tuesday", "9-10").is_none());
    }

    #[test]
    fn add_to_occupied_slot_keeps_existing_entry() {
        let store = TimetableStore::new();
        store
            .add("Monday", "9-10", lecture("Monday", "9-10", "Algo"))
            .unwrap();

        for _ in 0..3 {
            let err = store
                .add("Monday", "9-10", lecture("Monday", "9-10", "Other"))
                .unwrap_err();
            assert!(matches!(err, TimetableError::SlotTaken { .. }));
        }
        assert_eq!(store.get("Monday", "9-10").unwrap().class_name, "Algo");
        assert_eq!(store.lecture_count(), 1);
    }

    #[test]
    fn concurrent_adds_to_same_cell_succeed_once() {
        let store = Arc::new(TimetableStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .add("Monday", "9-10", lecture("Monday", "9-10", &format!("L{i}")))
                        .is_ok()
                })
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.lecture_count(), 1);
    }

    // ── remove ────────────────────────────────────────────────────────────────

    #[test]
    fn remove_returns_lecture_and_prunes_empty_day() {
        let store = TimetableStore::new();
        store
            .add("Monday", "9-10", lecture("Monday", "9-10", "Algo"))
            .unwrap();

        let removed = store.remove("Monday", "9-10").unwrap();
        assert_eq!(removed.class_name, "Algo");
        assert!(!store.snapshot().contains_key("Monday"), "empty day must be pruned");
    }

    #[test]
    fn remove_keeps_day_with_remaining_lectures() {
        let store = TimetableStore::new();
        store
            .add("Monday", "9-10", lecture("Monday", "9-10", "Algo"))
            .unwrap();
        store
            .add("Monday", "1-2", lecture("Monday", "1-2", "Nets"))
            .unwrap();

        store.remove("Monday", "9-10").unwrap();
        assert!(store.contains("Monday", "1-2"));
        assert_eq!(store.snapshot()["Monday"].len(), 1);
    }

    #[test]
    fn remove_missing_is_not_found() {
        let store = TimetableStore::new();
        let err = store.remove("Monday", "9-10").unwrap_err();
        assert_eq!(
            err,
            TimetableError::NotFound {
                day: "Monday".into(),
                slot: "9-10".into()
            }
        );
    }

    // ── snapshot / replace_all ────────────────────────────────────────────────

    #[test]
    fn snapshot_is_unaffected_by_later_writes() {
        let store = TimetableStore::new();
        store
            .add("Monday", "9-10", lecture("Monday", "9-10", "Algo"))
            .unwrap();

        let before = store.snapshot();
        store.remove("Monday", "9-10").unwrap();
        store
            .add("Friday", "4-5", lecture("Friday", "4-5", "Late"))
            .unwrap();

        assert!(before.contains_key("Monday"));
        assert!(!before.contains_key("Friday"));
        assert!(!store.snapshot().contains_key("Monday"));
    }

    #[test]
    fn replace_all_swaps_whole_grid_and_drops_empty_days() {
        let store = TimetableStore::new();
        store
            .add("Monday", "9-10", lecture("Monday", "9-10", "Algo"))
            .unwrap();

        let mut grid = Grid::new();
        let mut tuesday = DaySchedule::new();
        tuesday.insert("2-3".into(), lecture("Tuesday", "2-3", "Db"));
        grid.insert("Tuesday".into(), tuesday);
        grid.insert("Wednesday".into(), DaySchedule::new());

        store.replace_all(grid);

        let snap = store.snapshot();
        assert!(!snap.contains_key("Monday"));
        assert!(!snap.contains_key("Wednesday"));
        assert_eq!(snap["Tuesday"]["2-3"].class_name, "Db");
    }
}
