//! Single-level undo for `REMOVE_LECTURE`.
//!
//! Only the most recent removal per `(day, slot)` is kept.  Removing the same
//! cell again before an undo overwrites the earlier record, which is then
//! unrecoverable.
//!
//! The registry has no interior locking; it lives inside the write domain of
//! [`Timetable`](crate::timetable::Timetable), which serialises every access.

use std::collections::HashMap;

use tracing::debug;

use crate::lecture::Lecture;

/// `(day, slot)` → most recently removed lecture.
#[derive(Debug, Default)]
pub struct UndoRegistry {
    removed: HashMap<(String, String), Lecture>,
}

impl UndoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `lecture` as the latest removal at `(day, slot)`, returning any
    /// record it displaced.
    pub fn record(&mut self, day: &str, slot: &str, lecture: Lecture) -> Option<Lecture> {
        let displaced = self
            .removed
            .insert((day.to_string(), slot.to_string()), lecture);
        if displaced.is_some() {
            debug!(day, slot, "discarded earlier undo record");
        }
        displaced
    }

    /// The pending record for `(day, slot)`, if any.
    pub fn peek(&self, day: &str, slot: &str) -> Option<&Lecture> {
        self.removed.get(&(day.to_string(), slot.to_string()))
    }

    /// Removes and returns the pending record for `(day, slot)`.
    pub fn take(&mut self, day: &str, slot: &str) -> Option<Lecture> {
        self.removed.remove(&(day.to_string(), slot.to_string()))
    }

    pub fn len(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(name: &str) -> Lecture {
        Lecture::new("9-10", "Monday", name, "CS101", "Lecture")
    }

    #[test]
    fn record_then_take_round_trip() {
        let mut reg = UndoRegistry::new();
        assert!(reg.record("Monday", "9-10", lecture("Algo")).is_none());
        assert_eq!(reg.peek("Monday", "9-10").unwrap().class_name, "Algo");

        let taken = reg.take("Monday", "9-10").unwrap();
        assert_eq!(taken, lecture("Algo"));
        assert!(reg.is_empty());
        assert!(reg.take("Monday", "9-10").is_none());
    }

    #[test]
    fn second_removal_overwrites_first() {
        let mut reg = UndoRegistry::new();
        reg.record("Monday", "9-10", lecture("First"));
        let displaced = reg.record("Monday", "9-10", lecture("Second"));

        assert_eq!(displaced.unwrap().class_name, "First");
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.take("Monday", "9-10").unwrap().class_name, "Second");
    }

    #[test]
    fn keys_are_independent() {
        let mut reg = UndoRegistry::new();
        reg.record("Monday", "9-10", lecture("A"));
        reg.record("Tuesday", "9-10", lecture("B"));
        reg.record("Monday", "10-11", lecture("C"));
        assert_eq!(reg.len(), 3);
        assert!(reg.peek("Wednesday", "9-10").is_none());
    }
}
