/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for timetable mutations.
//!
//! Every variant carries the `(day, slot)` key it concerns so the command
//! layer can log it with full context and pick the matching client text:
//!
//! | Variant | Raised by | Client text |
//! |---|---|---|
//! | `SlotTaken` | add | `Timeslot already taken! Choose another time.` |
//! | `NotFound` | remove | `No lecture scheduled in this time slot.` |
//! | `NothingToUndo` | undo | `No lecture to undo.` |
//! | `UndoConflict` | undo | `Undo failed: Timeslot already occupied.` |
//!
//! All variants are recoverable: the store is untouched when one is returned.

use thiserror::Error;

/// Failure of a single store or undo operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    /// A lecture already occupies the requested cell.
    #[error("slot {slot} on {day} is already taken")]
    SlotTaken { day: String, slot: String },

    /// No lecture is scheduled in the requested cell.
    #[error("no lecture scheduled on {day} at {slot}")]
    NotFound { day: String, slot: String },

    /// The undo registry holds no removed lecture for this cell.
    #[error("no removed lecture recorded for {day} at {slot}")]
    NothingToUndo { day: String, slot: String },

    /// A removed lecture is recorded, but the cell has been re-occupied since.
    ///
    /// The undo record is kept so the caller may retry after freeing the slot.
    #[error("cannot restore {day} at {slot}: slot is occupied")]
    UndoConflict { day: String, slot: String },
}

impl TimetableError {
    /// Text sent back to the client for this failure.
    pub fn client_message(&self) -> &'static str {
        match self {
            TimetableError::SlotTaken { .. } => "Timeslot already taken! Choose another time.",
            TimetableError::NotFound { .. } => "No lecture scheduled in this time slot.",
            TimetableError::NothingToUndo { .. } => "No lecture to undo.",
            TimetableError::UndoConflict { .. } => "Undo failed: Timeslot already occupied.",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
