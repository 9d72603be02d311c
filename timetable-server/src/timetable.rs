/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Process-wide timetable state shared by every connection.
//!
//! [`Timetable`] owns the store, the history log, the undo registry and the
//! early-lecture scheduler.  Every mutating operation runs inside one async
//! write domain, the mutex that owns the [`UndoRegistry`]:
//!
//! | Operation | Write domain | Store effect | History entries |
//! |---|---|---|---|
//! | [`add_lecture`](Timetable::add_lecture) | yes | single insert | 1 |
//! | [`remove_lecture`](Timetable::remove_lecture) | yes | single remove | 1 |
//! | [`undo_remove`](Timetable::undo_remove) | yes | single insert | 1 |
//! | [`import_csv`](Timetable::import_csv) | yes (after parsing) | whole-grid swap | 1 |
//! | [`shift_early_lectures`](Timetable::shift_early_lectures) | yes, for the whole pass | whole-grid swap | 1 per shift |
//! | views | no | none | none |
//!
//! History is appended only after the store write has committed, while the
//! domain is still held, so log order matches commit order.  Views read a
//! store snapshot without entering the domain.

use tokio::sync::Mutex;
use tracing::info;

use crate::csv::{self, CsvError};
use crate::early::EarlyLectureScheduler;
use crate::history::HistoryLog;
use crate::lecture::Lecture;
use crate::render;
use crate::store::{TimetableError, TimetableStore};
use crate::undo::UndoRegistry;

/// History description recorded after a successful import.
pub const IMPORT_DESCRIPTION: &str = "Timetable imported via CSV (replaced current timetable)";

/// Shared timetable service.  Wrap in an `Arc` and hand one clone to each
/// connection.
#[derive(Debug, Default)]
pub struct Timetable {
    store: TimetableStore,
    history: HistoryLog,
    write_domain: Mutex<UndoRegistry>,
    shifter: EarlyLectureScheduler,
}

impl Timetable {
    /// Empty timetable whose early-lecture pass uses `shift_workers` tasks.
    pub fn new(shift_workers: usize) -> Self {
        Self {
            shifter: EarlyLectureScheduler::new(shift_workers),
            ..Default::default()
        }
    }

    pub fn store(&self) -> &TimetableStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Schedules `lecture` at its own `(day, time_slot)`.
    pub async fn add_lecture(&self, lecture: Lecture) -> Result<(), TimetableError> {
        let _domain = self.write_domain.lock().await;

        let audit = lecture.audit_line();
        let (day, slot) = (lecture.day.clone(), lecture.time_slot.clone());
        self.store.add(&day, &slot, lecture)?;
        self.history.append(format!("Lecture added: {audit}"));

        info!(day = %day, slot = %slot, "lecture added");
        Ok(())
    }

    /// Removes the lecture at `(day, slot)` and keeps it as the undo record
    /// for that cell, replacing any older record.
    pub async fn remove_lecture(&self, day: &str, slot: &str) -> Result<Lecture, TimetableError> {
        let mut undo = self.write_domain.lock().await;

        let removed = self.store.remove(day, slot)?;
        self.history
            .append(format!("Lecture removed: {}", removed.audit_line()));
        undo.record(day, slot, removed.clone());

        info!(day, slot, "lecture removed");
        Ok(removed)
    }

    /// Restores the most recent removal at `(day, slot)`.
    ///
    /// # Errors
    /// * [`TimetableError::NothingToUndo`] if no removal is recorded.
    /// * [`TimetableError::UndoConflict`] if the cell is occupied again; the
    ///   record is kept for a later attempt.
    pub async fn undo_remove(&self, day: &str, slot: &str) -> Result<Lecture, TimetableError> {
        let mut undo = self.write_domain.lock().await;

        let Some(pending) = undo.peek(day, slot).cloned() else {
            return Err(TimetableError::NothingToUndo {
                day: day.to_string(),
                slot: slot.to_string(),
            });
        };
        if self.store.contains(day, slot) {
            return Err(TimetableError::UndoConflict {
                day: day.to_string(),
                slot: slot.to_string(),
            });
        }

        self.store.add(day, slot, pending.clone())?;
        undo.take(day, slot);
        self.history
            .append(format!("Lecture restored: {}", pending.audit_line()));

        info!(day, slot, "lecture restored");
        Ok(pending)
    }

    /// Replaces the whole timetable with the grid described by `text`.
    ///
    /// Returns the number of imported lectures.  On error the live timetable
    /// and the history are untouched.
    pub async fn import_csv(&self, text: &str) -> Result<usize, CsvError> {
        let grid = csv::parse_timetable(text)?;
        let count = grid.values().map(|s| s.len()).sum();

        let _domain = self.write_domain.lock().await;
        self.store.replace_all(grid);
        self.history.append(IMPORT_DESCRIPTION);

        info!(lectures = count, "timetable replaced from CSV");
        Ok(count)
    }

    /// Runs the early-lecture pass over every day and commits the result.
    ///
    /// Returns one summary line per day.
    pub async fn shift_early_lectures(&self) -> Vec<String> {
        let _domain = self.write_domain.lock().await;

        let snapshot = self.store.snapshot();
        let report = self.shifter.run(&snapshot).await;

        if !report.shifts.is_empty() {
            self.store.replace_all(report.grid);
            for shift in &report.shifts {
                self.history.append(shift.to_string());
            }
        }
        report.summary
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    /// `VIEW_TIMETABLE` body.
    pub fn render_timetable(&self) -> String {
        render::render_grid(&self.store.snapshot())
    }

    /// `GET_LECTURES` body.
    pub fn render_lectures(&self) -> String {
        render::render_listing(&self.store.snapshot())
    }

    /// `VIEW_HISTORY` body.
    pub fn render_history(&self) -> String {
        self.history.render()
    }

    /// Number of cells with a pending undo record.
    pub async fn pending_undo_count(&self) -> usize {
        self.write_domain.lock().await.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
