/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Early-lecture rebalancing.
//!
//! For every day, each empty early slot (see [`EARLY_SLOTS`]) is filled, in
//! chronological order, by pulling the chronologically first lecture that
//! currently sits outside the early slots.  A lecture pulled into an early
//! slot is early from then on and cannot be pulled again in the same pass.
//!
//! # Candidate order
//!
//! | Slot kind | Order |
//! |---|---|
//! | working-day slot (`1-2` … `5-6`) | position in the working day |
//! | other label with a numeric hour | after all working-day slots, by hour then label |
//! | label without a numeric hour | last, by label |
//!
//! The order is total, so the pass is deterministic for any input.
//!
//! # Parallelism
//!
//! [`EarlyLectureScheduler::run`] hands each day to its own tokio task.  At
//! most `workers` day passes execute at once (one semaphore permit each).
//! Results are awaited in submission order (days lexicographic); a day whose
//! task fails keeps its original schedule and reports an error line without
//! affecting the others.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::lecture::{chronological_cmp, is_early_slot, DaySchedule, Grid, EARLY_SLOTS};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default size of the day-processing pool.
pub const DEFAULT_SHIFT_WORKERS: usize = 5;

/// Summary line for a day whose task failed.
pub const DAY_FAILED: &str = "Error shifting lectures.";

// ── Shift ─────────────────────────────────────────────────────────────────────

/// One lecture moved from a late slot into an early one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub day: String,
    pub module: String,
    pub from: String,
    pub to: String,
}

/// History description of the move.
impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lecture early shift: {} moved from {} to {} on {}",
            self.module, self.from, self.to, self.day
        )
    }
}

/// Runs the rebalancing pass over one day's schedule in place.
pub fn shift_day(day: &str, schedule: &mut DaySchedule) -> Vec<Shift> {
    let mut shifts = Vec::new();

    for early in EARLY_SLOTS {
        if schedule.contains_key(early) {
            continue;
        }

        let candidate = schedule
            .keys()
            .filter(|slot| !is_early_slot(slot))
            .min_by(|a, b| chronological_cmp(a, b))
            .cloned();
        let Some(from) = candidate else {
            break;
        };

        if let Some(lecture) = schedule.remove(&from) {
            debug!(day, from = %from, to = early, "shifting lecture");
            shifts.push(Shift {
                day: day.to_string(),
                module: lecture.module.clone(),
                from,
                to: early.to_string(),
            });
            schedule.insert(early.to_string(), lecture.moved_to(early));
        }
    }

    shifts
}

// ── ShiftReport ───────────────────────────────────────────────────────────────

/// Outcome of one pass over the whole grid.
#[derive(Debug, Default)]
pub struct ShiftReport {
    /// Rebalanced grid; failed days carry their original schedule.
    pub grid: Grid,
    /// Every move performed, in day-submission order.
    pub shifts: Vec<Shift>,
    /// One line per day, in submission order.
    pub summary: Vec<String>,
}

// ── EarlyLectureScheduler ─────────────────────────────────────────────────────

type DayPass = fn(&str, &mut DaySchedule) -> Vec<Shift>;

/// Per-day parallel rebalancer with a bounded worker pool.
#[derive(Debug, Clone)]
pub struct EarlyLectureScheduler {
    workers: usize,
}

impl Default for EarlyLectureScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SHIFT_WORKERS)
    }
}

impl EarlyLectureScheduler {
    /// Pool of `workers` concurrent day passes (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Rebalances every day of `grid` and returns the new grid plus the moves.
    ///
    /// `grid` itself is not modified; committing the result is the caller's
    /// job.
    pub async fn run(&self, grid: &Grid) -> ShiftReport {
        self.run_with(grid, shift_day).await
    }

    async fn run_with(&self, grid: &Grid, pass: DayPass) -> ShiftReport {
        let permits = Arc::new(Semaphore::new(self.workers));

        let handles: Vec<_> = grid
            .iter()
            .map(|(day, schedule)| {
                let permits = Arc::clone(&permits);
                let handle = tokio::spawn(run_day(permits, day.clone(), schedule.clone(), pass));
                (day.clone(), handle)
            })
            .collect();

        let mut report = ShiftReport {
            grid: grid.clone(),
            ..Default::default()
        };

        for (day, handle) in handles {
            match handle.await {
                Ok((schedule, shifts)) => {
                    report.summary.push(format!("Day {day} processed."));
                    report.shifts.extend(shifts);
                    report.grid.insert(day, schedule);
                }
                Err(e) => {
                    warn!(day = %day, error = %e, "day shift task failed, schedule left unchanged");
                    report.summary.push(DAY_FAILED.to_string());
                }
            }
        }

        info!(
            days = report.summary.len(),
            shifts = report.shifts.len(),
            workers = self.workers,
            "early-lecture pass complete"
        );
        report
    }
}

/// One day's pass, run once a pool permit is held.  A closed pool leaves the
/// schedule untouched.
async fn run_day(
    permits: Arc<Semaphore>,
    day: String,
    mut schedule: DaySchedule,
    pass: DayPass,
) -> (DaySchedule, Vec<Shift>) {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            warn!(day = %day, error = %e, "shift pool closed, day skipped");
            return (schedule, Vec::new());
        }
    };
    let shifts = pass(&day, &mut schedule);
    (schedule, shifts)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
