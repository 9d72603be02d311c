/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Append-only audit trail of timetable changes.

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Reply to `VIEW_HISTORY` when nothing has been recorded yet.
pub const EMPTY_HISTORY: &str = "No history available.";

/// One recorded change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

/// Rendered as `<description> : <timestamp>`.
impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {}",
            self.description,
            self.timestamp.format("%a %b %d %H:%M:%S UTC %Y")
        )
    }
}

/// Ordered, never-truncated list of [`HistoryEntry`] values.
///
/// Callers append only after the mutation they describe has been committed
/// to the store.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `description` with the current time.
    pub fn append(&self, description: impl Into<String>) {
        self.entries.write().push(HistoryEntry {
            timestamp: Utc::now(),
            description: description.into(),
        });
    }

    /// Copy of every entry, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// `VIEW_HISTORY` body: one entry per line, or [`EMPTY_HISTORY`].
    pub fn render(&self) -> String {
        let entries = self.entries.read();
        if entries.is_empty() {
            return EMPTY_HISTORY.to_string();
        }
        entries.iter().map(|e| format!("{e}\n")).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
