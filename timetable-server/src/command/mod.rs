/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Line protocol: command keywords, parsing and the per-connection
//! [`CommandProcessor`].
//!
//! | Line | Arguments | Notes |
//! |---|---|---|
//! | `ADD_LECTURE,time,day,class,module,type` | 5 | |
//! | `REMOVE_LECTURE,day,time` | 2 | |
//! | `UNDO_REMOVE,day,time` | 2 | |
//! | `VIEW_TIMETABLE` / `VIEW_HISTORY` / `GET_LECTURES` | 0 | read-only |
//! | `EARLY_LECTURES` | 0 | |
//! | `IMPORT_CSV` | 0 | followed by `BEGIN_CSV`, body lines, `END_CSV` |
//! | `STOP_CONNECTION` | 0 | ends the connection |
//!
//! Arguments are comma-separated and trimmed; trailing empty fields are
//! dropped before counting (a blank but non-empty field still counts) and
//! surplus fields are ignored.  A keyword that
//! takes arguments is only recognised with its trailing comma, so a bare
//! `ADD_LECTURE` is an unknown command.

pub mod processor;

pub use processor::{CommandProcessor, Reply};

use thiserror::Error;

use crate::lecture::Lecture;

// ── Protocol constants ────────────────────────────────────────────────────────

pub const ADD_LECTURE: &str = "ADD_LECTURE";
pub const REMOVE_LECTURE: &str = "REMOVE_LECTURE";
pub const UNDO_REMOVE: &str = "UNDO_REMOVE";
pub const VIEW_TIMETABLE: &str = "VIEW_TIMETABLE";
pub const VIEW_HISTORY: &str = "VIEW_HISTORY";
pub const EARLY_LECTURES: &str = "EARLY_LECTURES";
pub const GET_LECTURES: &str = "GET_LECTURES";
pub const IMPORT_CSV: &str = "IMPORT_CSV";
pub const STOP_CONNECTION: &str = "STOP_CONNECTION";

/// First line of an `IMPORT_CSV` block.
pub const BEGIN_CSV: &str = "BEGIN_CSV";

/// Last line of an `IMPORT_CSV` block.
pub const END_CSV: &str = "END_CSV";

// ── Command ───────────────────────────────────────────────────────────────────

/// One parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddLecture(Lecture),
    RemoveLecture { day: String, slot: String },
    UndoRemove { day: String, slot: String },
    ViewTimetable,
    ViewHistory,
    EarlyLectures,
    GetLectures,
    ImportCsv,
    StopConnection,
    Unknown(String),
}

/// An argument-taking command arrived with too few fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {command} command format.")]
pub struct MalformedCommand {
    pub command: &'static str,
}

impl Command {
    /// Parses one protocol line.
    ///
    /// # Errors
    /// [`MalformedCommand`] when `ADD_LECTURE`, `REMOVE_LECTURE` or
    /// `UNDO_REMOVE` carry fewer fields than required.
    pub fn parse(line: &str) -> Result<Self, MalformedCommand> {
        let raw = line.trim_start();
        let line = line.trim();

        if let Some(rest) = with_args(raw, ADD_LECTURE) {
            let [time, day, class, module, kind] = required::<5>(rest, ADD_LECTURE)?;
            return Ok(Command::AddLecture(Lecture::new(time, day, class, module, kind)));
        }
        if let Some(rest) = with_args(raw, REMOVE_LECTURE) {
            let [day, slot] = required::<2>(rest, REMOVE_LECTURE)?;
            return Ok(Command::RemoveLecture {
                day: day.to_string(),
                slot: slot.to_string(),
            });
        }
        if let Some(rest) = with_args(raw, UNDO_REMOVE) {
            let [day, slot] = required::<2>(rest, UNDO_REMOVE)?;
            return Ok(Command::UndoRemove {
                day: day.to_string(),
                slot: slot.to_string(),
            });
        }

        Ok(match line {
            VIEW_TIMETABLE => Command::ViewTimetable,
            VIEW_HISTORY => Command::ViewHistory,
            EARLY_LECTURES => Command::EarlyLectures,
            GET_LECTURES => Command::GetLectures,
            IMPORT_CSV => Command::ImportCsv,
            STOP_CONNECTION => Command::StopConnection,
            other => Command::Unknown(other.to_string()),
        })
    }

    /// Generic reply used when handling this command faults unexpectedly.
    pub fn fault_message(&self) -> &'static str {
        match self {
            Command::AddLecture(_) => "Error while adding lecture.",
            Command::RemoveLecture { .. } => "Error while removing lecture.",
            Command::UndoRemove { .. } => "Error: cannot undo.",
            _ => "Error while processing command.",
        }
    }
}

/// The text after `KEYWORD,`, or `None` if `line` is not that command.
fn with_args<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    line.strip_prefix(keyword)?.strip_prefix(',')
}

/// The first `N` fields of `args`, trimmed.  Trailing fields that are empty
/// before trimming are dropped first; a whitespace-only field still counts.
fn required<'a, const N: usize>(
    args: &'a str,
    command: &'static str,
) -> Result<[&'a str; N], MalformedCommand> {
    let mut fields: Vec<&str> = args.split(',').collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields.truncate(N);
    let fields: Vec<&str> = fields.into_iter().map(str::trim).collect();
    fields
        .try_into()
        .map_err(|_| MalformedCommand { command })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
