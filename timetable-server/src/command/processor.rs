/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-connection command state machine.
//!
//! ```text
//!            IMPORT_CSV              BEGIN_CSV
//!   Ready ──────────────► AwaitingBlockStart ──────────► CollectingBlock ──┐
//!     ▲  ◄─── any other line (error reply) ───┘                │ body line │
//!     │                                                        ◄───────────┘
//!     └──────────────────────── END_CSV (import reply) ────────┘
//! ```
//!
//! The processor is transport-agnostic: the connection loop feeds it one line
//! at a time and writes whatever [`Reply`] comes back.  Lines are handled
//! strictly in order; a reply is produced before the next line is consumed.
//!
//! A panic while handling a command is caught here and turned into the
//! command's generic error text, so neither the connection nor the shared
//! state is lost.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::{Command, BEGIN_CSV, END_CSV};
use crate::timetable::Timetable;

/// Reply when `IMPORT_CSV` is not followed by the block-start marker.
pub const MISSING_BLOCK_START: &str = "IMPORT_CSV error: Expected BEGIN_CSV marker.";

/// Reply to `STOP_CONNECTION`.
pub const STOP_ACK: &str = "Connection Stopped";

// ── Reply ─────────────────────────────────────────────────────────────────────

/// What the transport should do after feeding one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Send this text and keep reading.
    Respond(String),
    /// Line consumed as part of an import block; nothing to send yet.
    Pending,
    /// Send this text and close the connection.
    Close(String),
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
enum State {
    #[default]
    Ready,
    AwaitingBlockStart,
    CollectingBlock(String),
}

// ── CommandProcessor ──────────────────────────────────────────────────────────

/// One instance per connection, sharing the process-wide [`Timetable`].
#[derive(Debug)]
pub struct CommandProcessor {
    timetable: Arc<Timetable>,
    peer: String,
    state: State,
}

impl CommandProcessor {
    pub fn new(timetable: Arc<Timetable>, peer: impl Into<String>) -> Self {
        Self {
            timetable,
            peer: peer.into(),
            state: State::Ready,
        }
    }

    /// Returns `true` while an `IMPORT_CSV` exchange is in progress.
    pub fn in_import(&self) -> bool {
        !matches!(self.state, State::Ready)
    }

    /// Handles one input line.
    pub async fn feed(&mut self, line: &str) -> Reply {
        match std::mem::take(&mut self.state) {
            State::Ready => self.dispatch(line).await,

            State::AwaitingBlockStart => {
                if line.trim() == BEGIN_CSV {
                    self.state = State::CollectingBlock(String::new());
                    Reply::Pending
                } else {
                    warn!(peer = %self.peer, line, "IMPORT_CSV without block start marker");
                    Reply::Respond(MISSING_BLOCK_START.to_string())
                }
            }

            State::CollectingBlock(mut block) => {
                if line.trim() == END_CSV {
                    Reply::Respond(self.import(block).await)
                } else {
                    block.push_str(line);
                    block.push('\n');
                    self.state = State::CollectingBlock(block);
                    Reply::Pending
                }
            }
        }
    }

    /// Called when the input stream ends.  A collected import block is
    /// applied as if its end marker had arrived; the outcome is only logged
    /// since the peer is gone.
    pub async fn finish(&mut self) {
        match std::mem::take(&mut self.state) {
            State::CollectingBlock(block) => {
                let outcome = self.import(block).await;
                info!(peer = %self.peer, outcome = %outcome, "stream ended inside IMPORT_CSV block");
            }
            State::AwaitingBlockStart => {
                debug!(peer = %self.peer, "stream ended before BEGIN_CSV");
            }
            State::Ready => {}
        }
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    async fn dispatch(&mut self, line: &str) -> Reply {
        debug!(peer = %self.peer, line, "command received");

        let command = match Command::parse(line) {
            Ok(c) => c,
            Err(e) => {
                warn!(peer = %self.peer, line, "malformed command");
                return Reply::Respond(e.to_string());
            }
        };

        match command {
            Command::ImportCsv => {
                self.state = State::AwaitingBlockStart;
                Reply::Pending
            }
            Command::StopConnection => {
                info!(peer = %self.peer, "connection stop requested");
                Reply::Close(STOP_ACK.to_string())
            }
            command => {
                let fallback = command.fault_message();
                let timetable = Arc::clone(&self.timetable);
                let text = guarded(&self.peer, fallback, execute(&timetable, command)).await;
                Reply::Respond(text)
            }
        }
    }

    async fn import(&self, block: String) -> String {
        let timetable = Arc::clone(&self.timetable);
        let peer = self.peer.clone();
        guarded(&self.peer, "IMPORT_CSV failed: internal error", async move {
            match timetable.import_csv(&block).await {
                Ok(_) => "Timetable imported successfully.".to_string(),
                Err(e) => {
                    warn!(peer = %peer, error = %e, "CSV import rejected");
                    format!("IMPORT_CSV failed: {e}")
                }
            }
        })
        .await
    }
}

/// Runs a non-stateful command against the shared timetable.
async fn execute(timetable: &Timetable, command: Command) -> String {
    match command {
        Command::AddLecture(lecture) => match timetable.add_lecture(lecture).await {
            Ok(()) => "Lecture added successfully.".to_string(),
            Err(e) => {
                warn!(error = %e, "add rejected");
                e.client_message().to_string()
            }
        },
        Command::RemoveLecture { day, slot } => {
            match timetable.remove_lecture(&day, &slot).await {
                Ok(_) => "Lecture removed successfully.".to_string(),
                Err(e) => {
                    warn!(error = %e, "remove rejected");
                    e.client_message().to_string()
                }
            }
        }
        Command::UndoRemove { day, slot } => match timetable.undo_remove(&day, &slot).await {
            Ok(_) => "Undo successful: Lecture restored.".to_string(),
            Err(e) => {
                warn!(error = %e, "undo rejected");
                e.client_message().to_string()
            }
        },
        Command::ViewTimetable => timetable.render_timetable(),
        Command::ViewHistory => timetable.render_history(),
        Command::GetLectures => timetable.render_lectures(),
        Command::EarlyLectures => {
            let summary = timetable.shift_early_lectures().await;
            let mut text = String::from("Early lectures processed:\n");
            for line in summary {
                text.push_str(&line);
                text.push('\n');
            }
            text
        }
        Command::Unknown(_) => "Unknown Command".to_string(),
        // Stateful commands never reach here.
        Command::ImportCsv | Command::StopConnection => "Unknown Command".to_string(),
    }
}

/// Awaits `fut`, replacing a panic with `fallback`.
async fn guarded<F>(peer: &str, fallback: &'static str, fut: F) -> String
where
    F: Future<Output = String>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(text) => text,
        Err(_) => {
            error!(peer, fallback, "command handler panicked");
            fallback.to_string()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
