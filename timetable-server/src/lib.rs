/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timetable server – shared weekly lecture timetable over a TCP line protocol
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── lecture     – Lecture record, weekdays, slot ordering
//! ├── store/      – copy-on-write grid of days × slots
//! ├── undo        – last removal per (day, slot)
//! ├── history     – timestamped audit log
//! ├── csv/        – IMPORT_CSV block parsing
//! ├── early/      – early-lecture shift across a bounded day pool
//! ├── render      – VIEW_TIMETABLE grid and GET_LECTURES listing
//! ├── timetable   – facade serialising every mutation
//! ├── command/    – protocol parsing and per-connection state machine
//! ├── config/     – YAML server configuration
//! └── server      – tokio accept loop and connection pump
//! ```

pub mod command;
pub mod config;
pub mod csv;
pub mod early;
pub mod history;
pub mod lecture;
pub mod render;
pub mod server;
pub mod store;
pub mod timetable;
pub mod undo;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use lecture::Lecture;
pub use timetable::Timetable;
