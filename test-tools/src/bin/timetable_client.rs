/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Manual test driver for `timetable-server`.
//!
//! Examples:
//!   timetable-client "ADD_LECTURE,9-10,Monday,Algo,CS101,Lecture" VIEW_TIMETABLE
//!   timetable-client --import week.csv GET_LECTURES
//!   printf 'GET_LECTURES\nVIEW_HISTORY\n' | timetable-client

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use timetable_server::command::{BEGIN_CSV, END_CSV, IMPORT_CSV, STOP_CONNECTION};
use timetable_server::DEFAULT_PORT;

/// How long to wait for further lines of a multi-line reply.
const REPLY_IDLE: Duration = Duration::from_millis(200);

#[derive(Debug, Parser)]
#[command(
    name = "timetable-client",
    about = "Timetable server test client – NOT for production",
    long_about = None,
)]
struct Cli {
    /// Server host.
    #[arg(short = 'H', long = "host", default_value = "127.0.0.1")]
    host: String,

    /// Server port.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// CSV file to push through IMPORT_CSV before any other command.
    #[arg(short = 'i', long = "import")]
    import: Option<PathBuf>,

    /// Commands to send, one per argument.  Read from stdin when empty.
    commands: Vec<String>,
}

struct Connection {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port))
            .await
            .with_context(|| format!("Cannot connect to {host}:{port}"))?;
        info!("Connected to {}:{}", host, port);
        let (rd, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(rd).lines(),
            writer,
        })
    }

    async fn send_line(&mut self, line: &str) -> Result<()> {
        debug!(line, "send");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Reads one reply: the first line, plus whatever follows before the
    /// connection goes idle.
    async fn read_reply(&mut self) -> Result<Option<String>> {
        let Some(first) = self.lines.next_line().await? else {
            return Ok(None);
        };
        let mut reply = first;
        while let Ok(next) = tokio::time::timeout(REPLY_IDLE, self.lines.next_line()).await {
            match next? {
                Some(line) => {
                    reply.push('\n');
                    reply.push_str(&line);
                }
                None => break,
            }
        }
        Ok(Some(reply))
    }

    async fn request(&mut self, command: &str) -> Result<bool> {
        self.send_line(command).await?;
        match self.read_reply().await? {
            Some(reply) => {
                println!("{reply}");
                Ok(command.trim() != STOP_CONNECTION)
            }
            None => {
                warn!("Server closed the connection");
                Ok(false)
            }
        }
    }

    async fn import(&mut self, path: &PathBuf) -> Result<()> {
        let body = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read CSV file: {}", path.display()))?;
        info!("Importing {}", path.display());

        self.send_line(IMPORT_CSV).await?;
        self.send_line(BEGIN_CSV).await?;
        for line in body.lines() {
            self.send_line(line).await?;
        }
        self.request(END_CSV).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut conn = Connection::open(&cli.host, cli.port).await?;

    if let Some(path) = &cli.import {
        conn.import(path).await?;
    }

    if cli.commands.is_empty() && cli.import.is_none() {
        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = stdin.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if !conn.request(&line).await? {
                return Ok(());
            }
        }
    } else {
        for command in &cli.commands {
            if !conn.request(command).await? {
                return Ok(());
            }
        }
    }

    conn.request(STOP_CONNECTION).await?;
    Ok(())
}
