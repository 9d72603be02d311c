/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! TCP transport: accept loop and per-connection line pump.
//!
//! Each accepted socket gets its own tokio task running
//! [`handle_connection`], which owns one [`CommandProcessor`].  Commands on a
//! connection are strictly sequential (read line → reply → read next line);
//! different connections run concurrently against the same [`Timetable`].
//! An I/O error or EOF ends only the affected connection.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::command::{CommandProcessor, Reply};
use crate::timetable::Timetable;

/// Accepts connections on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, timetable: Arc<Timetable>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    info!(addr = ?listener.local_addr().ok(), "waiting for connections");

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    info!(peer = %addr, "client connected");
                    let timetable = Arc::clone(&timetable);
                    tokio::spawn(async move {
                        let peer = addr.to_string();
                        if let Err(e) = handle_connection(stream, &peer, timetable).await {
                            warn!(peer = %peer, error = %e, "connection closed with error");
                        }
                        info!(peer = %peer, "client disconnected");
                    });
                }
                Err(e) => warn!(error = %e, "failed to accept connection"),
            },
            _ = &mut shutdown => {
                info!("shutdown requested, no longer accepting connections");
                return Ok(());
            }
        }
    }
}

/// Runs the command loop for one connection until `STOP_CONNECTION`, EOF or
/// an I/O error.
pub async fn handle_connection<S>(
    stream: S,
    peer: &str,
    timetable: Arc<Timetable>,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut processor = CommandProcessor::new(timetable, peer);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = decode_line(&buf);
        match processor.feed(&line).await {
            Reply::Pending => {}
            Reply::Respond(text) => write_reply(&mut writer, &text).await?,
            Reply::Close(text) => {
                write_reply(&mut writer, &text).await?;
                writer.shutdown().await?;
                return Ok(());
            }
        }
    }

    debug!(peer, "end of stream");
    processor.finish().await;
    Ok(())
}

/// Strips the line terminator; invalid UTF-8 is replaced, not rejected.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

async fn write_reply<W>(writer: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    /// Feeds `input` through a duplex pipe and returns everything written back.
    async fn exchange(timetable: Arc<Timetable>, input: &str) -> String {
        let (client, server) = duplex(64 * 1024);
        let task = tokio::spawn(async move { handle_connection(server, "duplex", timetable).await });

        let (mut rd, mut wr) = tokio::io::split(client);
        wr.write_all(input.as_bytes()).await.unwrap();
        wr.shutdown().await.unwrap();

        let mut out = String::new();
        rd.read_to_string(&mut out).await.unwrap();
        task.await.unwrap().unwrap();
        out
    }

    #[tokio::test]
    async fn replies_in_order_and_stops() {
        let tt = Arc::new(Timetable::default());
        let out = exchange(
            tt,
            "ADD_LECTURE,9-10,Monday,Algo,CS101,Lecture\r\n\
             GET_LECTURES\n\
             STOP_CONNECTION\n\
             GET_LECTURES\n",
        )
        .await;

        assert_eq!(
            out,
            "Lecture added successfully.\n\
             Monday,9-10: Algo (CS101, Lecture)\n\n\
             Connection Stopped\n"
        );
    }

    #[tokio::test]
    async fn import_block_gets_a_single_reply() {
        let tt = Arc::new(Timetable::default());
        let out = exchange(
            Arc::clone(&tt),
            "IMPORT_CSV\n\
             BEGIN_CSV\n\
             Time,Monday,Tuesday,Wednesday,Thursday,Friday\n\
             9-10,Algo(CS101,Lecture),---,---,---,---\n\
             END_CSV\n",
        )
        .await;

        assert_eq!(out, "Timetable imported successfully.\n");
        assert_eq!(tt.render_lectures(), "Monday,9-10: Algo (CS101, Lecture)\n");
    }

    #[tokio::test]
    async fn eof_inside_block_still_imports() {
        let tt = Arc::new(Timetable::default());
        let out = exchange(
            Arc::clone(&tt),
            "IMPORT_CSV\nBEGIN_CSV\nTime,Monday,Tuesday,Wednesday,Thursday,Friday\n9-10,A(B,C),---,---,---,---\n",
        )
        .await;

        assert!(out.is_empty());
        assert_eq!(tt.render_lectures(), "Monday,9-10: A (B, C)\n");
        assert_eq!(tt.history().len(), 1);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_answered() {
        let tt = Arc::new(Timetable::default());
        let (client, server) = duplex(64 * 1024);
        let task = tokio::spawn({
            let tt = Arc::clone(&tt);
            async move { handle_connection(server, "duplex", tt).await }
        });

        let (mut rd, mut wr) = tokio::io::split(client);
        wr.write_all(b"ADD_LECTURE,9-10,Monday,Caf\xe9,CS1,Lecture\nGET_LECTURES\nSTOP_CONNECTION\n")
            .await
            .unwrap();
        wr.shutdown().await.unwrap();

        let mut out = String::new();
        rd.read_to_string(&mut out).await.unwrap();
        task.await.unwrap().unwrap();

        assert_eq!(
            out,
            "Lecture added successfully.\n\
             Monday,9-10: Caf\u{FFFD} (CS1, Lecture)\n\n\
             Connection Stopped\n"
        );
        assert_eq!(tt.store().lecture_count(), 1);
    }

    #[test]
    fn decode_line_strips_terminators() {
        assert_eq!(decode_line(b"GET_LECTURES\r\n"), "GET_LECTURES");
        assert_eq!(decode_line(b"GET_LECTURES\n"), "GET_LECTURES");
        assert_eq!(decode_line(b"GET_LECTURES"), "GET_LECTURES");
        assert_eq!(decode_line(b"A\xffB\n"), "A\u{FFFD}B");
    }

    #[tokio::test]
    async fn two_tcp_clients_share_one_timetable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let tt = Arc::new(Timetable::default());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, Arc::clone(&tt), async move {
            let _ = stop_rx.await;
        }));

        async fn roundtrip(addr: std::net::SocketAddr, cmd: &str) -> String {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (rd, mut wr) = stream.into_split();
            wr.write_all(format!("{cmd}\nSTOP_CONNECTION\n").as_bytes())
                .await
                .unwrap();
            let mut lines = BufReader::new(rd).lines();
            let reply = lines.next_line().await.unwrap().unwrap();
            assert_eq!(lines.next_line().await.unwrap().unwrap(), "Connection Stopped");
            reply
        }

        let (a, b) = tokio::join!(
            roundtrip(addr, "ADD_LECTURE,9-10,Monday,A,M1,Lecture"),
            roundtrip(addr, "ADD_LECTURE,9-10,Monday,B,M2,Lecture"),
        );
        let mut replies = vec![a, b];
        replies.sort();
        assert_eq!(
            replies,
            vec![
                "Lecture added successfully.".to_string(),
                "Timeslot already taken! Choose another time.".to_string(),
            ]
        );
        assert_eq!(tt.store().lecture_count(), 1);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
