/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use timetable_server::server;
use timetable_server::{ServerConfig, Timetable};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Shared lecture timetable server.
///
/// Example:
///   timetable-server -p 12346 -w 5 --config server.yaml
#[derive(Debug, Parser)]
#[command(
    name = "timetable-server",
    about = "Lecture timetable server over a TCP line protocol",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML server configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Address to bind (overrides the configuration file).
    #[arg(short = 'H', long = "host")]
    host: Option<String>,

    /// TCP port to listen on (overrides the configuration file).
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Size of the early-lecture day-processing pool.
    #[arg(short = 'w', long = "workers")]
    workers: Option<usize>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=info).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    info!("Timetable server starting up...");

    let cli = Cli::parse();

    // ── Load configuration ────────────────────────────────────────────────────
    let base = match &cli.config {
        Some(path) => match ServerConfig::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Failed to load server configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => {
            warn!("No configuration file provided, using default server settings");
            ServerConfig::default()
        }
    };

    let config = match base.with_overrides(cli.host, cli.port, cli.workers) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid server configuration: {:#}", e);
            process::exit(1);
        }
    };

    info!(
        host          = %config.host,
        port          = config.port,
        shift_workers = config.shift_workers,
        "Configuration"
    );

    // ── Serve ─────────────────────────────────────────────────────────────────
    let listener = match TcpListener::bind(config.bind_addr()).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr(), e);
            process::exit(1);
        }
    };
    info!("Server listening on {}", config.bind_addr());

    let timetable = Arc::new(Timetable::new(config.shift_workers));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    if let Err(e) = server::serve(listener, timetable, shutdown).await {
        error!("Server terminated: {:#}", e);
        process::exit(1);
    }
    info!("Timetable server stopped");
}
