// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! linkd - The messaging link daemon.
//!
//! Supervises a single messaging session through the engine bridge and
//! serves status, pairing and send requests over HTTP.
//!
//! Usage:
//!   linkd [--bind <addr>] [--auth-path <dir>] [--bridge-url <url>]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use link_bridge::BridgeEngine;
use link_core::{ConnectionSupervisor, SupervisorConfig};

mod api;
mod config;
mod env;
mod ratelimit;

use config::Config;

/// linkd: messaging link daemon
#[derive(Parser, Debug)]
#[command(name = "linkd")]
#[command(about = "Supervises a messaging session and serves it over HTTP")]
struct Args {
    /// Address to bind the HTTP server to (default: 0.0.0.0:$PORT)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Credential directory handed to the engine
    #[arg(long)]
    auth_path: Option<PathBuf>,

    /// WebSocket URL of the engine bridge
    #[arg(long)]
    bridge_url: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = Config::from_env();
    let log_level = match (&config, args.verbose) {
        (_, true) => "debug",
        (Ok(config), false) => config.log_level.as_str(),
        (Err(_), false) => config::DEFAULT_LOG_LEVEL,
    };
    setup_logging(args.log_file.as_deref(), log_level);

    let config = match config {
        Ok(config) => apply_args(config, &args),
        Err(e) => {
            error!(event = "config_error", "{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config, args.bind).await {
        error!(event = "fatal", "{}", e);
        std::process::exit(1);
    }
    info!("linkd stopped");
}

/// Command-line flags override environment values.
fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(path) = &args.auth_path {
        config.auth_path = path.clone();
    }
    if let Some(url) = &args.bridge_url {
        config.bridge_url = url.clone();
    }
    config
}

async fn run(config: Config, bind: Option<SocketAddr>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = bind.unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], config.port)));
    info!(
        event = "startup",
        version = %config.version,
        mode = ?config.mode,
        bridge_url = %config.bridge_url,
        max_attempts = config.reconnect.max_attempts,
        base_delay_ms = config.reconnect.base_delay.as_millis() as u64,
        "linkd starting"
    );

    let supervisor = ConnectionSupervisor::new(
        BridgeEngine::new(config.bridge_url.clone()),
        SupervisorConfig {
            auth_path: config.auth_path.clone(),
            reconnect: config.reconnect,
        },
    );
    supervisor.initialize().await?;

    let state = api::AppState::new(
        supervisor.status_reporter(),
        supervisor.pairing(),
        supervisor.message_sender(),
        config.pair_rate_limit,
        config.version.clone(),
    );
    let router = api::build_router(state, &config.allowed_origins);

    let listener = TcpListener::bind(addr).await?;
    info!(event = "listening", %addr, "listening on {}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The supervisor lives until the server is done.
    drop(supervisor);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!(event = "shutdown", "shutting down");
}

fn setup_logging(log_path: Option<&Path>, level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(env::names::RUST_LOG)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_LEVEL));

    // Try to open log file, fall back to stderr
    let file = log_path.and_then(|path| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    if let Some(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
