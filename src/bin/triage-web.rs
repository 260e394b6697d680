// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Triage Web
//!
//! Runs a triage session behind a browser page and JSON API.

use clap::Parser;
use std::ffi::OsStr;
use std::path::PathBuf;
use tracing::{error, info};

use triage::config::{SessionConfig, DEFAULT_CONFIG_FILE};
use triage::launch::open_default;
use triage::SessionController;

#[derive(Parser, Debug)]
#[command(name = "triage-web")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Triage session in the browser")]
struct Args {
    /// Path to session file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Open browser automatically
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Triage Web v1.0.0");

    let config = SessionConfig::load_or_default(&args.config);
    let session = SessionController::new(config);
    info!("Session: {}", session.snapshot());

    let addr = format!("{}:{}", args.host, args.port);
    info!("Starting web server at http://{}", addr);

    if args.open {
        let url = format!("http://{}", addr);
        if let Err(e) = open_default(OsStr::new(&url)) {
            error!("Failed to open browser: {}", e);
        }
    }

    triage::web::start_server(session, args.config, &args.host, args.port).await?;
    Ok(())
}
