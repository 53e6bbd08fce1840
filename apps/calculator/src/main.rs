// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Nebo Calculator
//!
//! Minimal tool app: a four-function calculator served over the Nebo app
//! socket. Nebo launches it with `NEBO_APP_SOCK` (and the other `NEBO_APP_*`
//! variables) set; for local runs they can come from a `.env` file.

use anyhow::{Context, Result};
use clap::Parser;
use nebo_app_sdk::AppBuilder;
use std::time::Duration;
use tracing::info;

mod calculator;

use calculator::Calculator;

/// Nebo calculator tool app
#[derive(Parser)]
#[command(name = "nebo-calculator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NEBO_APP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Seconds in-flight calls get to finish after SIGTERM
    #[arg(long, env = "NEBO_APP_GRACE_SECS", default_value_t = 10)]
    grace_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let app = AppBuilder::from_env()
        .tool(Calculator)
        .on_configure(|settings| info!(keys = settings.len(), "Settings updated"))
        .grace_period(Duration::from_secs(cli.grace_secs))
        .build()
        .context("Failed to build app")?;

    info!(app = %app.env().name, "Starting calculator");
    app.run().await.context("App failed")?;

    Ok(())
}

/// Logs go to stderr; the supervisor owns stdout.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
