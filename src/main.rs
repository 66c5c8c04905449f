//! agent-crew — run one JSON task description through a crew of LLM personas
//! and print one JSON result line.
//!
//! Standard output carries exactly one JSON object per invocation; callers
//! parse it as the sole response. Diagnostics go to standard error through
//! `tracing` and are silent unless `AGENT_CREW_LOG` asks for them.

mod agents;
mod config;
mod constants;
mod crew;
mod dispatch;
mod error;
mod llm;
mod service;
mod util;

use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::constants::{APP_VERSION, LOG_FILTER_VAR, NO_CONFIG_MESSAGE};
use crate::service::GroqFactory;

// ── Entry point ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Fatal before anything reaches stdout.
    let settings = Settings::from_env().context("load configuration")?;
    debug!(version = APP_VERSION, "starting");

    let Some(arg) = env::args().nth(1) else {
        return emit(&json!({ "error": NO_CONFIG_MESSAGE }));
    };

    let raw = match service::parse_request(&arg) {
        Ok(raw) => raw,
        Err(err) => return emit(&service::invalid_request(&err)),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create tokio runtime")?;
    let result = runtime.block_on(service::run(&GroqFactory, &settings, &raw));
    info!(success = result.is_success(), "request finished");

    emit(&result)
}

// ── Output ───────────────────────────────────────────────────────────

/// Log to stderr only; stdout is reserved for the result line.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Write one compact JSON line to stdout and flush.
fn emit<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value).context("serialize result")?;
    stdout.write_all(b"\n").context("write result")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
