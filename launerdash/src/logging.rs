//! File logging. The terminal belongs to the TUI, so events go to a log file.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::profiles::config_dir;

pub const LOG_ENV: &str = "LAUNERDASH_LOG";
const DEFAULT_DIRECTIVE: &str = "launerdash=info";

pub fn default_log_path() -> PathBuf {
    config_dir().join("launerdash.log")
}

/// Filter from `LAUNERDASH_LOG` directives; unset, blank or malformed falls back to `launerdash=info`.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber writing to `path`, filtered by `LAUNERDASH_LOG`.
pub fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = log_filter(std::env::var(LOG_ENV).ok().as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}
