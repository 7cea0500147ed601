#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging utilities for the tracker client.
//!
//! Library crates emit `tracing` events; applications call [`init`] once to
//! install a formatting subscriber. `RUST_LOG` takes precedence over the
//! configured level when set.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Emits a trace event tagged with the calling module.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(target: "tracker", module = module, "{}", msg);
}

/// Build the filter for `level`, letting `RUST_LOG` override it.
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global fmt subscriber at `level`.
///
/// Returns `false` if a global subscriber was already installed, in which case
/// the existing one is left untouched.
pub fn init(level: &str) -> bool {
    tracing_subscriber::fmt().with_env_filter(filter_for(level)).try_init().is_ok()
}

/// Install a global fmt subscriber at `level` that appends to the file at `path`.
///
/// Returns `Ok(false)` if a global subscriber was already installed.
pub fn init_to_file(level: &str, path: &Path) -> std::io::Result<bool> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok())
}
