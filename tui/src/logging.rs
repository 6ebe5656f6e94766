//! Logging setup
//!
//! Headless runs log to stderr. The interactive surface owns the terminal,
//! so its logs go to a file instead (`--log-file`, or
//! `$XDG_CACHE_HOME/token-masq/token-masq.log`).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default log file for the interactive surface
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("token-masq").join("token-masq.log"))
}

/// Open `path` for appending, creating parent directories
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber, filtered by `RUST_LOG`
///
/// With `interactive` set, events go to `log_file` (or the default path).
/// Returns the file in use, if any.
pub fn init(interactive: bool, log_file: Option<&Path>) -> Option<PathBuf> {
    let filter = EnvFilter::from_default_env();

    if !interactive {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .with(filter)
            .init();
        return None;
    }

    let path = log_file.map(Path::to_path_buf).or_else(default_log_path)?;
    match open_log_file(&path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter)
                .init();
            Some(path)
        }
        Err(e) => {
            // Printed before raw mode, so it stays readable
            eprintln!("Warning: cannot open log file {}: {e}", path.display());
            None
        }
    }
}
