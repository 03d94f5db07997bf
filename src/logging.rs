//! Tracing subscriber setup.
//!
//! The filter comes from `FOLIO_LOG` (same syntax as `RUST_LOG`), falling back
//! to `folio=info`. The viewer owns the terminal, so it only logs when given
//! a file to write to.

use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FOLIO_LOG";

const DEFAULT_FILTER: &str = "folio=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr. Used by `serve` and `build`.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(env_filter())
        .try_init();
}

/// Append logs to `path`. Used by the viewer.
pub fn init_file(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(env_filter())
        .try_init();
    Ok(())
}
