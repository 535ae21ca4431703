use std::path::PathBuf;

/// Plain stderr logging for the headless `ask` command. Stdout stays
/// reserved for the streamed answer.
pub fn init_stderr(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "tutor_chat=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(feature = "debug-log")]
mod inner {
    use super::*;
    use std::fs;
    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    static LOG_PATH: std::sync::OnceLock<PathBuf> = std::sync::OnceLock::new();

    /// JSON file logging for the TUI, which owns the terminal.
    pub fn init() -> Option<(PathBuf, WorkerGuard)> {
        let log_path = PathBuf::from("tutor-debug.log");

        let file = match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Failed to open log file: {e}");
                return None;
            }
        };

        let (non_blocking, guard) = tracing_appender::non_blocking(file);

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tutor_chat=debug"));

        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        );

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("Failed to set tracing subscriber");
            return None;
        }

        LOG_PATH.set(log_path.clone()).ok();

        tracing::info!(version = env!("CARGO_PKG_VERSION"), "Debug logging initialized");

        Some((log_path, guard))
    }

    pub fn log_file_path() -> Option<&'static PathBuf> {
        LOG_PATH.get()
    }
}

#[cfg(not(feature = "debug-log"))]
mod inner {
    use super::*;

    #[inline(always)]
    pub fn init() -> Option<(PathBuf, ())> {
        None
    }

    #[inline(always)]
    pub fn log_file_path() -> Option<&'static PathBuf> {
        None
    }
}

pub use inner::*;
