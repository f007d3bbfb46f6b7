//! Tracing subscriber setup.
//!
//! Logs go to stderr so command output on stdout stays clean, or to the
//! configured file (appended, created with its parent directories).

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` overrides `config.level`.
///
/// If the log file cannot be opened, logging falls back to stderr and the
/// failure is reported as the first event.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut file_error = None;
    let mut to_file = false;
    let writer = match config.file.as_deref().map(open_log_file) {
        Some(Ok(file)) => {
            to_file = true;
            BoxMakeWriter::new(Mutex::new(file))
        }
        Some(Err(e)) => {
            file_error = Some(e);
            BoxMakeWriter::new(std::io::stderr)
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(
            builder
                .with_target(true)
                .with_ansi(!to_file)
                .finish(),
        )
    };

    if let (Ok(()), Some(e)) = (installed, file_error) {
        tracing::warn!(error = %e, "Could not open log file, logging to stderr");
    }
}

/// Open `path` for appending, creating parent directories as needed.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
