//! Structured logging setup
//!
//! Library code only emits `tracing` events. Applications that want them on a
//! console or in a file call [`init_logging`] once at startup.
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Install a global `tracing` subscriber described by `config`.
///
/// # Errors
/// - `ProtocolError::Config` if the configuration fails validation or a
///   subscriber is already installed
/// - `ProtocolError::Io` if the log file cannot be opened
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ProtocolError::Config(errors.join("; ")));
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_ascii_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match (config.log_to_file, config.log_file_path.as_deref()) {
        (true, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            if config.json_format {
                builder.json().with_writer(Mutex::new(file)).try_init()
            } else {
                builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
            }
        }
        _ if config.json_format => builder.json().try_init(),
        _ => builder.try_init(),
    };

    installed.map_err(|e| ProtocolError::Config(format!("Failed to install subscriber: {e}")))?;
    tracing::info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
