//! Logging initialization.
//!
//! Messages go to stdout by default. With `--log-file` they go to the file
//! instead (plain text, no ANSI), optionally mirrored to stdout with
//! `--log-to-stdout`. `RUST_LOG` overrides the CLI level when set.

use std::fs::{create_dir_all, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::PollError;

pub fn init(level: &str, log_file: Option<&Path>, log_to_stdout: bool) -> Result<(), PollError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    create_dir_all(dir)?;
                }
            }
            let file = Arc::new(File::create(path)?);
            let file_layer = fmt::layer().with_ansi(false).with_writer(file);
            if log_to_stdout {
                let _ = registry.with(file_layer).with(fmt::layer()).try_init();
            } else {
                let _ = registry.with(file_layer).try_init();
            }
        }
        None => {
            let _ = registry.with(fmt::layer()).try_init();
        }
    }
    Ok(())
}
