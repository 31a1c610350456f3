#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging utilities for the converter.
//!
//! Thin helpers over `tracing` so every crate reports progress the same way:
//! a `module` field naming the component and a plain message. Output goes to
//! stderr; stdout stays free for documents the CLI prints.

use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LEVEL: &str = "info";

/// Install the global stderr subscriber.
///
/// `RUST_LOG` wins over `level` when set. Returns `false` if a subscriber was
/// already installed, in which case nothing changes.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Emits a trace message with module prefix.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(module, "{}", msg);
}

/// Emits a debug message with module prefix.
pub fn debug(module: &str, msg: &str) {
    tracing::debug!(module, "{}", msg);
}

/// Emits an info message with module prefix.
pub fn info(module: &str, msg: &str) {
    tracing::info!(module, "{}", msg);
}

/// Emits a warning with module prefix.
pub fn warn(module: &str, msg: &str) {
    tracing::warn!(module, "{}", msg);
}

/// Announces a pipeline stage before its work starts.
///
/// The last `stage` line in the log identifies where a failed run stopped.
pub fn stage(stage: &str, msg: &str) {
    tracing::info!(stage, "{}", msg);
}
