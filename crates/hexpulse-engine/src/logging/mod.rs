//! Logging setup.
//!
//! Thin wrapper around `env_logger` so binaries initialize logging the
//! same way.

mod init;

pub use init::{init_logging, LoggingConfig};
