//! Process-level plumbing shared by every NextStep binary: layered
//! configuration loading and tracing/log-file initialization.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section, ServerConfig};
