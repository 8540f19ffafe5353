//! Core application functionality
//!
//! - CLI parsing and validation
//! - Project configuration
//! - Error types
//! - Process entry helpers

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;

pub use cli::CliArgs;
pub use config_file::{ConfigFile, PipelineConfig};
pub use errors::{ConfigError, FileContext, ForgeResult};
pub use runner::run_app;
