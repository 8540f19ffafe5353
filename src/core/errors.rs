//! Error types and context helpers
//!
//! Most of the crate propagates `anyhow::Error`. The typed errors below are
//! the ones callers (and tests) match on.

use anyhow::Context;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

pub type ForgeResult<T> = anyhow::Result<T>;

/// A resolved configuration that cannot drive a run
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("font name must not be empty")]
    EmptyFontName,
    #[error("font name '{0}' may only contain ASCII letters, digits, '-' and '_'")]
    InvalidFontName(String),
    #[error("source pattern must not be empty")]
    EmptySourcePattern,
    #[error("font height must be between 16 and 16384 units, got {0}")]
    InvalidFontHeight(f64),
    #[error("descent must be between 0 and the font height, got {0}")]
    InvalidDescent(f64),
    #[error("no font formats requested")]
    NoFormats,
    #[error("start codepoint U+{0:04X} is not a valid Unicode scalar value")]
    InvalidStartCodepoint(u32),
}

/// Adds "failed to <operation> <path>" context to fallible file operations
pub trait FileContext<T> {
    fn with_file_context(self, operation: &str, path: &Path) -> ForgeResult<T>;
}

impl<T, E> FileContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context(self, operation: &str, path: &Path) -> ForgeResult<T> {
        self.with_context(|| format!("failed to {operation} {}", path.display()))
    }
}

/// Render an error and its causes on one line, outermost first
pub fn error_chain(error: &anyhow::Error) -> String {
    error
        .chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

/// Wrap a displayable error from a library that does not implement `std::error::Error`
pub fn display_error(error: impl Display) -> anyhow::Error {
    anyhow::anyhow!("{error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_context_names_operation_and_path() {
        let path = PathBuf::from("/definitely/not/here.svg");
        let err = std::fs::read_to_string(&path)
            .with_file_context("read", &path)
            .unwrap_err();
        let rendered = error_chain(&err);
        assert!(rendered.starts_with("failed to read /definitely/not/here.svg"));
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::InvalidStartCodepoint(0xD800).to_string(),
            "start codepoint U+D800 is not a valid Unicode scalar value"
        );
    }
}
