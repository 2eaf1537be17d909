//! Error types for G-code processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, analyzing or saving G-code.
#[derive(Error, Debug)]
pub enum GcodeError {
    /// Input path does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A non-comment line produced no tokens after comment stripping.
    #[error("malformed line {line}: {text:?}")]
    MalformedLine {
        /// Line number (1-indexed).
        line: usize,
        /// Raw line text.
        text: String,
    },

    /// Motion command with axis displacement but a zero feedrate.
    #[error("zero feedrate on motion command #{index}")]
    DivisionByZero {
        /// Position of the command in the sequence.
        index: usize,
    },

    /// Command constructed with an empty mnemonic.
    #[error("command mnemonic is empty")]
    EmptyMnemonic,

    /// Invalid settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be decoded.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl GcodeError {
    /// Create a malformed-line error.
    pub fn malformed(line: usize, text: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            text: text.into(),
        }
    }
}

/// Result type for G-code operations.
pub type Result<T> = std::result::Result<T, GcodeError>;
