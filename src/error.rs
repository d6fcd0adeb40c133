//! Error types for spell-it

use std::io;
use thiserror::Error;

/// Main error type for spell-it
#[derive(Error, Debug)]
pub enum SpellError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    /// The platform offers no speech synthesis at all
    #[error("Speech synthesis is not supported on this platform")]
    Unsupported,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for spell-it operations
pub type Result<T> = std::result::Result<T, SpellError>;
