use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Faults raised while invoking a highlighter.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("cannot start highlighter '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("highlighter I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("highlighter closed its output")]
    Closed,

    #[error("malformed highlighter response: {0}")]
    Protocol(String),

    #[error("highlighter gave no answer within {0:?}")]
    Timeout(Duration),

    /// The highlighter itself reported a parse or runtime fault.
    #[error("highlighting '{language}' failed: {message}")]
    Rejected { language: String, message: String },
}

/// Faults discovering or reading fixture files.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot list fixture directory {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An expectation file with no source file next to it.
    #[error("expectation {} has no source file {}", expect.display(), source_file.display())]
    MissingSource { expect: PathBuf, source_file: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
