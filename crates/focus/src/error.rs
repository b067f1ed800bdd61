//! Focus engine errors
//!
//! Engine operations report misuse through their result structs; these
//! errors only cover the config, runtime and registry boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised around the focus engine
#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Invalid focus config: {0}")]
    InvalidConfig(String),

    #[error("Failed to read focus config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse focus config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Regeneration needs a running Tokio runtime")]
    NoRuntime,

    #[error("Focus session already exists: {0}")]
    SessionExists(String),

    #[error("Focus session not found: {0}")]
    SessionNotFound(String),
}

pub type Result<T> = std::result::Result<T, FocusError>;
