// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuilaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("could not start '{}': {source}", executable.display())]
    SpawnFailed {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("forwarding stdin to the child failed: {0}")]
    StdinFailed(#[source] std::io::Error),

    #[error("virtual display error: {0}")]
    DisplayFailed(String),

    /// Any launch failure surfaced by the retry orchestrator.
    #[error("An unexpected error occurred while launching the application: {0}")]
    Unexpected(#[source] Box<GuilaunchError>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GuilaunchError {
    /// Wrap an error into [`GuilaunchError::Unexpected`], leaving already
    /// wrapped errors alone.
    pub fn unexpected(self) -> Self {
        match self {
            err @ GuilaunchError::Unexpected(_) => err,
            other => GuilaunchError::Unexpected(Box::new(other)),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GuilaunchError>;
