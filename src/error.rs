use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskburstError {
    /// SDL reports its failures as plain strings
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown hotkey key name: {0:?}")]
    UnknownKey(String),

    #[error("control socket: {0}")]
    Control(String),
}

impl From<String> for DeskburstError {
    fn from(message: String) -> Self {
        Self::Sdl(message)
    }
}

pub type Result<T> = std::result::Result<T, DeskburstError>;
