//! Error types shared by the client and its callers

use std::io;
use std::path::PathBuf;

use crate::game::Side;

/// The child program can no longer be talked to.
///
/// Returned by the convenience queries on [`crate::ProtocolClient`], which
/// swallow denials but never a dead process.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{side} program died")]
pub struct ProgramDied {
    pub side: Side,
}

/// A launch command line could not be turned into an argument vector.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("empty program command")]
    Empty,
    #[error("unterminated quote in command: {0}")]
    UnterminatedQuote(String),
}

/// Failure to set up a client before any protocol exchange happened.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    #[error("failed to create log file {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("child process for `{0}` was started without its standard pipes")]
    MissingPipes(String),
}
