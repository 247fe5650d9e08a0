//! Openings the games start from
//!
//! An openings file holds one opening per line, moves separated by
//! whitespace:
//!
//! ```text
//! # 7x7 openings
//! a1
//! d4 swap-pieces
//! b2 f6
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum OpeningsError {
    #[error("failed to read openings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no openings found in {0}")]
    Empty(PathBuf),
}

/// Moves played for both sides before the programs take over
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub moves: Vec<String>,
}

impl Opening {
    /// Parse one line; blank lines and comments give `None`
    pub fn parse(line: &str) -> Option<Opening> {
        let content = line.split('#').next().unwrap_or_default();
        let moves: Vec<String> = content
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        if moves.is_empty() {
            None
        } else {
            Some(Opening { moves })
        }
    }
}

impl fmt::Display for Opening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.moves.join(" "))
    }
}

pub fn parse_openings(text: &str) -> Vec<Opening> {
    text.lines().filter_map(Opening::parse).collect()
}

/// Read an openings file. A file without any opening is an error.
pub fn load_openings(path: &Path) -> Result<Vec<Opening>, OpeningsError> {
    let text = std::fs::read_to_string(path).map_err(|source| OpeningsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let openings = parse_openings(&text);
    if openings.is_empty() {
        return Err(OpeningsError::Empty(path.to_path_buf()));
    }
    Ok(openings)
}

#[cfg(test)]
#[path = "openings_tests.rs"]
mod openings_tests;
