//! Tournament configuration
//!
//! A configuration can be read from a TOML file and is then overridden by
//! command line options. Nothing in the game runner cares where a value
//! came from; it only sees a validated [`TournamentConfig`].
//!
//! ```toml
//! board_size = 11
//! rounds = 4
//! results_dir = "results/mohex-vs-random"
//! openings = "openings/11x11.txt"
//! kind = "iterative"
//!
//! [program1]
//! name = "mohex"
//! command = "mohex --seed %SRAND"
//!
//! [program2]
//! name = "random"
//! command = "random-bot"
//! ```

use htp_client::{LaunchCommand, LaunchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_BOARD_SIZE: u32 = 7;

/// Errors in the tournament configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing required settings: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("board size must be at least 1")]
    InvalidBoardSize,
    #[error("number of rounds must be at least 1")]
    InvalidRounds,
    #[error("unknown tournament type: {0} (expected 'iterative' or 'random')")]
    UnknownKind(String),
    #[error("bad command for {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: LaunchError,
    },
}

/// One of the two competing programs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramSpec {
    /// Display name used in logs and reports
    pub name: String,
    /// Command line; `%SRAND` is replaced by a random seed per game
    pub command: String,
}

/// How games are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentKind {
    /// Every opening, both color assignments, every round
    #[default]
    Iterative,
    /// One game per round with a random opening and random colors
    Random,
}

impl FromStr for TournamentKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iterative" => Ok(TournamentKind::Iterative),
            "random" => Ok(TournamentKind::Random),
            other => Err(ConfigError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for TournamentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentKind::Iterative => f.write_str("iterative"),
            TournamentKind::Random => f.write_str("random"),
        }
    }
}

/// Everything needed to run a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub program1: ProgramSpec,
    pub program2: ProgramSpec,
    pub board_size: u32,
    pub rounds: u32,
    /// Directory for transcripts, results and report
    pub results_dir: PathBuf,
    /// File with one opening per line
    pub openings: PathBuf,
    pub kind: TournamentKind,
    /// Echo protocol traffic and show the board after every move
    pub verbose: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            program1: ProgramSpec::default(),
            program2: ProgramSpec::default(),
            board_size: DEFAULT_BOARD_SIZE,
            rounds: 1,
            results_dir: PathBuf::new(),
            openings: PathBuf::new(),
            kind: TournamentKind::default(),
            verbose: false,
        }
    }
}

impl TournamentConfig {
    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check that every required setting is present and sane.
    ///
    /// All missing settings are reported at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.program1.command.trim().is_empty() {
            missing.push("program 1 command");
        }
        if self.program1.name.trim().is_empty() {
            missing.push("program 1 name");
        }
        if self.program2.command.trim().is_empty() {
            missing.push("program 2 command");
        }
        if self.program2.name.trim().is_empty() {
            missing.push("program 2 name");
        }
        if self.openings.as_os_str().is_empty() {
            missing.push("openings file");
        }
        if self.results_dir.as_os_str().is_empty() {
            missing.push("results directory");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        if self.board_size == 0 {
            return Err(ConfigError::InvalidBoardSize);
        }
        if self.rounds == 0 {
            return Err(ConfigError::InvalidRounds);
        }
        Ok(())
    }

    /// Program by index, 0 for program 1 and 1 for program 2
    pub fn program(&self, index: usize) -> &ProgramSpec {
        if index == 0 {
            &self.program1
        } else {
            &self.program2
        }
    }

    /// Parsed launch commands for both programs
    pub fn launch_commands(&self) -> Result<[LaunchCommand; 2], ConfigError> {
        let parse = |spec: &ProgramSpec| {
            LaunchCommand::parse(&spec.command).map_err(|source| ConfigError::Launch {
                program: spec.name.clone(),
                source,
            })
        };
        Ok([parse(&self.program1)?, parse(&self.program2)?])
    }

    /// Games are cut off after every cell is filled, plus one move for a swap
    pub fn max_moves(&self) -> usize {
        let size = self.board_size as usize;
        size * size + 1
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
