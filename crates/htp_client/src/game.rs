//! Record of a single played game

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Move token that means the second player took over the first move.
pub const SWAP_MOVE: &str = "swap-pieces";

/// Placeholder for results and answers that are not known.
pub const UNKNOWN: &str = "?";

/// One of the two players. Black moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Black, Side::White];

    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Side to move after `moves_played` moves.
    pub fn to_move(moves_played: usize) -> Side {
        if moves_played % 2 == 0 {
            Side::Black
        } else {
            Side::White
        }
    }

    /// Short tag used when echoing protocol traffic to the console
    pub fn tag(self) -> char {
        match self {
            Side::Black => 'B',
            Side::White => 'W',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Black => "black",
            Side::White => "white",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Side::Black),
            "white" | "w" => Ok(Side::White),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

/// Moves, result and per-side thinking time of one game.
///
/// Moves are stored as the programs sent them; nothing here knows whether
/// a move is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    moves: Vec<String>,
    result: String,
    elapsed_black: Duration,
    elapsed_white: Duration,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRecord {
    pub fn new() -> Self {
        Self {
            moves: Vec::new(),
            result: UNKNOWN.to_string(),
            elapsed_black: Duration::ZERO,
            elapsed_white: Duration::ZERO,
        }
    }

    pub fn append_move(&mut self, token: impl Into<String>) {
        self.moves.push(token.into());
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<&str> {
        self.moves.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// True if the second move of the game was a swap.
    pub fn played_swap(&self) -> bool {
        self.moves.get(1).is_some_and(|mv| mv == SWAP_MOVE)
    }

    pub fn set_result(&mut self, result: impl Into<String>) {
        self.result = result.into();
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn set_elapsed(&mut self, side: Side, elapsed: Duration) {
        match side {
            Side::Black => self.elapsed_black = elapsed,
            Side::White => self.elapsed_white = elapsed,
        }
    }

    pub fn elapsed(&self, side: Side) -> Duration {
        match side {
            Side::Black => self.elapsed_black,
            Side::White => self.elapsed_white,
        }
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
