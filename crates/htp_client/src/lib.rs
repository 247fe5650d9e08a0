//! HTP client for external Hex programs
//!
//! This crate provides the pieces a tournament driver needs to talk to a
//! Hex-playing program over its standard streams:
//! - [`ProtocolClient`]: owns one child process and runs the command protocol
//! - [`Reply`]: the three possible outcomes of a command (ok, denied, died)
//! - [`LaunchCommand`]: argv construction with `%SRAND` seed substitution
//! - [`GameRecord`]: the moves, result and timing of one played game
//!
//! # Protocol
//!
//! Requests are single lines. Responses are one or more lines terminated by
//! a blank line; a first line starting with `=` is a success, anything else
//! is a denial.
//!
//! ```text
//! > genmove black
//! < = e5
//! <
//! ```

mod client;
mod error;
mod game;
mod launch;
mod log;
mod reply;

pub use client::*;
pub use error::*;
pub use game::*;
pub use launch::*;
pub use log::ProtocolLog;
pub use reply::*;
