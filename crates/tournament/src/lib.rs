//! Tournament Runner for external Hex programs
//!
//! This crate provides infrastructure for:
//! - Playing games between two programs that speak HTP
//! - Scheduling games over a set of openings (iterative or random)
//! - Recording every game and summarizing the results
//!
//! # Usage
//!
//! ```bash
//! # Two rounds over all openings, both color assignments each
//! cargo run -p tournament -- --p1cmd "mohex --seed %SRAND" --p1name mohex \
//!     --p2cmd "random-bot" --p2name random \
//!     --openings openings/7x7.txt --dir results/run1 --rounds 2
//! ```

mod config;
mod elo;
mod match_runner;
mod openings;
mod results;
mod schedule;
mod tournament;

pub use config::*;
pub use elo::*;
pub use match_runner::*;
pub use openings::*;
pub use results::*;
pub use schedule::*;
pub use tournament::*;
