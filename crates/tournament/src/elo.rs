//! Score bookkeeping and Elo estimates

use serde::{Deserialize, Serialize};

/// Largest Elo difference reported for a one-sided result
pub const MAX_ELO_DIFFERENCE: f64 = 800.0;

/// Results of a series of games from one program's perspective.
///
/// Hex has no draws; games without a known winner (aborted, or the programs
/// would not report a score) are counted as `unknown` and left out of the
/// score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub wins: u32,
    pub losses: u32,
    pub unknown: u32,
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.unknown
    }

    pub fn decided_games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Fraction of decided games won, 0.5 when nothing was decided
    pub fn score(&self) -> f64 {
        let decided = self.decided_games() as f64;
        if decided == 0.0 {
            return 0.5;
        }
        self.wins as f64 / decided
    }

    pub fn add(&mut self, other: &MatchResult) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.unknown += other.unknown;
    }
}

/// Rating difference implied by a score, clamped to ±`MAX_ELO_DIFFERENCE`
pub fn elo_difference(score: f64) -> f64 {
    if score <= 0.0 {
        return -MAX_ELO_DIFFERENCE;
    }
    if score >= 1.0 {
        return MAX_ELO_DIFFERENCE;
    }
    (-400.0 * (1.0 / score - 1.0).log10()).clamp(-MAX_ELO_DIFFERENCE, MAX_ELO_DIFFERENCE)
}

#[cfg(test)]
#[path = "elo_tests.rs"]
mod elo_tests;
