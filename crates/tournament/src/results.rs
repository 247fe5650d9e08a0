//! Tournament results storage and reporting

use htp_client::Side;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::config::{TournamentConfig, TournamentKind};
use crate::elo::{elo_difference, MatchResult};
use crate::match_runner::PlayedGame;
use crate::schedule::GameTicket;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Complete tournament results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResults {
    /// Name/description of the tournament
    pub name: String,
    /// Display names of program 1 and program 2
    pub participants: [String; 2],
    /// All games in the order they were played
    pub games: Vec<GameEntry>,
    /// Settings used
    pub settings: ResultsSettings,
}

/// One row of the results table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEntry {
    pub index: usize,
    pub round: u32,
    pub opening: String,
    /// Display name of the program playing black
    pub black: String,
    pub white: String,
    /// Color played by program 1
    pub program1_side: Side,
    /// What the programs called themselves
    pub black_program: String,
    pub white_program: String,
    pub result: String,
    pub winner: Option<Side>,
    pub length: usize,
    pub played_swap: bool,
    pub elapsed_black: f64,
    pub elapsed_white: f64,
    pub time_left_black: String,
    pub time_left_white: String,
    pub moves: Vec<String>,
    /// Why the game ended early, if it did
    pub error: Option<String>,
}

/// Tournament settings recorded next to the results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsSettings {
    pub board_size: u32,
    pub rounds: u32,
    pub kind: TournamentKind,
    pub openings: String,
    pub commands: [String; 2],
}

/// One program's results split by color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramSummary {
    pub name: String,
    pub as_black: MatchResult,
    pub as_white: MatchResult,
}

impl ProgramSummary {
    pub fn total(&self) -> MatchResult {
        let mut total = self.as_black;
        total.add(&self.as_white);
        total
    }
}

/// Winner named by a result string such as `B+` or `W+Resign`
pub fn winner_from_result(result: &str) -> Option<Side> {
    let mut chars = result.trim().chars();
    let side = match chars.next()?.to_ascii_uppercase() {
        'B' => Side::Black,
        'W' => Side::White,
        _ => return None,
    };
    (chars.next() == Some('+')).then_some(side)
}

impl GameEntry {
    pub fn new(ticket: &GameTicket, config: &TournamentConfig, game: &PlayedGame) -> Self {
        let record = &game.record;
        let name = |side: Side| config.program(ticket.program_for(side)).name.clone();
        Self {
            index: ticket.index,
            round: ticket.round,
            opening: ticket.opening.to_string(),
            black: name(Side::Black),
            white: name(Side::White),
            program1_side: if ticket.black == 0 { Side::Black } else { Side::White },
            black_program: game.black.program_name.clone(),
            white_program: game.white.program_name.clone(),
            result: record.result().to_string(),
            winner: winner_from_result(record.result()),
            length: record.len(),
            played_swap: record.played_swap(),
            elapsed_black: record.elapsed(Side::Black).as_secs_f64(),
            elapsed_white: record.elapsed(Side::White).as_secs_f64(),
            time_left_black: game.black.time_left.clone(),
            time_left_white: game.white.time_left.clone(),
            moves: record.moves().to_vec(),
            error: game.error.as_ref().map(ToString::to_string),
        }
    }

    /// Display name of the winning program
    pub fn winner_name(&self) -> Option<&str> {
        match self.winner? {
            Side::Black => Some(self.black.as_str()),
            Side::White => Some(self.white.as_str()),
        }
    }
}

impl TournamentResults {
    pub fn new(config: &TournamentConfig) -> Self {
        Self {
            name: format!("{} vs {}", config.program1.name, config.program2.name),
            participants: [config.program1.name.clone(), config.program2.name.clone()],
            games: Vec::new(),
            settings: ResultsSettings {
                board_size: config.board_size,
                rounds: config.rounds,
                kind: config.kind,
                openings: config.openings.display().to_string(),
                commands: [config.program1.command.clone(), config.program2.command.clone()],
            },
        }
    }

    pub fn add_game(&mut self, entry: GameEntry) {
        self.games.push(entry);
    }

    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ResultsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ResultsError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> Result<Self, ResultsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ResultsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Per-program results, program 1 first
    pub fn summary(&self) -> [ProgramSummary; 2] {
        let mut summary = self.participants.clone().map(|name| ProgramSummary {
            name,
            ..Default::default()
        });

        for game in &self.games {
            for side in Side::BOTH {
                let program = if side == game.program1_side { 0 } else { 1 };
                let entry = &mut summary[program];
                let tally = match side {
                    Side::Black => &mut entry.as_black,
                    Side::White => &mut entry.as_white,
                };
                match game.winner {
                    Some(winner) if winner == side => tally.wins += 1,
                    Some(_) => tally.losses += 1,
                    None => tally.unknown += 1,
                }
            }
        }
        summary
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.name));
        report.push_str(&format!(
            "Config: {}x{} board, {} round(s), {} schedule, openings from {}\n\n",
            self.settings.board_size,
            self.settings.board_size,
            self.settings.rounds,
            self.settings.kind,
            self.settings.openings
        ));

        report.push_str("Games:\n");
        report.push_str(&format!(
            "{:>5} {:<16} {:<16} {:<10} {:>6} {:<12}\n",
            "Game", "Black", "White", "Result", "Moves", "Opening"
        ));
        report.push_str(&"-".repeat(70));
        report.push('\n');
        for game in &self.games {
            report.push_str(&format!(
                "{:>5} {:<16} {:<16} {:<10} {:>6} {:<12}",
                game.index, game.black, game.white, game.result, game.length, game.opening
            ));
            if let Some(error) = &game.error {
                report.push_str(&format!("  ({})", error));
            }
            report.push('\n');
        }

        report.push_str("\nSummary:\n");
        report.push_str(&format!(
            "{:<20} {:>11} {:>11} {:>11} {:>7} {:>7}\n",
            "Program", "Black W-L-?", "White W-L-?", "Total W-L-?", "Score", "Elo"
        ));
        report.push_str(&"-".repeat(72));
        report.push('\n');
        for program in self.summary() {
            let total = program.total();
            report.push_str(&format!(
                "{:<20} {:>11} {:>11} {:>11} {:>6.1}% {:>+7.0}\n",
                program.name,
                tally(&program.as_black),
                tally(&program.as_white),
                tally(&total),
                total.score() * 100.0,
                elo_difference(total.score())
            ));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

fn tally(result: &MatchResult) -> String {
    format!("{}-{}-{}", result.wins, result.losses, result.unknown)
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
