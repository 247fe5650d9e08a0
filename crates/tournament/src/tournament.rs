//! Running a whole tournament

use std::io;
use std::path::PathBuf;
use tracing::info;

use htp_client::{Side, SpawnError};

use crate::config::{ConfigError, TournamentConfig};
use crate::match_runner::GameRunner;
use crate::openings::{load_openings, OpeningsError};
use crate::results::{GameEntry, ResultsError, TournamentResults};
use crate::schedule::schedule_for;

pub const RESULTS_FILE: &str = "results.json";
pub const REPORT_FILE: &str = "report.txt";

/// Errors that stop a tournament
#[derive(thiserror::Error, Debug)]
pub enum TournamentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Openings(#[from] OpeningsError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error(transparent)]
    Results(#[from] ResultsError),
    #[error("failed to create results directory {path}: {source}")]
    ResultsDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Play every scheduled game and persist the results.
///
/// Results are rewritten after each game so an interrupted tournament
/// keeps what it has played so far.
pub fn run_tournament(config: &TournamentConfig) -> Result<TournamentResults, TournamentError> {
    config.validate()?;
    let openings = load_openings(&config.openings)?;
    let runner = GameRunner::new(config)?;

    std::fs::create_dir_all(&config.results_dir).map_err(|source| {
        TournamentError::ResultsDir {
            path: config.results_dir.clone(),
            source,
        }
    })?;
    let results_path = config.results_dir.join(RESULTS_FILE);

    let mut schedule = schedule_for(config.kind, openings, config.rounds);
    let total = schedule.expected_games().unwrap_or_default();
    let mut results = TournamentResults::new(config);
    info!(
        kind = %config.kind,
        games = total,
        board_size = config.board_size,
        "starting tournament: {}",
        results.name
    );

    while let Some(ticket) = schedule.next() {
        let black = &config.program(ticket.program_for(Side::Black)).name;
        let white = &config.program(ticket.program_for(Side::White)).name;
        info!(game = ticket.index, round = ticket.round, opening = %ticket.opening, %black, %white, "starting game");

        let game = runner.play(&ticket)?;
        let entry = GameEntry::new(&ticket, config, &game);

        println!(
            "Game {}/{}: {} (B) vs {} (W) - {} in {} moves{}",
            ticket.index + 1,
            total,
            entry.black,
            entry.white,
            entry.result,
            entry.length,
            entry
                .error
                .as_ref()
                .map(|e| format!(" [{}]", e))
                .unwrap_or_default()
        );

        results.add_game(entry);
        results.save(&results_path)?;
    }

    let report_path = config.results_dir.join(REPORT_FILE);
    std::fs::write(&report_path, results.generate_report()).map_err(|source| {
        TournamentError::Report {
            path: report_path.clone(),
            source,
        }
    })?;
    info!(games = results.games.len(), results = %results_path.display(), "tournament finished");

    Ok(results)
}
