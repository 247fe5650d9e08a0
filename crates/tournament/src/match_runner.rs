//! Game runner for playing one game between two programs

use htp_client::{
    GameRecord, LaunchCommand, ProgramDied, ProtocolClient, Reply, Side, SpawnError, UNKNOWN,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, TournamentConfig};
use crate::schedule::GameTicket;

/// Move token a program sends when it gives up
pub const RESIGN: &str = "resign";

/// Reasons a game ends early
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{0} program died")]
    Died(Side),
    #[error("{side} program refused `{command}`: {reason}")]
    Denied {
        side: Side,
        command: String,
        reason: String,
    },
}

impl From<ProgramDied> for GameError {
    fn from(e: ProgramDied) -> Self {
        GameError::Died(e.side)
    }
}

/// What each side reported about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideReport {
    /// Answer to `name` and `version`
    pub program_name: String,
    /// Answer to `time_left` after the game
    pub time_left: String,
}

impl Default for SideReport {
    fn default() -> Self {
        Self {
            program_name: UNKNOWN.to_string(),
            time_left: UNKNOWN.to_string(),
        }
    }
}

/// A finished (or aborted) game
#[derive(Debug, Clone, Default)]
pub struct PlayedGame {
    pub record: GameRecord,
    pub black: SideReport,
    pub white: SideReport,
    /// Set when the game was cut short
    pub error: Option<GameError>,
}

impl PlayedGame {
    pub fn report(&self, side: Side) -> &SideReport {
        match side {
            Side::Black => &self.black,
            Side::White => &self.white,
        }
    }

    fn report_mut(&mut self, side: Side) -> &mut SideReport {
        match side {
            Side::Black => &mut self.black,
            Side::White => &mut self.white,
        }
    }
}

/// Both clients of a game, addressed by side
struct Players {
    black: ProtocolClient,
    white: ProtocolClient,
}

impl Players {
    fn get(&mut self, side: Side) -> &mut ProtocolClient {
        match side {
            Side::Black => &mut self.black,
            Side::White => &mut self.white,
        }
    }

    /// Send a command to both programs, black first
    fn broadcast(&mut self, command: &str) -> Result<(), GameError> {
        for side in Side::BOTH {
            expect_ok(self.get(side), command)?;
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.black.shutdown();
        self.white.shutdown();
    }
}

/// Plays games between the two configured programs.
///
/// Every game gets fresh processes; nothing is carried over between games.
pub struct GameRunner {
    launches: [LaunchCommand; 2],
    board_size: u32,
    max_moves: usize,
    results_dir: PathBuf,
    verbose: bool,
}

impl GameRunner {
    pub fn new(config: &TournamentConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            launches: config.launch_commands()?,
            board_size: config.board_size,
            max_moves: config.max_moves(),
            results_dir: config.results_dir.clone(),
            verbose: config.verbose,
        })
    }

    /// Transcript path for one side of one game
    pub fn log_path(&self, ticket: &GameTicket, side: Side) -> PathBuf {
        self.results_dir
            .join(format!("game-{:04}-{}.log", ticket.index, side))
    }

    /// Play one game.
    ///
    /// Only a failure to start a program is an error; a program dying or
    /// refusing a command mid-game ends that game and is recorded in
    /// [`PlayedGame::error`].
    pub fn play(&self, ticket: &GameTicket) -> Result<PlayedGame, SpawnError> {
        let mut players = Players {
            black: self.open(ticket, Side::Black)?,
            white: self.open(ticket, Side::White)?,
        };

        let mut game = PlayedGame::default();
        if let Err(e) = self.run(&mut players, ticket, &mut game) {
            warn!(game = ticket.index, error = %e, "game aborted");
            game.error = Some(e);
        }
        players.shutdown();
        Ok(game)
    }

    fn open(&self, ticket: &GameTicket, side: Side) -> Result<ProtocolClient, SpawnError> {
        let launch = &self.launches[ticket.program_for(side)];
        ProtocolClient::open(launch, &self.log_path(ticket, side), side, self.verbose)
    }

    fn run(
        &self,
        players: &mut Players,
        ticket: &GameTicket,
        game: &mut PlayedGame,
    ) -> Result<(), GameError> {
        for side in Side::BOTH {
            game.report_mut(side).program_name = players.get(side).name()?;
        }

        players.broadcast(&format!("boardsize {0} {0}", self.board_size))?;

        for mv in &ticket.opening.moves {
            let side = Side::to_move(game.record.len());
            players.broadcast(&format!("play {} {}", side, mv))?;
            game.record.append_move(mv.as_str());
        }
        self.show_board(players)?;

        loop {
            if game.record.len() >= self.max_moves {
                info!(game = ticket.index, moves = game.record.len(), "move limit reached");
                break;
            }

            let side = Side::to_move(game.record.len());
            let started = Instant::now();
            let answer = expect_ok(players.get(side), &format!("genmove {}", side));
            let elapsed = game.record.elapsed(side) + started.elapsed();
            game.record.set_elapsed(side, elapsed);

            let mv = answer?.trim().to_ascii_lowercase();
            debug!(game = ticket.index, %side, %mv, "move");
            game.record.append_move(mv.as_str());
            if mv == RESIGN {
                break;
            }

            expect_ok(players.get(side.opponent()), &format!("play {} {}", side, mv))?;
            self.show_board(players)?;
        }

        let result = self.final_result(players, &game.record)?;
        game.record.set_result(result);

        for side in Side::BOTH {
            game.report_mut(side).time_left = players.get(side).time_remaining()?;
        }
        Ok(())
    }

    /// Black's score, else white's, else derived from a resignation
    fn final_result(&self, players: &mut Players, record: &GameRecord) -> Result<String, GameError> {
        let mut result = players.get(Side::Black).final_score()?;
        if result == UNKNOWN {
            result = players.get(Side::White).final_score()?;
        }
        if result == UNKNOWN && record.last_move() == Some(RESIGN) {
            let resigned = Side::to_move(record.len() - 1);
            result = format!("{}+Resign", resigned.opponent().tag());
        }
        Ok(result)
    }

    fn show_board(&self, players: &mut Players) -> Result<(), GameError> {
        if !self.verbose {
            return Ok(());
        }
        match players.get(Side::Black).send_command("showboard") {
            Reply::Ok(board) => println!("{}", board),
            // Not every program can draw a board
            Reply::Denied(_) => {}
            Reply::Died => return Err(GameError::Died(Side::Black)),
        }
        Ok(())
    }
}

fn expect_ok(client: &mut ProtocolClient, command: &str) -> Result<String, GameError> {
    match client.send_command(command) {
        Reply::Ok(payload) => Ok(payload),
        Reply::Denied(reason) => Err(GameError::Denied {
            side: client.side(),
            command: command.to_string(),
            reason,
        }),
        Reply::Died => Err(GameError::Died(client.side())),
    }
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
