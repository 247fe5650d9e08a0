//! Game scheduling: which opening, which program plays black

use htp_client::Side;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::TournamentKind;
use crate::openings::Opening;

/// One game to be played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTicket {
    /// Position in the tournament, starting at 0
    pub index: usize,
    pub round: u32,
    pub opening: Opening,
    /// Program index (0 or 1) playing black
    pub black: usize,
}

impl GameTicket {
    /// Program index playing `side`
    pub fn program_for(&self, side: Side) -> usize {
        match side {
            Side::Black => self.black,
            Side::White => 1 - self.black,
        }
    }
}

/// Source of games for a tournament
pub trait Schedule {
    fn next(&mut self) -> Option<GameTicket>;

    /// Total number of games, if known up front
    fn expected_games(&self) -> Option<usize>;
}

/// Every round plays every opening twice, once with each program as black
pub struct IterativeSchedule {
    openings: Vec<Opening>,
    rounds: u32,
    cursor: usize,
}

impl IterativeSchedule {
    pub fn new(openings: Vec<Opening>, rounds: u32) -> Self {
        Self {
            openings,
            rounds,
            cursor: 0,
        }
    }

    fn games_per_round(&self) -> usize {
        self.openings.len() * 2
    }
}

impl Schedule for IterativeSchedule {
    fn next(&mut self) -> Option<GameTicket> {
        let per_round = self.games_per_round();
        if per_round == 0 || self.cursor >= per_round * self.rounds as usize {
            return None;
        }

        let index = self.cursor;
        self.cursor += 1;
        let within = index % per_round;
        Some(GameTicket {
            index,
            round: (index / per_round) as u32,
            opening: self.openings[within / 2].clone(),
            black: within % 2,
        })
    }

    fn expected_games(&self) -> Option<usize> {
        Some(self.games_per_round() * self.rounds as usize)
    }
}

/// One game per round with a random opening and random colors
pub struct RandomSchedule<R: Rng> {
    openings: Vec<Opening>,
    rounds: u32,
    played: u32,
    rng: R,
}

impl<R: Rng> RandomSchedule<R> {
    pub fn new(openings: Vec<Opening>, rounds: u32, rng: R) -> Self {
        Self {
            openings,
            rounds,
            played: 0,
            rng,
        }
    }
}

impl<R: Rng> Schedule for RandomSchedule<R> {
    fn next(&mut self) -> Option<GameTicket> {
        if self.played >= self.rounds {
            return None;
        }
        let opening = self.openings.choose(&mut self.rng)?.clone();
        let round = self.played;
        self.played += 1;
        Some(GameTicket {
            index: round as usize,
            round,
            opening,
            black: self.rng.gen_range(0..2),
        })
    }

    fn expected_games(&self) -> Option<usize> {
        Some(self.rounds as usize)
    }
}

/// Build the schedule for a tournament kind
pub fn schedule_for(kind: TournamentKind, openings: Vec<Opening>, rounds: u32) -> Box<dyn Schedule> {
    match kind {
        TournamentKind::Iterative => Box::new(IterativeSchedule::new(openings, rounds)),
        TournamentKind::Random => Box::new(RandomSchedule::new(openings, rounds, rand::thread_rng())),
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod schedule_tests;
