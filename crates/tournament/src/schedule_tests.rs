use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn openings(names: &[&str]) -> Vec<Opening> {
    names.iter().filter_map(|line| Opening::parse(line)).collect()
}

fn drain(schedule: &mut dyn Schedule) -> Vec<GameTicket> {
    std::iter::from_fn(|| schedule.next()).collect()
}

#[test]
fn test_iterative_plays_each_opening_with_both_colors() {
    let mut schedule = IterativeSchedule::new(openings(&["a1", "b2"]), 2);
    assert_eq!(schedule.expected_games(), Some(8));

    let tickets = drain(&mut schedule);
    assert_eq!(tickets.len(), 8);

    let summary: Vec<(u32, String, usize)> = tickets
        .iter()
        .map(|t| (t.round, t.opening.to_string(), t.black))
        .collect();
    assert_eq!(
        summary[..4],
        [
            (0, "a1".to_string(), 0),
            (0, "a1".to_string(), 1),
            (0, "b2".to_string(), 0),
            (0, "b2".to_string(), 1),
        ]
    );
    assert!(tickets[4..].iter().all(|t| t.round == 1));

    let indices: Vec<usize> = tickets.iter().map(|t| t.index).collect();
    assert_eq!(indices, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_iterative_without_openings_is_empty() {
    let mut schedule = IterativeSchedule::new(Vec::new(), 3);
    assert!(schedule.next().is_none());
}

#[test]
fn test_random_plays_one_game_per_round() {
    let pool = openings(&["a1", "b2", "c3"]);
    let mut schedule = RandomSchedule::new(pool.clone(), 5, StdRng::seed_from_u64(7));
    assert_eq!(schedule.expected_games(), Some(5));

    let tickets = drain(&mut schedule);
    assert_eq!(tickets.len(), 5);
    for (i, ticket) in tickets.iter().enumerate() {
        assert_eq!(ticket.index, i);
        assert_eq!(ticket.round, i as u32);
        assert!(pool.contains(&ticket.opening));
        assert!(ticket.black < 2);
    }
}

#[test]
fn test_program_for_side() {
    let ticket = GameTicket {
        index: 0,
        round: 0,
        opening: Opening::default(),
        black: 1,
    };
    assert_eq!(ticket.program_for(Side::Black), 1);
    assert_eq!(ticket.program_for(Side::White), 0);
}

#[test]
fn test_schedule_for_kind() {
    let schedule = schedule_for(TournamentKind::Iterative, openings(&["a1"]), 3);
    assert_eq!(schedule.expected_games(), Some(6));

    let schedule = schedule_for(TournamentKind::Random, openings(&["a1"]), 3);
    assert_eq!(schedule.expected_games(), Some(3));
}
