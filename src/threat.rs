// Opponent threat elimination and one-ply lookahead
//
// Both filters are deliberately shallow: threats are the cells other snakes
// occupy (and optionally could reach next turn), and lookahead only asks
// whether we would still have a legal move after taking a candidate. The
// lookahead does not re-run threat elimination.

use log::debug;
use std::collections::HashSet;

use crate::config::SolveOptions;
use crate::error::SolveError;
use crate::grid::Candidate;
use crate::snake::{is_valid, possible_moves, project};
use crate::types::{Battlesnake, Board, Coord, RulesetKind};

/// Cells our snake must not step onto this turn.
///
/// Contains every other snake's body, their possible next heads when
/// `consider_opponent_next_move` is set, and the hazards when `avoid_hazards`
/// is set. Opponents that are dead or cornered add no next-move cells.
pub fn threat_set(
    you: &Battlesnake,
    board: &Board,
    ruleset: RulesetKind,
    options: &SolveOptions,
) -> HashSet<Coord> {
    let mut threats = HashSet::new();

    for snake in board.snakes.iter().filter(|s| s.id != you.id) {
        threats.extend(snake.body.iter().copied());

        if !options.consider_opponent_next_move || snake.health <= 0 {
            continue;
        }
        match possible_moves(snake, board, ruleset) {
            Ok(moves) => threats.extend(moves.iter().map(|m| m.coord)),
            Err(_) => debug!("Opponent {} is cornered, ignoring its next move", snake.id),
        }
    }

    if options.avoid_hazards {
        threats.extend(board.hazards.iter().copied());
    }

    threats
}

/// Removes every candidate whose cell is in `threats`
pub fn eliminate(candidates: Vec<Candidate>, threats: &HashSet<Coord>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| !threats.contains(&c.coord))
        .collect()
}

/// Keeps only candidates after which `you` is still alive with a legal move.
pub fn lookahead(
    candidates: Vec<Candidate>,
    you: &Battlesnake,
    board: &Board,
    ruleset: RulesetKind,
) -> Result<Vec<Candidate>, SolveError> {
    let survivors: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| {
            let projected = project(you, c.coord, board);
            let ok = is_valid(&projected, board, ruleset);
            if !ok {
                debug!("Lookahead rejects {} to {:?}", c.direction, c.coord);
            }
            ok
        })
        .collect();

    if survivors.is_empty() {
        return Err(SolveError::NoPossibleMove);
    }
    Ok(survivors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn c(x: i32, y: i32) -> Coord {
        Coord { x, y }
    }

    fn board_with(snakes: Vec<Battlesnake>) -> Board {
        Board {
            width: 11,
            height: 11,
            food: vec![],
            snakes,
            hazards: vec![],
        }
    }

    fn options(next_move: bool) -> SolveOptions {
        SolveOptions {
            consider_opponent_next_move: next_move,
            ..SolveOptions::default()
        }
    }

    #[test]
    fn test_threat_set_contains_opponent_body_only() {
        let you = Battlesnake::new("me", 90, vec![c(0, 1), c(0, 0)]);
        let them = Battlesnake::new("them", 90, vec![c(1, 1), c(1, 0)]);
        let board = board_with(vec![you.clone(), them]);

        let threats = threat_set(&you, &board, RulesetKind::Standard, &options(false));
        let expected: HashSet<Coord> = [c(1, 1), c(1, 0)].into_iter().collect();
        assert_eq!(threats, expected);
    }

    #[test]
    fn test_threat_set_adds_opponent_next_moves() {
        let you = Battlesnake::new("me", 90, vec![c(0, 1), c(0, 0)]);
        let them = Battlesnake::new("them", 90, vec![c(1, 1), c(1, 0)]);
        let board = board_with(vec![you.clone(), them]);

        let threats = threat_set(&you, &board, RulesetKind::Standard, &options(true));
        for cell in [c(1, 1), c(1, 0), c(1, 2), c(0, 1), c(2, 1)] {
            assert!(threats.contains(&cell), "{:?} should be threatened", cell);
        }
        // Our own body is never a threat to ourselves
        assert!(!threats.contains(&c(0, 0)));
    }

    #[test]
    fn test_cornered_opponent_adds_no_next_moves() {
        let you = Battlesnake::new("me", 90, vec![c(5, 5)]);
        let them = Battlesnake::new("them", 90, vec![c(0, 0), c(0, 1), c(1, 1), c(1, 0)]);
        let board = board_with(vec![you.clone(), them]);

        let threats = threat_set(&you, &board, RulesetKind::Standard, &options(true));
        assert_eq!(threats.len(), 4);
    }

    #[test]
    fn test_dead_opponent_adds_no_next_moves() {
        let you = Battlesnake::new("me", 90, vec![c(5, 5)]);
        let them = Battlesnake::new("them", 0, vec![c(8, 8)]);
        let board = board_with(vec![you.clone(), them]);

        let threats = threat_set(&you, &board, RulesetKind::Standard, &options(true));
        let expected: HashSet<Coord> = [c(8, 8)].into_iter().collect();
        assert_eq!(threats, expected);
    }

    #[test]
    fn test_avoid_hazards_adds_hazard_cells() {
        let you = Battlesnake::new("me", 90, vec![c(5, 5)]);
        let mut board = board_with(vec![you.clone()]);
        board.hazards = vec![c(5, 6)];

        let mut opts = options(false);
        assert!(threat_set(&you, &board, RulesetKind::Standard, &opts).is_empty());
        opts.avoid_hazards = true;
        assert!(threat_set(&you, &board, RulesetKind::Standard, &opts).contains(&c(5, 6)));
    }

    #[test]
    fn test_eliminate_preserves_metadata() {
        let candidates = vec![
            Candidate::new(c(1, 1), Direction::Up).with_score(3.0),
            Candidate::new(c(2, 2), Direction::Right).with_score(1.0),
        ];
        let threats: HashSet<Coord> = [c(1, 1), c(3, 3)].into_iter().collect();

        let left = eliminate(candidates, &threats);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].coord, c(2, 2));
        assert_eq!(left[0].direction, Direction::Right);
        assert_eq!(left[0].score, Some(1.0));
    }

    #[test]
    fn test_lookahead_rejects_dead_end() {
        // Head at (1,0) moving along the bottom. Stepping left into the
        // corner (0,0) leaves no exit since (0,1) is body.
        let you = Battlesnake::new("me", 90, vec![c(1, 0), c(1, 1), c(0, 1), c(0, 2)]);
        let board = board_with(vec![you.clone()]);

        let candidates = vec![
            Candidate::new(c(0, 0), Direction::Left),
            Candidate::new(c(2, 0), Direction::Right),
        ];
        let survivors = lookahead(candidates, &you, &board, RulesetKind::Standard).unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].direction, Direction::Right);
    }

    #[test]
    fn test_lookahead_fails_when_everything_is_a_dead_end() {
        let you = Battlesnake::new("me", 90, vec![c(1, 0), c(1, 1), c(0, 1), c(0, 2)]);
        let board = board_with(vec![you.clone()]);

        let candidates = vec![Candidate::new(c(0, 0), Direction::Left)];
        assert_eq!(
            lookahead(candidates, &you, &board, RulesetKind::Standard).unwrap_err(),
            SolveError::NoPossibleMove
        );
    }

    #[test]
    fn test_lookahead_rejects_starvation() {
        let you = Battlesnake::new("me", 1, vec![c(5, 5)]);
        let board = board_with(vec![you.clone()]);

        let candidates = vec![Candidate::new(c(5, 6), Direction::Up)];
        assert!(lookahead(candidates, &you, &board, RulesetKind::Standard).is_err());
    }
}
