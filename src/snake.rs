// Snake state: move enumeration, one-step projection and validity
//
// Everything here works on borrowed snapshots and returns new values; the
// caller's snake and board are never modified.

use crate::error::SolveError;
use crate::grid::Candidate;
use crate::types::{
    Battlesnake, Board, Coord, Direction, RulesetKind, HAZARD_DAMAGE_PER_TURN, MAX_HEALTH,
};

/// Returns every cell the snake's head can step onto this turn.
///
/// Each direction is projected from the head, wrapped (wrapped ruleset) or
/// rejected when it leaves the board, and rejected when it lands on the
/// snake's own body as it is now, before moving. Hazards are not rejected;
/// they are a scoring concern.
pub fn possible_moves(
    snake: &Battlesnake,
    board: &Board,
    ruleset: RulesetKind,
) -> Result<Vec<Candidate>, SolveError> {
    let head = head_of(snake);

    let moves: Vec<Candidate> = Direction::all()
        .iter()
        .filter_map(|&dir| {
            let mut candidate = head.project(dir);

            if !candidate.coord.within_bounds(board) {
                if !ruleset.wraps() {
                    return None;
                }
                candidate.coord = candidate.coord.wrap_for_board(board);
            }

            if snake.body.contains(&candidate.coord) {
                return None;
            }

            Some(candidate)
        })
        .collect();

    if moves.is_empty() {
        return Err(SolveError::NoPossibleMove);
    }
    Ok(moves)
}

/// Simulates the snake moving onto `target`.
///
/// Health drops by one per turn. Eating restores full health and keeps the
/// tail (the snake grows); otherwise the tail segment is dropped. Ending on a
/// hazard costs an extra `HAZARD_DAMAGE_PER_TURN`.
pub fn project(snake: &Battlesnake, target: Coord, board: &Board) -> Battlesnake {
    let mut body = Vec::with_capacity(snake.body.len() + 1);
    body.push(target);
    body.extend_from_slice(&snake.body);

    let mut health = snake.health - 1;
    if board.has_food(&target) {
        health = MAX_HEALTH;
    } else {
        body.pop();
    }
    if board.is_hazard(&target) {
        health -= HAZARD_DAMAGE_PER_TURN;
    }

    Battlesnake {
        head: target,
        length: body.len() as i32,
        body,
        health,
        ..snake.clone()
    }
}

/// A snake is valid if it is alive and has somewhere to go
pub fn is_valid(snake: &Battlesnake, board: &Board, ruleset: RulesetKind) -> bool {
    snake.health > 0 && possible_moves(snake, board, ruleset).is_ok()
}

fn head_of(snake: &Battlesnake) -> Coord {
    snake.body.first().copied().unwrap_or(snake.head)
}
