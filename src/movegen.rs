// Legal move generation for our own snake

use log::debug;

use crate::error::SolveError;
use crate::grid::Candidate;
use crate::snake::possible_moves;
use crate::types::{Battlesnake, Board, RulesetKind};

/// Legal single-step moves for `you`, ignoring other snakes.
/// `NoPossibleMove` is passed through untouched.
pub fn generate_moves(
    you: &Battlesnake,
    board: &Board,
    ruleset: RulesetKind,
) -> Result<Vec<Candidate>, SolveError> {
    let moves = possible_moves(you, board, ruleset).map_err(|e| {
        debug!("Snake {} has no legal moves from {:?}", you.id, you.head);
        e
    })?;
    debug!("Snake {} has {} legal moves", you.id, moves.len());
    Ok(moves)
}
