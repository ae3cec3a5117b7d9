// Decision facade: legal moves -> threat elimination -> lookahead -> scoring -> selection

use log::debug;
use rand::Rng;

use crate::config::{ScoringConfig, SolveOptions};
use crate::error::SolveError;
use crate::grid::Candidate;
use crate::movegen::generate_moves;
use crate::scoring::{pick_move, rank, score_moves, Selection};
use crate::threat::{eliminate, lookahead, threat_set};
use crate::types::{Battlesnake, Board, GameState, RulesetKind};

/// A single turn's view of the game, borrowed from the decoded request
pub struct Solver<'a> {
    pub turn: i32,
    pub ruleset: RulesetKind,
    pub board: &'a Board,
    pub you: &'a Battlesnake,
}

/// What the solver decided, together with the ranked candidates behind it
#[derive(Debug, Clone)]
pub struct Decision {
    pub selection: Selection,
    pub ranked: Vec<Candidate>,
}

impl<'a> Solver<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Solver {
            turn: state.turn,
            ruleset: state.game.ruleset.kind(),
            board: &state.board,
            you: &state.you,
        }
    }

    /// Ranked surviving candidates, best first.
    ///
    /// With `use_single_best_option` only the best candidate is returned.
    pub fn next(
        &self,
        options: &SolveOptions,
        scoring: &ScoringConfig,
    ) -> Result<Vec<Candidate>, SolveError> {
        let moves = generate_moves(self.you, self.board, self.ruleset)?;

        let threats = threat_set(self.you, self.board, self.ruleset, options);
        let mut survivors = eliminate(moves, &threats);
        debug!(
            "Turn {}: {} moves left after threat elimination",
            self.turn,
            survivors.len()
        );

        if options.lookahead {
            survivors = lookahead(survivors, self.you, self.board, self.ruleset)?;
        }
        if survivors.is_empty() {
            return Err(SolveError::NoPossibleMove);
        }

        let mut ranked = score_moves(&survivors, self.you, self.board, options, scoring);
        rank(&mut ranked);
        if options.use_single_best_option {
            ranked.truncate(1);
        }
        Ok(ranked)
    }

    /// Runs the full pipeline and picks a direction. A direction is always
    /// produced; when nothing survives it is a random fallback and
    /// `selection.error` is set.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        options: &SolveOptions,
        scoring: &ScoringConfig,
        rng: &mut R,
    ) -> Decision {
        match self.next(options, scoring) {
            Ok(ranked) => Decision {
                selection: pick_move(&ranked, options, scoring, self.ruleset, rng),
                ranked,
            },
            Err(_) => Decision {
                selection: Selection::fallback(rng),
                ranked: Vec::new(),
            },
        }
    }
}
