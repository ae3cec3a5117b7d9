// Replay module for checking recorded games against the current solver
//
// This module provides functionality to:
// 1. Load game archives written by the file recorder
// 2. Re-run the solver on every recorded state
// 3. Compare recorded vs replayed decisions
// 4. Print a summary report

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::recorder::{read_archive, ArchivedGame, RecordedDecision, END_DECISION, INVALID_DECISION};
use crate::solver::Solver;
use crate::types::{Direction, Game, GameState};

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    /// `None` when the recorded turn had no possible move
    pub original_move: Option<Direction>,
    /// `None` when the replayed turn had no possible move
    pub replayed_move: Option<Direction>,
    pub matches: bool,
    /// Whether the recorded move is still among the surviving candidates
    pub original_still_candidate: bool,
    pub candidates: usize,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
    pub still_candidate: usize,
}

/// Replay engine for analyzing recorded games
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
    seed: u64,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration.
    /// `seed` makes random tie-breaks reproducible between runs.
    pub fn new(config: Config, verbose: bool, seed: u64) -> Self {
        ReplayEngine { config, verbose, seed }
    }

    /// Loads a `.json.gz` (or plain `.json`) game archive
    pub fn load_archive<P: AsRef<Path>>(&self, path: P) -> Result<ArchivedGame, String> {
        let archive = read_archive(path.as_ref()).map_err(|e| {
            format!("Failed to load archive {}: {}", path.as_ref().display(), e)
        })?;
        info!(
            "Loaded game {} with {} recorded states",
            archive.game.id,
            archive.decisions.len()
        );
        Ok(archive)
    }

    /// Re-runs the solver on one recorded state. Returns `None` for the
    /// terminal `end` record, which has no decision to compare.
    pub fn replay_entry(&self, game: &Game, entry: &RecordedDecision) -> Option<ReplayResult> {
        if entry.decision == END_DECISION {
            return None;
        }

        let original_move = if entry.decision == INVALID_DECISION {
            None
        } else {
            match Direction::parse(&entry.decision) {
                Some(dir) => Some(dir),
                None => {
                    warn!(
                        "Turn {}: unrecognized decision '{}'",
                        entry.state.turn, entry.decision
                    );
                    return None;
                }
            }
        };

        let state = GameState {
            game: game.clone(),
            turn: entry.state.turn,
            board: entry.state.board.clone(),
            you: entry.state.you.clone(),
        };

        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(state.turn as u64));
        let decision =
            Solver::new(&state).decide(&self.config.solver, &self.config.scoring, &mut rng);
        let elapsed = start.elapsed().as_micros();

        let replayed_move = decision.selection.into_result().ok();
        let original_still_candidate = match original_move {
            Some(dir) => decision.ranked.iter().any(|c| c.direction == dir),
            None => decision.ranked.is_empty(),
        };

        let result = ReplayResult {
            turn: state.turn,
            original_move,
            replayed_move,
            matches: original_move == replayed_move,
            original_still_candidate,
            candidates: decision.ranked.len(),
            computation_time_us: elapsed,
        };

        if self.verbose {
            if result.matches {
                info!(
                    "Turn {}: ✓ MATCH - {} ({} candidates, {}us)",
                    result.turn,
                    describe(result.replayed_move),
                    result.candidates,
                    result.computation_time_us
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} ({} candidates, {}us)",
                    result.turn,
                    describe(result.original_move),
                    describe(result.replayed_move),
                    result.candidates,
                    result.computation_time_us
                );
            }
        }

        Some(result)
    }

    /// Replays every recorded turn
    pub fn replay_all(&self, archive: &ArchivedGame) -> Vec<ReplayResult> {
        archive
            .decisions
            .iter()
            .filter_map(|entry| self.replay_entry(&archive.game, entry))
            .collect()
    }

    /// Replays specific turns from an archive
    pub fn replay_turns(
        &self,
        archive: &ArchivedGame,
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = archive
                .decisions
                .iter()
                .find(|e| e.state.turn == *turn_num && e.decision != END_DECISION)
                .ok_or_else(|| format!("Turn {} not found in archive", turn_num))?;

            if let Some(result) = self.replay_entry(&archive.game, entry) {
                results.push(result);
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let still_candidate = results.iter().filter(|r| r.original_still_candidate).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
            still_candidate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:       {}", stats.total_turns);
        println!("Matches:           {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:        {}", stats.mismatches);
        println!("Still a candidate: {}", stats.still_candidate);
        println!("═══════════════════════════════════════════════════════════\n");

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");
            for result in mismatches {
                println!(
                    "Turn {}: {} → {} ({} candidates{})",
                    result.turn,
                    describe(result.original_move),
                    describe(result.replayed_move),
                    result.candidates,
                    if result.original_still_candidate {
                        ", recorded move still allowed"
                    } else {
                        ""
                    }
                );
            }
            println!();
        }
    }
}

fn describe(dir: Option<Direction>) -> &'static str {
    dir.map(|d| d.as_str()).unwrap_or(INVALID_DECISION)
}
