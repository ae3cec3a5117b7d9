// Battlesnake bot: ties the solver, the game recorder and the API together
//
// The HTTP handlers only decode requests and call into this type. Each
// method here corresponds to one API endpoint.

use log::{error, info, warn};
use rand::Rng;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::recorder::{GameRecorder, INVALID_DECISION};
use crate::scoring::Selection;
use crate::solver::{Decision, Solver};
use crate::types::GameState;

const NEGATIVE_SHOUTS: [&str; 8] = [
    "oh crap",
    "bummer",
    "ouch",
    "whoops",
    "dangit",
    "good game",
    "sayonara",
    "eeeks",
];

const NEUTRAL_SHOUTS: [&str; 6] = [
    "here we go!",
    "i'm coming for you",
    "da dun dun dun",
    "whee!",
    "has anyone seen my coffee?",
    "choo-choo!",
];

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    recorder: Arc<dyn GameRecorder>,
}

impl Bot {
    /// Creates a new Bot instance
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    /// * `recorder` - Where started, played and finished games are reported
    pub fn new(config: Config, recorder: Arc<dyn GameRecorder>) -> Self {
        Bot { config, recorder }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn recorder(&self) -> Arc<dyn GameRecorder> {
        self.recorder.clone()
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
            "version": appearance.version,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, state: &GameState) {
        if let Err(e) = self.recorder.start(state) {
            error!("Failed to record game start for {}: {}", state.game.id, e);
        }
        info!("GAME START {}", state.game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, state: &GameState) {
        if let Err(e) = self.recorder.end(state) {
            error!("Failed recording game end for {}: {}", state.game.id, e);
        }
        info!("GAME OVER {}", state.game.id);
    }

    /// Runs the solver synchronously on the calling thread
    pub fn decide(&self, state: &GameState) -> Decision {
        Self::decide_with(state, &self.config, &mut rand::rng())
    }

    fn decide_with<R: Rng + ?Sized>(state: &GameState, config: &Config, rng: &mut R) -> Decision {
        Solver::new(state).decide(&config.solver, &config.scoring, rng)
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The solver runs on the blocking pool under the configured time budget.
    /// If it does not finish in time the answer is a random direction, the
    /// same as when the snake is trapped.
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move and an optional shout
    pub async fn get_move(&self, state: &GameState) -> Value {
        let start_time = Instant::now();
        info!("Turn {}: Computing move", state.turn);

        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());
        let task_state = state.clone();
        let task_config = self.config.clone();
        let task = tokio::task::spawn_blocking(move || {
            Self::decide_with(&task_state, &task_config, &mut rand::rng())
        });

        let selection = match tokio::time::timeout(budget, task).await {
            Ok(Ok(decision)) => {
                info!(
                    "Turn {}: {} candidate(s) {:?}",
                    state.turn,
                    decision.ranked.len(),
                    decision
                        .ranked
                        .iter()
                        .map(|c| (c.direction.as_str(), c.score_or_zero()))
                        .collect::<Vec<_>>()
                );
                decision.selection
            }
            Ok(Err(e)) => {
                error!("Turn {}: solver task failed: {}", state.turn, e);
                fallback_selection()
            }
            Err(_) => {
                warn!(
                    "Turn {}: solver exceeded {}ms budget",
                    state.turn,
                    budget.as_millis()
                );
                fallback_selection()
            }
        };

        self.respond(state, selection, start_time)
    }

    fn respond(&self, state: &GameState, selection: Selection, start_time: Instant) -> Value {
        let mut rng = rand::rng();
        let (recorded, shout) = match selection.error {
            Some(_) => (INVALID_DECISION, Some(pick(&NEGATIVE_SHOUTS, &mut rng))),
            None => {
                let shout = (rng.random_range(0..100) < self.config.shouts.neutral_chance_percent)
                    .then(|| pick(&NEUTRAL_SHOUTS, &mut rng));
                (selection.direction.as_str(), shout)
            }
        };

        if let Err(e) = self.recorder.record_move(state, recorded) {
            error!(
                "Failed to record move for game {} turn {}: {}",
                state.game.id, state.turn, e
            );
        }

        info!(
            "Turn {}: Chose {} (decision: {}, time: {}ms)",
            state.turn,
            selection.direction.as_str(),
            recorded,
            start_time.elapsed().as_millis()
        );

        match shout {
            Some(shout) => json!({ "move": selection.direction.as_str(), "shout": shout }),
            None => json!({ "move": selection.direction.as_str() }),
        }
    }
}

fn fallback_selection() -> Selection {
    Selection::fallback(&mut rand::rng())
}

fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options[rng.random_range(0..options.len())]
}
