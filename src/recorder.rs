// Game recording
//
// Every decision the server makes is remembered per game and, once the game
// ends, written out as a gzip-compressed JSON archive. Games whose /end never
// arrives are dropped by a periodic prune sweep running on the tokio runtime.

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::{RecorderConfig, RecorderKind};
use crate::snake::is_valid;
use crate::types::{Battlesnake, Board, Game, GameState};

/// Decision recorded when no legal move existed
pub const INVALID_DECISION: &str = "invalid";
/// Decision recorded for the final /end state
pub const END_DECISION: &str = "end";

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("invalid game {0}")]
    UnknownGame(String),
    #[error("failed to serialize game: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("archive i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives the lifecycle of every game the server plays
pub trait GameRecorder: Send + Sync {
    fn start(&self, state: &GameState) -> Result<(), RecorderError>;
    fn record_move(&self, state: &GameState, decision: &str) -> Result<(), RecorderError>;
    fn end(&self, state: &GameState) -> Result<(), RecorderError>;

    /// Starts any background work the recorder needs
    fn spawn_background(self: Arc<Self>) -> Option<JoinHandle<()>> {
        None
    }

    /// Stops background work started by `spawn_background`
    fn shutdown(&self) {}
}

/// Builds the recorder selected in the configuration
pub fn recorder_from_config(
    config: &RecorderConfig,
) -> Result<Arc<dyn GameRecorder>, RecorderError> {
    Ok(match config.kind {
        RecorderKind::Noop => Arc::new(NoopRecorder),
        RecorderKind::Stdout => Arc::new(StdoutRecorder),
        RecorderKind::File => Arc::new(FileArchive::new(
            &config.output_path,
            config.prune_interval(),
            config.max_age_before_prune(),
        )?),
    })
}

/// The part of a request worth keeping for each turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardState {
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

impl From<&GameState> for BoardState {
    fn from(state: &GameState) -> Self {
        BoardState {
            turn: state.turn,
            board: state.board.clone(),
            you: state.you.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedDecision {
    pub state: BoardState,
    pub decision: String,
}

/// A complete game as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedGame {
    pub game: Game,
    #[serde(rename = "states")]
    pub decisions: Vec<RecordedDecision>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub won: bool,
}

impl ArchivedGame {
    fn new(game: Game) -> Self {
        ArchivedGame {
            game,
            decisions: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            won: false,
        }
    }

    fn has_invalid_decision(&self) -> bool {
        self.decisions.iter().any(|d| d.decision == INVALID_DECISION)
    }
}

/// Reads an archive written by `FileArchive`. Files not ending in `.gz` are
/// read as plain JSON.
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<ArchivedGame, RecorderError> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);
    let mut json = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file).read_to_string(&mut json)?;
    } else {
        let mut file = file;
        file.read_to_string(&mut json)?;
    }
    Ok(serde_json::from_str(&json)?)
}

/// Discards everything
pub struct NoopRecorder;

impl GameRecorder for NoopRecorder {
    fn start(&self, _state: &GameState) -> Result<(), RecorderError> {
        Ok(())
    }

    fn record_move(&self, _state: &GameState, _decision: &str) -> Result<(), RecorderError> {
        Ok(())
    }

    fn end(&self, _state: &GameState) -> Result<(), RecorderError> {
        Ok(())
    }
}

/// Dumps every request to stdout as pretty JSON
pub struct StdoutRecorder;

impl GameRecorder for StdoutRecorder {
    fn start(&self, state: &GameState) -> Result<(), RecorderError> {
        println!("START: {}\n", serde_json::to_string_pretty(state)?);
        Ok(())
    }

    fn record_move(&self, state: &GameState, decision: &str) -> Result<(), RecorderError> {
        println!(
            "MOVE: {}, responded with '{}'\n",
            serde_json::to_string_pretty(state)?,
            decision
        );
        Ok(())
    }

    fn end(&self, state: &GameState) -> Result<(), RecorderError> {
        println!("END: {}\n", serde_json::to_string_pretty(state)?);
        Ok(())
    }
}

struct LiveGame {
    record: ArchivedGame,
    expires_at: Instant,
}

/// Writes finished games as `.json.gz` files under `base_path`
pub struct FileArchive {
    base_path: PathBuf,
    games: RwLock<HashMap<String, LiveGame>>,
    prune_interval: Duration,
    max_age_before_prune: Duration,
    stop: Notify,
}

impl FileArchive {
    /// Creates the archive, making sure `base_path` exists
    pub fn new<P: AsRef<Path>>(
        base_path: P,
        prune_interval: Duration,
        max_age_before_prune: Duration,
    ) -> Result<Self, RecorderError> {
        fs::create_dir_all(base_path.as_ref())?;
        Ok(FileArchive {
            base_path: base_path.as_ref().to_path_buf(),
            games: RwLock::new(HashMap::new()),
            prune_interval,
            max_age_before_prune,
            stop: Notify::new(),
        })
    }

    /// Number of games currently held in memory
    pub fn live_games(&self) -> usize {
        self.games.read().len()
    }

    /// Drops every game whose expiry is at or before `now`; returns how many
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut games = self.games.write();
        let before = games.len();
        games.retain(|_, g| g.expires_at > now);
        let pruned = before - games.len();
        if pruned > 0 {
            debug!("Pruned {} expired games", pruned);
        }
        pruned
    }

    fn archive_path(&self, record: &ArchivedGame, ended_at: DateTime<Utc>, you: &Battlesnake) -> PathBuf {
        let name = format!(
            "{}_game={}_type={}_snake={}.json.gz",
            ended_at.format("%Y%m%dT%H%M%SZ"),
            record.game.id,
            record.game.ruleset.name,
            you.name.replace(['/', '\\'], "_"),
        );
        self.base_path.join(name)
    }

    fn write_archive(&self, path: &Path, record: &ArchivedGame) -> Result<(), RecorderError> {
        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        serde_json::to_writer_pretty(&mut encoder, record)?;
        encoder.finish()?;
        Ok(())
    }
}

fn game_key(state: &GameState) -> String {
    format!("{}:{}", state.game.id, state.you.id)
}

impl GameRecorder for FileArchive {
    fn start(&self, state: &GameState) -> Result<(), RecorderError> {
        let live = LiveGame {
            record: ArchivedGame::new(state.game.clone()),
            expires_at: Instant::now() + self.max_age_before_prune,
        };
        self.games.write().insert(game_key(state), live);
        Ok(())
    }

    fn record_move(&self, state: &GameState, decision: &str) -> Result<(), RecorderError> {
        let key = game_key(state);
        let mut games = self.games.write();
        // /start is not guaranteed to arrive before the first /move
        let live = games.entry(key).or_insert_with(|| LiveGame {
            record: ArchivedGame::new(state.game.clone()),
            expires_at: Instant::now() + self.max_age_before_prune,
        });
        live.record.decisions.push(RecordedDecision {
            state: BoardState::from(state),
            decision: decision.to_string(),
        });
        Ok(())
    }

    fn end(&self, state: &GameState) -> Result<(), RecorderError> {
        let key = game_key(state);
        let mut record = self
            .games
            .write()
            .remove(&key)
            .map(|live| live.record)
            .ok_or_else(|| RecorderError::UnknownGame(state.game.id.clone()))?;

        let ended_at = Utc::now();
        record.decisions.push(RecordedDecision {
            state: BoardState::from(state),
            decision: END_DECISION.to_string(),
        });
        record.ended_at = Some(ended_at);
        record.won = is_valid(&state.you, &state.board, state.game.ruleset.kind())
            && !record.has_invalid_decision();

        let path = self.archive_path(&record, ended_at, &state.you);
        self.write_archive(&path, &record)?;
        info!("Archived game {} to {}", record.game.id, path.display());
        Ok(())
    }

    fn spawn_background(self: Arc<Self>) -> Option<JoinHandle<()>> {
        let period = self.prune_interval;
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.prune_expired(Instant::now());
                    }
                    _ = self.stop.notified() => {
                        debug!("Prune loop stopped");
                        break;
                    }
                }
            }
        }))
    }

    fn shutdown(&self) {
        self.stop.notify_one();
    }
}
