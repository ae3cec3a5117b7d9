// Configuration module for reading Snake.toml
// Holds the solver options, scoring tunables and server plumbing settings

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "SNAKE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub solver: SolveOptions,
    pub scoring: ScoringConfig,
    pub recorder: RecorderConfig,
    pub appearance: AppearanceConfig,
    pub shouts: ShoutConfig,
}

/// Per-turn response budget
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Switches and magnitudes for a single decision
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SolveOptions {
    /// Drop candidates that leave us with no move one turn later
    pub lookahead: bool,
    /// Treat cells opponents can reach next turn as occupied
    pub consider_opponent_next_move: bool,
    /// Collapse the ranked result to its single best entry
    pub use_single_best_option: bool,
    /// Treat hazard cells as walls instead of only penalizing them
    #[serde(default)]
    pub avoid_hazards: bool,
    pub food_reward: i32,
    pub hazard_penalty: i32,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            lookahead: true,
            consider_opponent_next_move: true,
            use_single_best_option: false,
            avoid_hazards: false,
            food_reward: 20,
            hazard_penalty: 40,
        }
    }
}

/// Heuristic tunables used by the scorer and selector
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoringConfig {
    /// How many head-first body segments feed the distance signal
    pub body_segments: usize,
    /// At or above this health, food is avoided
    pub satiated_health: i32,
    /// At or below this health, food is sought
    pub starving_health: i32,
    /// Minimum lead over the runner-up for a non-random pick
    pub confident_margin: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            body_segments: 8,
            satiated_health: 70,
            starving_health: 30,
            confident_margin: 4.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecorderKind {
    File,
    Stdout,
    Noop,
}

/// Game recorder settings
#[derive(Debug, Deserialize, Clone)]
pub struct RecorderConfig {
    pub kind: RecorderKind,
    pub output_path: PathBuf,
    pub max_age_before_prune_secs: u64,
    pub prune_interval_secs: u64,
}

impl RecorderConfig {
    pub fn max_age_before_prune(&self) -> Duration {
        Duration::from_secs(self.max_age_before_prune_secs)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_secs.max(1))
    }
}

/// Values returned by GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
    pub version: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShoutConfig {
    /// Chance (0-100) of shouting something on an ordinary turn
    pub neutral_chance_percent: u32,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads from `$SNAKE_CONFIG`, or Snake.toml in the working directory
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "Snake.toml".to_string());
        Self::from_file(path)
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
            },
            solver: SolveOptions::default(),
            scoring: ScoringConfig::default(),
            recorder: RecorderConfig {
                kind: RecorderKind::File,
                output_path: PathBuf::from("games"),
                max_age_before_prune_secs: 120,
                prune_interval_secs: 60,
            },
            appearance: AppearanceConfig {
                author: "clocklear".to_string(),
                color: "#238270".to_string(),
                head: "silly".to_string(),
                tail: "coffee".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            shouts: ShoutConfig {
                neutral_chance_percent: 5,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
