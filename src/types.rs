// Battlesnake API Types
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health a snake is restored to when it eats
pub const MAX_HEALTH: i32 = 100;

/// Extra damage taken for ending a turn on a hazard cell
pub const HAZARD_DAMAGE_PER_TURN: i32 = 15;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    pub ruleset: Ruleset,
    pub timeout: u32,
    #[serde(default)]
    pub source: String,
}

/// Ruleset as sent by the game engine
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl Ruleset {
    pub fn kind(&self) -> RulesetKind {
        RulesetKind::from_name(&self.name)
    }
}

/// Known rulesets. Only `Wrapped` changes how moves are projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RulesetKind {
    Standard,
    Wrapped,
    Solo,
    Royale,
    Squad,
    Constrictor,
    Other,
}

impl RulesetKind {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "standard" => RulesetKind::Standard,
            "wrapped" => RulesetKind::Wrapped,
            "solo" => RulesetKind::Solo,
            "royale" => RulesetKind::Royale,
            "squad" => RulesetKind::Squad,
            "constrictor" => RulesetKind::Constrictor,
            _ => RulesetKind::Other,
        }
    }

    pub fn wraps(&self) -> bool {
        matches!(self, RulesetKind::Wrapped)
    }
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    #[serde(default)]
    pub food: Vec<Coord>,
    #[serde(default)]
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

impl Board {
    pub fn has_food(&self, coord: &Coord) -> bool {
        self.food.contains(coord)
    }

    pub fn is_hazard(&self, coord: &Coord) -> bool {
        self.hazards.contains(coord)
    }
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Battlesnake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: String,
}

impl Battlesnake {
    /// Builds a snake from its body, deriving head and length
    pub fn new(id: &str, health: i32, body: Vec<Coord>) -> Self {
        let head = body.first().copied().unwrap_or(Coord { x: 0, y: 0 });
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health,
            length: body.len() as i32,
            head,
            body,
            latency: String::new(),
            shout: String::new(),
        }
    }
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses the lowercase API representation (case insensitive)
    pub fn parse(s: &str) -> Option<Direction> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}
