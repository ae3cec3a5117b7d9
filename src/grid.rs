// Grid arithmetic on top of the API coordinate type
//
// The board is a standard 2D grid with (0,0) in the bottom left. The Y axis
// grows upwards and the X axis grows to the right, so an 11x11 board has
// coordinates ranging over [0, 10] on both axes.

use crate::types::{Board, Coord, Direction};

/// A coordinate reached by moving in `direction`, optionally annotated with
/// a heuristic score once the scorer has seen it.
///
/// Candidates are values: scoring produces a new candidate instead of
/// mutating one in place, so the same cell can sit in several candidate
/// lists without interference.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub coord: Coord,
    pub direction: Direction,
    pub score: Option<f64>,
}

impl Candidate {
    pub fn new(coord: Coord, direction: Direction) -> Self {
        Candidate { coord, direction, score: None }
    }

    /// Returns a copy of this candidate carrying `score`
    pub fn with_score(&self, score: f64) -> Self {
        Candidate { score: Some(score), ..*self }
    }

    /// Score used for ranking; unscored candidates rank as 0
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

impl Coord {
    /// Shifts the coordinate one cell in `direction`. The result is not
    /// guaranteed to be on the board.
    pub fn project(&self, direction: Direction) -> Candidate {
        Candidate::new(direction.apply(self), direction)
    }

    pub fn within_bounds(&self, board: &Board) -> bool {
        0 <= self.x && self.x < board.width && 0 <= self.y && self.y < board.height
    }

    /// Wraps a coordinate that left the board by at most one cell back onto
    /// the opposite edge.
    pub fn wrap_for_board(&self, board: &Board) -> Coord {
        Coord {
            x: wrap_axis(self.x, board.width),
            y: wrap_axis(self.y, board.height),
        }
    }

    /// Euclidean distance between two cells
    pub fn distance(&self, other: &Coord) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

fn wrap_axis(value: i32, size: i32) -> i32 {
    if value < 0 {
        value + size
    } else if value > size - 1 {
        value - size
    } else {
        value
    }
}

/// Directions of the given candidates, in order
pub fn directions(candidates: &[Candidate]) -> Vec<Direction> {
    candidates.iter().map(|c| c.direction).collect()
}
