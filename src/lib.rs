// Library exports for the Battlesnake server
// The move engine (grid, snake, movegen, threat, scoring, solver) is pure and
// synchronous; bot, recorder and replay are the plumbing around it.

pub mod bot;
pub mod config;
pub mod error;
pub mod grid;
pub mod movegen;
pub mod recorder;
pub mod replay;
pub mod scoring;
pub mod snake;
pub mod solver;
pub mod threat;
pub mod types;
