use thiserror::Error;

/// The single failure the move engine reports.
///
/// A trapped snake is a normal part of play, so callers recover from this by
/// answering with a fallback direction rather than treating it as fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error("no possible moves")]
    NoPossibleMove,
}
