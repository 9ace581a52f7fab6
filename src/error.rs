// File: src/error.rs
use thiserror::Error;

/// Failures reported by [`SolverEngine::solve`](crate::SolverEngine::solve).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("no complete key satisfies the threshold against the dictionary")]
    SearchExhausted,
    #[error("threshold {0} is outside (0, 1]")]
    InvalidThreshold(f64),
    #[error("unsupported character {ch:?} at position {position}")]
    UnsupportedCharacter { ch: char, position: usize },
    #[error("search budget of {nodes} nodes exhausted before a key was found")]
    BudgetExceeded { nodes: u64 },
}
