// src/lib.rs

pub mod core;
pub mod error;
pub mod persistence;
pub use crate::core::dictionary::Dictionary;
pub use crate::core::engine::{Solution, SolverConfig, SolverEngine};
pub use crate::core::types::Key;
pub use crate::error::SolveError;
