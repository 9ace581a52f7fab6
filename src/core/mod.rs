// src/core/mod.rs

pub mod assigner;
pub mod context;
pub mod deadend;
pub mod dictionary;
pub mod engine;
pub mod frequency;
pub mod substitutor;
pub mod types;
