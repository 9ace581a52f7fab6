// File: src/core/engine.rs
use crate::core::assigner::{KeyAssigner, Outcome, SearchStats};
use crate::core::context::ResolutionContext;
use crate::core::deadend::{DeadendEvaluator, Pruner};
use crate::core::dictionary::Dictionary;
use crate::core::frequency::cipher_order;
use crate::core::substitutor::Substitutor;
use crate::core::types::{Key, RemainingPool, PLACEHOLDER};
use crate::error::SolveError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// What to do with ciphertext characters that are neither letters nor whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterPolicy {
    /// Treat them as punctuation: copied unchanged, ignored by frequency analysis.
    #[default]
    PassThrough,
    /// Reject them with `UnsupportedCharacter`.
    Strict,
}

/// Which pruner backs the search. Both give identical results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStrategy {
    /// Re-substitute the whole ciphertext at every node.
    Naive,
    /// Only re-examine tokens touched by the latest assignment.
    #[default]
    Incremental,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub threshold: f64,
    pub character_policy: CharacterPolicy,
    pub strategy: EvaluationStrategy,
    /// Upper bound on trial assignments; `None` searches exhaustively.
    pub max_nodes: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            character_policy: CharacterPolicy::default(),
            strategy: EvaluationStrategy::default(),
            max_nodes: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SolveError> {
        // NaN fails both comparisons and is rejected too.
        if self.threshold > 0.0 && self.threshold <= 1.0 {
            Ok(())
        } else {
            Err(SolveError::InvalidThreshold(self.threshold))
        }
    }
}

/// A solved cipher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub key: Key,
    /// The ciphertext with `key` applied.
    pub decoded: String,
    /// Cipher letters in the order they were assigned.
    pub cipher_order: String,
    pub stats: SearchStats,
}

/// Case-normalizes `input` and enforces the character policy.
///
/// The placeholder symbol is always rejected: letting it through would make a
/// punctuation token look permanently unresolved.
pub fn normalize_ciphertext(input: &str, policy: CharacterPolicy) -> Result<String, SolveError> {
    let mut text = String::with_capacity(input.len());
    for (position, ch) in input.chars().enumerate() {
        let supported = ch.is_ascii_alphabetic() || ch.is_whitespace();
        if ch == PLACEHOLDER || (policy == CharacterPolicy::Strict && !supported) {
            return Err(SolveError::UnsupportedCharacter { ch, position });
        }
        text.push(ch.to_ascii_uppercase());
    }
    Ok(text)
}

/// Entry point: owns the dictionary and configuration, solves ciphertexts.
pub struct SolverEngine {
    pub dictionary: Dictionary,
    pub config: SolverConfig,
}

impl SolverEngine {
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_config(dictionary, SolverConfig::default())
    }

    pub fn with_config(dictionary: Dictionary, config: SolverConfig) -> Self {
        Self { dictionary, config }
    }

    /// Recovers a key for `ciphertext`.
    ///
    /// Fails with `InvalidThreshold` or `UnsupportedCharacter` before any search
    /// happens, and with `SearchExhausted` or `BudgetExceeded` if no key is found.
    pub fn solve(&self, ciphertext: &str) -> Result<Solution, SolveError> {
        self.config.validate()?;
        let text = normalize_ciphertext(ciphertext, self.config.character_policy)?;

        let order = cipher_order(&text);
        debug!(
            "solving {} chars, {} distinct letters, order {}, {:?} pruning at threshold {}",
            text.len(),
            order.len(),
            String::from_utf8_lossy(&order),
            self.config.strategy,
            self.config.threshold
        );

        let (key, stats) = match self.config.strategy {
            EvaluationStrategy::Naive => {
                let pruner = DeadendEvaluator::new(&text, &self.dictionary, self.config.threshold);
                self.search(pruner, &order)?
            }
            EvaluationStrategy::Incremental => {
                let pruner = ResolutionContext::new(&text, &self.dictionary, self.config.threshold);
                self.search(pruner, &order)?
            }
        };

        let decoded = Substitutor::apply(&text, &key);
        Ok(Solution {
            key,
            decoded,
            cipher_order: order.iter().map(|&c| c as char).collect(),
            stats,
        })
    }

    fn search<P: Pruner>(&self, pruner: P, order: &[u8]) -> Result<(Key, SearchStats), SolveError> {
        let mut key = Key::new();
        let mut pool = RemainingPool::new();
        let mut assigner = KeyAssigner::new(pruner).with_budget(self.config.max_nodes);

        let outcome = assigner.assign(order, &mut pool, &mut key);
        let stats = assigner.stats();
        match outcome {
            Outcome::Solved => {
                info!(
                    "key found after {} nodes ({} deadends, {} backtracks)",
                    stats.nodes, stats.deadends, stats.backtracks
                );
                Ok((key, stats))
            }
            Outcome::Exhausted => {
                warn!("search exhausted after {} nodes", stats.nodes);
                Err(SolveError::SearchExhausted)
            }
            Outcome::OutOfBudget => {
                warn!("search budget of {} nodes exhausted", stats.nodes);
                Err(SolveError::BudgetExceeded { nodes: stats.nodes })
            }
        }
    }
}
