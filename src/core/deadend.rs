// File: src/core/deadend.rs
use crate::core::dictionary::Dictionary;
use crate::core::substitutor::Substitutor;
use crate::core::types::Key;

/// Outcome of judging a partial key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Viable,
    Deadend,
}

impl Verdict {
    pub fn is_deadend(self) -> bool {
        self == Verdict::Deadend
    }
}

/// The pruning test consulted by the search at every trial assignment.
///
/// Calls come in pairs: `evaluate` right after `key[cipher]` was set, and
/// `retract` right before it is cleared again. Implementations may keep state
/// between the two; the search never re-assigns a letter without retracting it
/// first.
pub trait Pruner {
    fn evaluate(&mut self, key: &Key, cipher: u8) -> Verdict;

    fn retract(&mut self, _cipher: u8) {}
}

/// Decides from a tally of resolved tokens.
///
/// With no resolved token there is no evidence, so the key stays viable. A
/// threshold of zero disables rejection altogether.
pub(crate) fn judge(resolved: usize, valid: usize, threshold: f64) -> Verdict {
    if resolved == 0 || threshold <= 0.0 {
        return Verdict::Viable;
    }
    if valid as f64 / resolved as f64 > threshold {
        Verdict::Viable
    } else {
        Verdict::Deadend
    }
}

/// Judges a partial key by full re-substitution of the ciphertext.
///
/// Each call costs O(n) in the ciphertext length. See
/// [`ResolutionContext`](crate::core::context::ResolutionContext) for the
/// incremental equivalent.
pub struct DeadendEvaluator<'a> {
    ciphertext: &'a str,
    dictionary: &'a Dictionary,
    threshold: f64,
}

impl<'a> DeadendEvaluator<'a> {
    pub fn new(ciphertext: &'a str, dictionary: &'a Dictionary, threshold: f64) -> Self {
        Self { ciphertext, dictionary, threshold }
    }

    /// Counts `(resolved, valid)` tokens of the text decoded with `key`.
    /// Tokens are counted per occurrence and compared literally.
    pub fn tally(&self, key: &Key) -> (usize, usize) {
        let decoded = Substitutor::apply(self.ciphertext, key);
        decoded
            .split_whitespace()
            .filter(|token| Substitutor::is_resolved(token))
            .fold((0, 0), |(resolved, valid), token| {
                (resolved + 1, valid + self.dictionary.contains(token) as usize)
            })
    }

    pub fn judge(&self, key: &Key) -> Verdict {
        let (resolved, valid) = self.tally(key);
        judge(resolved, valid, self.threshold)
    }

    pub fn is_deadend(&self, key: &Key) -> bool {
        self.judge(key).is_deadend()
    }
}

impl Pruner for DeadendEvaluator<'_> {
    fn evaluate(&mut self, key: &Key, _cipher: u8) -> Verdict {
        self.judge(key)
    }
}
