// File: src/core/assigner.rs
use crate::core::deadend::Pruner;
use crate::core::types::{Key, RemainingPool};
use log::trace;
use serde::{Deserialize, Serialize};

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Trial assignments judged by the pruner.
    pub nodes: u64,
    /// Trials the pruner rejected.
    pub deadends: u64,
    /// Trials that passed the pruner but whose subtree failed.
    pub backtracks: u64,
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every cipher letter is assigned.
    Solved,
    /// All candidates were tried without success.
    Exhausted,
    /// The node budget ran out; key and pool are left where the search stopped.
    OutOfBudget,
}

/// Depth-first backtracking search over cipher-letter assignments.
///
/// Variable order is the cipher order handed in; value order is the pool's
/// frequency order. The first complete assignment that survives the pruner at
/// every level wins.
pub struct KeyAssigner<P: Pruner> {
    pruner: P,
    max_nodes: Option<u64>,
    stats: SearchStats,
}

impl<P: Pruner> KeyAssigner<P> {
    pub fn new(pruner: P) -> Self {
        Self { pruner, max_nodes: None, stats: SearchStats::default() }
    }

    pub fn with_budget(mut self, max_nodes: Option<u64>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn into_pruner(self) -> P {
        self.pruner
    }

    /// Extends `key` until every letter of `order` is assigned.
    ///
    /// On [`Outcome::Solved`] `key` holds the solution. On
    /// [`Outcome::Exhausted`] `key` and `pool` are exactly as they were on
    /// entry.
    pub fn assign(&mut self, order: &[u8], pool: &mut RemainingPool, key: &mut Key) -> Outcome {
        let Some((&cipher, rest)) = order.split_first() else {
            return Outcome::Solved;
        };

        // Snapshot of the available candidates; the pool itself changes
        // underneath while deeper levels run.
        let candidates: Vec<(usize, u8)> = pool.available().collect();

        for (index, plain) in candidates {
            if self.max_nodes.is_some_and(|max| self.stats.nodes >= max) {
                return Outcome::OutOfBudget;
            }
            self.stats.nodes += 1;

            key.set(cipher, plain);
            if self.pruner.evaluate(key, cipher).is_deadend() {
                trace!("deadend at {}→{}", cipher as char, plain as char);
                self.stats.deadends += 1;
                self.pruner.retract(cipher);
                key.clear(cipher);
                continue;
            }

            pool.take(index);
            match self.assign(rest, pool, key) {
                Outcome::Solved => return Outcome::Solved,
                Outcome::OutOfBudget => return Outcome::OutOfBudget,
                Outcome::Exhausted => {
                    trace!("backtrack from {}→{}", cipher as char, plain as char);
                    self.stats.backtracks += 1;
                    pool.restore(index);
                    self.pruner.retract(cipher);
                    key.clear(cipher);
                }
            }
        }

        Outcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ResolutionContext;
    use crate::core::deadend::{DeadendEvaluator, Verdict};
    use crate::core::dictionary::Dictionary;
    use crate::core::frequency::cipher_order;
    use crate::core::substitutor::Substitutor;

    /// Records the key as it stood before every trial assignment.
    struct Recorder<'a> {
        inner: DeadendEvaluator<'a>,
        log: Vec<Key>,
    }

    impl Pruner for Recorder<'_> {
        fn evaluate(&mut self, key: &Key, cipher: u8) -> Verdict {
            let mut before = key.clone();
            before.clear(cipher);
            self.log.push(before);
            self.inner.evaluate(key, cipher)
        }

        fn retract(&mut self, _cipher: u8) {}
    }

    fn solve(text: &str, dict: &Dictionary, threshold: f64) -> (Outcome, Key, RemainingPool) {
        let order = cipher_order(text);
        let mut pool = RemainingPool::new();
        let mut key = Key::new();
        let mut assigner = KeyAssigner::new(DeadendEvaluator::new(text, dict, threshold));
        let outcome = assigner.assign(&order, &mut pool, &mut key);
        (outcome, key, pool)
    }

    #[test]
    fn finds_the_only_word() {
        let dict = Dictionary::from_words(["NO"]);
        let (outcome, key, pool) = solve("AB AB", &dict, 0.85);
        assert_eq!(outcome, Outcome::Solved);
        assert_eq!(Substitutor::apply("AB AB", &key), "NO NO");
        assert!(!pool.contains(b'N'));
        assert!(!pool.contains(b'O'));
        assert_eq!(pool.len(), 24);
    }

    #[test]
    fn empty_order_is_immediately_solved() {
        let dict = Dictionary::new();
        let (outcome, key, pool) = solve(" ... ", &dict, 0.85);
        assert_eq!(outcome, Outcome::Solved);
        assert!(key.is_empty());
        assert_eq!(pool, RemainingPool::new());
    }

    #[test]
    fn exhaustion_restores_entry_state() {
        let dict = Dictionary::new();
        let (outcome, key, pool) = solve("AB", &dict, 0.85);
        assert_eq!(outcome, Outcome::Exhausted);
        assert!(key.is_empty());
        assert_eq!(pool, RemainingPool::new());
    }

    #[test]
    fn failed_branches_leave_no_residue() {
        // Forces a long detour: only the last plaintext letters spell a word.
        let dict = Dictionary::from_words(["ZQ"]);
        let text = "AB";
        let order = cipher_order(text);
        let mut pool = RemainingPool::new();
        let mut key = Key::new();
        let recorder = Recorder { inner: DeadendEvaluator::new(text, &dict, 0.5), log: Vec::new() };
        let mut assigner = KeyAssigner::new(recorder);

        assert_eq!(assigner.assign(&order, &mut pool, &mut key), Outcome::Solved);
        let stats = assigner.stats();
        let log = assigner.into_pruner().log;

        // Every trial at the first level started from the empty key, every
        // trial at the second level from exactly `A` assigned.
        for before in &log {
            assert!(before.len() <= 1);
            if before.len() == 1 {
                assert!(before.get(b'A').is_some());
                assert!(before.get(b'B').is_none());
            }
        }
        assert_eq!(key.get(b'A'), Some(b'Z'));
        assert_eq!(key.get(b'B'), Some(b'Q'));
        assert!(stats.backtracks > 0);
        assert_eq!(stats.nodes, log.len() as u64);
    }

    #[test]
    fn inner_failures_restore_key_and_pool() {
        // Under `A`→`E` no word fits, so the whole `B`,`C` subtree fails.
        let dict = Dictionary::from_words(["TEN"]);
        let text = "ABC";
        let order = cipher_order(text);
        let (&head, tail) = order.split_first().unwrap();

        let mut pool = RemainingPool::new();
        let mut key = Key::new();
        let mut failed = 0;
        let candidates: Vec<(usize, u8)> = pool.available().collect();

        for (index, plain) in candidates {
            key.set(head, plain);
            pool.take(index);
            let (key_before, pool_before) = (key.clone(), pool);

            let mut assigner = KeyAssigner::new(DeadendEvaluator::new(text, &dict, 0.5));
            match assigner.assign(tail, &mut pool, &mut key) {
                Outcome::Solved => break,
                outcome => {
                    assert_eq!(outcome, Outcome::Exhausted);
                    assert!(assigner.stats().nodes > 0);
                    assert_eq!(key, key_before);
                    assert_eq!(pool, pool_before);
                    failed += 1;
                }
            }
            pool.restore(index);
            key.clear(head);
        }

        assert_eq!(failed, 1);
        assert_eq!(Substitutor::apply(text, &key), "TEN");
        assert_eq!(pool.to_letters(), "AOISHRDLCUMWFGYPBVKJXQZ");
    }

    #[test]
    fn budget_stops_the_search() {
        let dict = Dictionary::new();
        let text = "AB CD";
        let order = cipher_order(text);
        let mut pool = RemainingPool::new();
        let mut key = Key::new();
        let mut assigner =
            KeyAssigner::new(DeadendEvaluator::new(text, &dict, 0.85)).with_budget(Some(10));
        assert_eq!(assigner.assign(&order, &mut pool, &mut key), Outcome::OutOfBudget);
        assert_eq!(assigner.stats().nodes, 10);
    }

    #[test]
    fn incremental_and_naive_find_the_same_key() {
        let dict = Dictionary::from_words(["THE", "CAT", "SAT", "ON", "MAT", "A", "HAT"]);
        let plain = "THE CAT SAT ON THE MAT";
        let secret = Key::from_pairs("QWERTYUIOPASDFGHJKLZXCVBNM".chars().zip('A'..='Z')).unwrap();
        let text = Substitutor::encrypt_with(plain, &secret);
        let order = cipher_order(&text);

        let mut naive_key = Key::new();
        let mut naive =
            KeyAssigner::new(DeadendEvaluator::new(&text, &dict, 0.6));
        let naive_outcome = naive.assign(&order, &mut RemainingPool::new(), &mut naive_key);

        let mut fast_key = Key::new();
        let mut fast = KeyAssigner::new(ResolutionContext::new(&text, &dict, 0.6));
        let fast_outcome = fast.assign(&order, &mut RemainingPool::new(), &mut fast_key);

        assert_eq!(naive_outcome, fast_outcome);
        assert_eq!(naive_key, fast_key);
        assert_eq!(naive.stats(), fast.stats());
        assert_eq!(fast_outcome, Outcome::Solved);
    }
}
