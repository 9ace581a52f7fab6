// File: src/core/context.rs
use crate::core::deadend::{judge, Pruner, Verdict};
use crate::core::dictionary::Dictionary;
use crate::core::substitutor::Substitutor;
use crate::core::types::{Key, ALPHABET_LEN, PLACEHOLDER};

struct Token<'a> {
    cipher: &'a str,
    /// Distinct cipher letters in the token, bit 0 = `A`.
    letters: u32,
    /// Holds a literal placeholder, so substitution never resolves it.
    unresolvable: bool,
}

/// Incremental bookkeeping of which ciphertext tokens are fully resolved.
///
/// Tokens are indexed by the cipher letters they contain, so assigning a
/// letter only re-examines the tokens it touches. Every `evaluate` pushes the
/// change it made to the running tally; `retract` pops it. Verdicts are
/// identical to [`DeadendEvaluator`](crate::core::deadend::DeadendEvaluator)
/// as long as the search starts from an empty key.
pub struct ResolutionContext<'a> {
    dictionary: &'a Dictionary,
    threshold: f64,
    tokens: Vec<Token<'a>>,
    by_letter: [Vec<usize>; ALPHABET_LEN],
    resolved: usize,
    valid: usize,
    /// (cipher letter, newly resolved, newly valid) per pending evaluation
    frames: Vec<(u8, usize, usize)>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(ciphertext: &'a str, dictionary: &'a Dictionary, threshold: f64) -> Self {
        let mut by_letter: [Vec<usize>; ALPHABET_LEN] = Default::default();
        let mut tokens = Vec::new();
        let mut resolved = 0;
        let mut valid = 0;

        for (idx, cipher) in ciphertext.split_whitespace().enumerate() {
            let letters = cipher
                .bytes()
                .filter(u8::is_ascii_alphabetic)
                .fold(0u32, |mask, b| mask | 1 << (b.to_ascii_uppercase() - b'A'));
            let unresolvable = cipher.contains(PLACEHOLDER);

            if letters == 0 && !unresolvable {
                // Nothing to substitute, so the token is resolved from the start.
                resolved += 1;
                valid += dictionary.contains(cipher) as usize;
            }
            for (slot, list) in by_letter.iter_mut().enumerate() {
                if letters & (1 << slot) != 0 {
                    list.push(idx);
                }
            }
            tokens.push(Token { cipher, letters, unresolvable });
        }

        Self {
            dictionary,
            threshold,
            tokens,
            by_letter,
            resolved,
            valid,
            frames: Vec::new(),
        }
    }

    /// Current `(resolved, valid)` tally.
    pub fn tally(&self) -> (usize, usize) {
        (self.resolved, self.valid)
    }

    /// Number of evaluations not yet retracted.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Pruner for ResolutionContext<'_> {
    fn evaluate(&mut self, key: &Key, cipher: u8) -> Verdict {
        let assigned = key.assigned_mask();
        let mut newly_resolved = 0;
        let mut newly_valid = 0;

        for &idx in &self.by_letter[(cipher - b'A') as usize] {
            let token = &self.tokens[idx];
            // `cipher` was unassigned before this call, so a token whose letters
            // are now all covered has just become resolved.
            if !token.unresolvable && token.letters & !assigned == 0 {
                newly_resolved += 1;
                let decoded = Substitutor::apply(token.cipher, key);
                newly_valid += self.dictionary.contains(&decoded) as usize;
            }
        }

        self.resolved += newly_resolved;
        self.valid += newly_valid;
        self.frames.push((cipher, newly_resolved, newly_valid));

        judge(self.resolved, self.valid, self.threshold)
    }

    fn retract(&mut self, cipher: u8) {
        if let Some((letter, resolved, valid)) = self.frames.pop() {
            debug_assert_eq!(letter, cipher, "retract out of order");
            self.resolved -= resolved;
            self.valid -= valid;
        }
    }
}
