// File: src/core/frequency.rs
use crate::core::types::ALPHABET_LEN;

/// Occurrence count of every ASCII letter in `text`, case-normalized.
/// Index 0 is `A`.
pub fn letter_counts(text: &str) -> [usize; ALPHABET_LEN] {
    let mut counts = [0; ALPHABET_LEN];
    for b in text.bytes().filter(u8::is_ascii_alphabetic) {
        counts[(b.to_ascii_uppercase() - b'A') as usize] += 1;
    }
    counts
}

/// Ranks the distinct letters of `text` by descending count.
///
/// Letters with equal counts keep the order of their first appearance in the
/// text, so the ranking is fully determined by the input.
pub fn cipher_order(text: &str) -> Vec<u8> {
    let counts = letter_counts(text);

    let mut order: Vec<u8> = Vec::with_capacity(ALPHABET_LEN);
    for b in text.bytes().filter(u8::is_ascii_alphabetic) {
        let letter = b.to_ascii_uppercase();
        if !order.contains(&letter) {
            order.push(letter);
        }
    }

    // Stable sort keeps first-appearance order among ties.
    order.sort_by_key(|&l| std::cmp::Reverse(counts[(l - b'A') as usize]));
    order
}
