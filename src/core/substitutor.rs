// File: src/core/substitutor.rs
use crate::core::types::{Key, PLACEHOLDER};

/// Applies a (possibly partial) key to text.
pub struct Substitutor;

impl Substitutor {
    /// Replaces every ASCII letter with its plaintext counterpart, or with
    /// [`PLACEHOLDER`] when the key has no entry for it. Everything else,
    /// whitespace and punctuation included, is copied unchanged.
    /// O(n) in the length of `ciphertext`.
    pub fn apply(ciphertext: &str, key: &Key) -> String {
        ciphertext
            .chars()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    key.get(c.to_ascii_uppercase() as u8)
                        .map_or(PLACEHOLDER, char::from)
                } else {
                    c
                }
            })
            .collect()
    }

    /// Encrypts `plaintext` with a key given in the solving direction
    /// (cipher → plain), i.e. substitutes with the key's inverse.
    pub fn encrypt_with(plaintext: &str, key: &Key) -> String {
        Self::apply(plaintext, &key.inverse())
    }

    /// A token is fully resolved once no placeholder remains in it.
    #[inline]
    pub fn is_resolved(token: &str) -> bool {
        !token.contains(PLACEHOLDER)
    }
}
