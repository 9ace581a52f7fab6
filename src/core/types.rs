// File: src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of letters in both the cipher and the plaintext alphabet.
pub const ALPHABET_LEN: usize = 26;

/// Plaintext letters ordered by general English frequency, most common first.
/// Candidate plaintext letters are always tried in this order.
pub const PLAINTEXT_ALPHABET: [u8; ALPHABET_LEN] = *b"ETAOINSHRDLCUMWFGYPBVKJXQZ";

/// Marks a cipher letter whose plaintext counterpart is still unknown.
pub const PLACEHOLDER: char = '_';

/// Table index of an ASCII letter, case-normalized. `None` for anything else.
#[inline]
fn slot(letter: u8) -> Option<usize> {
    letter
        .is_ascii_alphabetic()
        .then(|| (letter.to_ascii_uppercase() - b'A') as usize)
}

/// A partial, injective mapping from cipher letters to plaintext letters.
///
/// Injectivity is the caller's responsibility during search: `KeyAssigner`
/// only ever draws targets from the `RemainingPool`, which holds exactly the
/// unused plaintext letters. Deserialization checks both properties.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "KeyTable")]
pub struct Key {
    table: [Option<u8>; ALPHABET_LEN],
}

#[derive(Deserialize)]
struct KeyTable {
    table: [Option<u8>; ALPHABET_LEN],
}

impl TryFrom<KeyTable> for Key {
    type Error = String;

    fn try_from(raw: KeyTable) -> Result<Self, Self::Error> {
        let mut seen = 0u32;
        for plain in raw.table.iter().flatten() {
            if !plain.is_ascii_uppercase() {
                return Err(format!("key target {plain} is not an uppercase letter"));
            }
            let bit = 1 << (plain - b'A');
            if seen & bit != 0 {
                return Err(format!("key maps two letters onto {}", *plain as char));
            }
            seen |= bit;
        }
        Ok(Key { table: raw.table })
    }
}

impl Key {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a key from `(cipher, plain)` pairs. Returns `None` if a letter is
    /// not ASCII alphabetic or the pairs would break injectivity.
    pub fn from_pairs<I>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let mut key = Self::new();
        for (cipher, plain) in pairs {
            if !cipher.is_ascii_alphabetic() || !plain.is_ascii_alphabetic() {
                return None;
            }
            let cipher = cipher.to_ascii_uppercase() as u8;
            let plain = plain.to_ascii_uppercase() as u8;
            match key.get(cipher) {
                Some(existing) if existing != plain => return None,
                _ => {}
            }
            if key.is_target(plain) && key.get(cipher) != Some(plain) {
                return None;
            }
            key.set(cipher, plain);
        }
        Some(key)
    }

    /// Plaintext letter for `cipher`; `None` if unassigned or not a letter.
    #[inline]
    pub fn get(&self, cipher: u8) -> Option<u8> {
        slot(cipher).and_then(|i| self.table[i])
    }

    /// Maps `cipher` onto `plain`, both case-normalized. Returns `false` and
    /// leaves the key untouched if either byte is not an ASCII letter.
    #[inline]
    pub fn set(&mut self, cipher: u8, plain: u8) -> bool {
        match slot(cipher) {
            Some(i) if plain.is_ascii_alphabetic() => {
                self.table[i] = Some(plain.to_ascii_uppercase());
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn clear(&mut self, cipher: u8) {
        if let Some(i) = slot(cipher) {
            self.table[i] = None;
        }
    }

    /// Whether some cipher letter already maps onto `plain`.
    pub fn is_target(&self, plain: u8) -> bool {
        self.table.iter().any(|&p| p == Some(plain))
    }

    /// Number of cipher letters with an assignment.
    pub fn len(&self) -> usize {
        self.table.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bitmask of assigned cipher letters, bit 0 = `A`.
    pub fn assigned_mask(&self) -> u32 {
        self.table
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_some())
            .fold(0, |mask, (i, _)| mask | 1 << i)
    }

    /// Whether every letter in `cipher_letters` has an assignment.
    pub fn is_complete_for(&self, cipher_letters: &[u8]) -> bool {
        cipher_letters.iter().all(|&c| self.get(c).is_some())
    }

    /// The inverse mapping (plaintext → cipher).
    pub fn inverse(&self) -> Key {
        let mut inverse = Key::new();
        for (cipher, plain) in self.pairs() {
            inverse.set(plain, cipher);
        }
        inverse
    }

    /// Assigned `(cipher, plain)` pairs in cipher-alphabet order.
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.table
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (b'A' + i as u8, p)))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(")?;
        for (cipher, plain) in self.pairs() {
            write!(f, "{}→{} ", cipher as char, plain as char)?;
        }
        write!(f, ")")
    }
}

/// Two rows: the cipher alphabet and, beneath it, each letter's plaintext
/// counterpart (or the placeholder).
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in b'A'..=b'Z' {
            write!(f, "{}", c as char)?;
        }
        writeln!(f)?;
        for plain in self.table.iter() {
            match plain {
                Some(p) => write!(f, "{}", *p as char)?,
                None => write!(f, "{PLACEHOLDER}")?,
            }
        }
        Ok(())
    }
}

/// Plaintext letters not yet used as a mapping target.
///
/// Stored arena-style: the frequency order never changes, a bitmask records
/// which slots are taken. Taking and returning a letter leaves every other
/// letter at its original index, so restoration after a failed branch is exact.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RemainingPool {
    order: [u8; ALPHABET_LEN],
    taken: u32,
}

impl RemainingPool {
    pub fn new() -> Self {
        Self::with_order(PLAINTEXT_ALPHABET)
    }

    pub fn with_order(order: [u8; ALPHABET_LEN]) -> Self {
        Self { order, taken: 0 }
    }

    /// Removes the letter at `index`. O(1).
    pub fn take(&mut self, index: usize) -> u8 {
        debug_assert!(self.taken & (1 << index) == 0, "slot {index} already taken");
        self.taken |= 1 << index;
        self.order[index]
    }

    /// Reinserts the letter previously taken from `index`. O(1).
    pub fn restore(&mut self, index: usize) {
        debug_assert!(self.taken & (1 << index) != 0, "slot {index} not taken");
        self.taken &= !(1 << index);
    }

    /// Available `(index, letter)` pairs in pool order.
    pub fn available(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.order
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.taken & (1 << i) == 0)
            .map(|(i, &l)| (i, l))
    }

    pub fn len(&self) -> usize {
        ALPHABET_LEN - self.taken.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, letter: u8) -> bool {
        self.available().any(|(_, l)| l == letter)
    }

    /// Remaining letters as a string, in pool order.
    pub fn to_letters(&self) -> String {
        self.available().map(|(_, l)| l as char).collect()
    }
}

impl Default for RemainingPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RemainingPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemainingPool({})", self.to_letters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_a_permutation() {
        let mut letters = PLAINTEXT_ALPHABET.to_vec();
        letters.sort_unstable();
        assert_eq!(letters, (b'A'..=b'Z').collect::<Vec<_>>());
    }

    #[test]
    fn pool_restores_to_original_index() {
        let mut pool = RemainingPool::new();
        let before = pool;

        let t = pool.take(1);
        assert_eq!(t, b'T');
        assert!(!pool.contains(b'T'));
        assert_eq!(pool.to_letters(), "EAOINSHRDLCUMWFGYPBVKJXQZ");

        pool.restore(1);
        assert_eq!(pool, before);
        assert_eq!(pool.to_letters(), "ETAOINSHRDLCUMWFGYPBVKJXQZ");
    }

    #[test]
    fn from_pairs_rejects_non_injective_keys() {
        assert!(Key::from_pairs([('A', 'E'), ('B', 'E')]).is_none());
        assert!(Key::from_pairs([('A', 'E'), ('A', 'T')]).is_none());
        assert!(Key::from_pairs([('A', '1')]).is_none());

        let key = Key::from_pairs([('a', 'n'), ('B', 'O')]).unwrap();
        assert_eq!(key.get(b'A'), Some(b'N'));
        assert_eq!(key.len(), 2);
    }

    #[test]
    fn non_letters_are_ignored() {
        let mut key = Key::new();
        assert!(!key.set(b'1', b'E'));
        assert!(!key.set(b'A', b'_'));
        assert!(key.is_empty());
        assert_eq!(key.get(b' '), None);
        key.clear(0xFF);

        assert!(key.set(b'q', b'e'));
        assert_eq!(key.get(b'Q'), Some(b'E'));
    }

    #[test]
    fn deserialization_rejects_malformed_tables() {
        let key = Key::from_pairs([('A', 'N'), ('B', 'O')]).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(serde_json::from_str::<Key>(&json).unwrap(), key);

        let mut table = vec![None::<u8>; ALPHABET_LEN];
        table[0] = Some(200);
        let bad_letter = serde_json::json!({ "table": table }).to_string();
        assert!(serde_json::from_str::<Key>(&bad_letter).is_err());

        table[0] = Some(b'E');
        table[1] = Some(b'E');
        let not_injective = serde_json::json!({ "table": table }).to_string();
        assert!(serde_json::from_str::<Key>(&not_injective).is_err());
    }

    #[test]
    fn inverse_swaps_directions() {
        let key = Key::from_pairs([('X', 'E'), ('Q', 'T')]).unwrap();
        let inverse = key.inverse();
        assert_eq!(inverse.get(b'E'), Some(b'X'));
        assert_eq!(inverse.get(b'T'), Some(b'Q'));
        assert_eq!(inverse.inverse(), key);
    }

    #[test]
    fn display_shows_placeholder_for_unassigned() {
        let key = Key::from_pairs([('B', 'E')]).unwrap();
        let shown = key.to_string();
        let rows: Vec<&str> = shown.lines().collect();
        assert_eq!(rows[0], "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert!(rows[1].starts_with("_E_"));
    }
}
