//! StringInterner: append-only table from a string's hash back to the string.
//!
//! Entries are never removed. The table grows with every distinct string a
//! context ever sees, independent of slot reuse in the allocator.

use core::hash::BuildHasher;
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;

/// Returned by `resolve` for a hash that was never recorded.
pub const UNKNOWN: &str = "N/A";

/// Hash reserved for the empty string.
pub const EMPTY_HASH: u64 = 0;

#[derive(Debug)]
pub struct StringInterner<S = RandomState> {
    hasher: S,
    table: HashMap<u64, String>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> StringInterner<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: HashMap::new(),
        }
    }

    /// Hash of `s` without recording it. `""` always hashes to `EMPTY_HASH`.
    pub fn hash_of(&self, s: &str) -> u64 {
        if s.is_empty() {
            EMPTY_HASH
        } else {
            self.hasher.hash_one(s)
        }
    }

    /// Record `s` and return its hash.
    ///
    /// Re-recording a known string does not write. Two distinct strings with
    /// equal hashes are not told apart: the later one replaces the readable
    /// form and both map to the same slot identity.
    pub fn record(&mut self, s: &str) -> u64 {
        let hash = self.hash_of(s);
        match self.table.get_mut(&hash) {
            Some(existing) if existing.as_str() == s => {}
            Some(existing) => {
                tracing::warn!(
                    hash,
                    previous = %existing,
                    current = s,
                    "hash collision between interned strings"
                );
                s.clone_into(existing);
            }
            None => {
                self.table.insert(hash, s.to_owned());
            }
        }
        hash
    }
}

impl<S> StringInterner<S> {
    pub fn lookup(&self, hash: u64) -> Option<&str> {
        self.table.get(&hash).map(String::as_str)
    }

    /// Like `lookup`, falling back to `UNKNOWN`.
    pub fn resolve(&self, hash: u64) -> &str {
        self.lookup(hash).unwrap_or(UNKNOWN)
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.table.contains_key(&hash)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Recorded `(hash, string)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.table.iter().map(|(&h, s)| (h, s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            7
        }
    }

    #[test]
    fn record_then_lookup() {
        let mut i = StringInterner::new();
        let h = i.record("abc");
        assert_eq!(i.lookup(h), Some("abc"));
        assert_eq!(i.resolve(h), "abc");
        assert!(i.contains(h));
    }

    #[test]
    fn record_is_idempotent() {
        let mut i = StringInterner::new();
        let a = i.record("same");
        let b = i.record("same");
        assert_eq!(a, b);
        assert_eq!(i.len(), 1);
    }

    #[test]
    fn empty_string_hashes_to_zero() {
        let mut i = StringInterner::new();
        assert_eq!(i.hash_of(""), EMPTY_HASH);
        assert_eq!(i.record(""), EMPTY_HASH);
        assert_eq!(i.lookup(EMPTY_HASH), Some(""));
    }

    #[test]
    fn unknown_hash_resolves_to_sentinel() {
        let i = StringInterner::new();
        assert!(i.is_empty());
        assert_eq!(i.lookup(42), None);
        assert_eq!(i.resolve(42), UNKNOWN);
    }

    #[test]
    fn hash_of_does_not_record() {
        let i = StringInterner::new();
        let h = i.hash_of("ghost");
        assert!(!i.contains(h));
    }

    /// A collision shares one identity; the later string wins the readable form.
    #[test]
    fn collision_shadows_earlier_string() {
        let mut i = StringInterner::with_hasher(ConstBuildHasher);
        let a = i.record("first");
        let b = i.record("second");
        assert_eq!(a, b);
        assert_eq!(i.len(), 1);
        assert_eq!(i.resolve(a), "second");
    }

    #[test]
    fn iter_yields_every_entry() {
        let mut i = StringInterner::new();
        let ha = i.record("a");
        let hb = i.record("b");
        let mut seen: Vec<(u64, String)> = i.iter().map(|(h, s)| (h, s.to_owned())).collect();
        seen.sort();
        let mut expected = vec![(ha, "a".to_owned()), (hb, "b".to_owned())];
        expected.sort();
        assert_eq!(seen, expected);
    }
}
