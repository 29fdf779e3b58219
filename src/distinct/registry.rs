//! The sequential key registry.

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use super::DefaultKeyHasher;

/// An owned set of previously observed keys.
///
/// The registry exposes a single mutating operation,
/// [`insert_if_absent`](Self::insert_if_absent). It requires `&mut self`, so
/// a registry can never be shared between filters or threads without the
/// caller adding its own synchronization.
///
/// # Type Parameters
///
/// * `K` - The key type
/// * `S` - The hasher builder (defaults to [`DefaultKeyHasher`])
///
/// # Examples
///
/// ```rust
/// use statestream::distinct::KeySeenRegistry;
///
/// let mut registry = KeySeenRegistry::new();
/// assert!(registry.insert_if_absent("apple"));
/// assert!(!registry.insert_if_absent("apple"));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct KeySeenRegistry<K, S = DefaultKeyHasher> {
    seen: HashSet<K, S>,
}

impl<K> KeySeenRegistry<K> {
    /// Creates an empty registry with the default hasher.
    pub fn new() -> Self {
        Self::with_hasher(DefaultKeyHasher::default())
    }
}

impl<K, S> KeySeenRegistry<K, S> {
    /// Creates an empty registry using `hasher` to hash keys.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            seen: HashSet::with_hasher(hasher),
        }
    }

    /// Returns the number of distinct keys observed so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if no key has been observed.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl<K, S> KeySeenRegistry<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts `key` unless it is already present.
    ///
    /// Returns `true` if the key was newly inserted.
    pub fn insert_if_absent(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    /// Returns `true` if `key` has been observed.
    pub fn contains(&self, key: &K) -> bool {
        self.seen.contains(key)
    }
}

impl<K, S: Default> Default for KeySeenRegistry<K, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_registry_is_empty() {
        let registry: KeySeenRegistry<i32> = KeySeenRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[rstest]
    fn insert_if_absent_reports_first_insertion_only() {
        let mut registry = KeySeenRegistry::new();

        assert!(registry.insert_if_absent(1));
        assert!(registry.insert_if_absent(2));
        assert!(!registry.insert_if_absent(1));
        assert!(!registry.insert_if_absent(2));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&1));
        assert!(!registry.contains(&3));
    }

    #[rstest]
    fn repeat_keys_do_not_grow_registry() {
        let mut registry = KeySeenRegistry::new();
        for _ in 0..10 {
            registry.insert_if_absent("same");
        }
        assert_eq!(registry.len(), 1);
    }

    #[rstest]
    fn with_hasher_uses_supplied_builder() {
        let mut registry: KeySeenRegistry<String, std::hash::RandomState> =
            KeySeenRegistry::with_hasher(std::hash::RandomState::new());

        assert!(registry.insert_if_absent("key".to_string()));
        assert!(registry.contains(&"key".to_string()));
    }

    #[rstest]
    fn default_matches_new() {
        let registry: KeySeenRegistry<u8> = KeySeenRegistry::default();
        assert!(registry.is_empty());
    }
}
