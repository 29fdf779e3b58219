//! Thread-safe key registry and deduplication filter.
//!
//! [`ConcurrentKeySeenRegistry`] splits its key set into power-of-two many
//! shards, each a `parking_lot::Mutex<HashSet<K, S>>`. A key always maps to
//! the same shard, so insert-if-absent is atomic per key while inserts of
//! unrelated keys mostly proceed on different locks. Callers never lock.
//!
//! # Guarantee
//!
//! When [`ConcurrentDedupFilter::test`] is invoked from many threads against
//! the same filter, every distinct key is accepted by exactly one call and
//! rejected by all others, under any interleaving. Which occurrence wins is
//! arbitrary; it is not the first in any encounter order.

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use super::DefaultKeyHasher;

/// Shards per available CPU when no shard count is given.
const SHARDS_PER_CPU: usize = 4;

/// Creates a [`ConcurrentDedupFilter`] that accepts exactly one element per key.
///
/// # Examples
///
/// ```rust
/// use statestream::distinct::concurrent_dedup_by_key;
/// use std::thread;
///
/// let dedup = concurrent_dedup_by_key(|value: &u32| value % 10);
///
/// let accepted: usize = thread::scope(|scope| {
///     let handles: Vec<_> = (0..4)
///         .map(|_| scope.spawn(|| (0..100).filter(|value| dedup.test(value)).count()))
///         .collect();
///     handles.into_iter().map(|handle| handle.join().unwrap()).sum()
/// });
///
/// assert_eq!(accepted, 10);
/// ```
pub fn concurrent_dedup_by_key<T, K, F>(key_function: F) -> ConcurrentDedupFilter<F, K>
where
    T: ?Sized,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    ConcurrentDedupFilter::new(key_function)
}

// =============================================================================
// ConcurrentKeySeenRegistry
// =============================================================================

/// A set of observed keys supporting concurrent insert-if-absent.
///
/// # Type Parameters
///
/// * `K` - The key type
/// * `S` - The hasher builder, shared by shard selection and every shard
///
/// # Examples
///
/// ```rust
/// use statestream::distinct::ConcurrentKeySeenRegistry;
/// use std::sync::Arc;
/// use std::thread;
///
/// let registry = Arc::new(ConcurrentKeySeenRegistry::new());
///
/// let handles: Vec<_> = (0..8)
///     .map(|_| {
///         let registry = Arc::clone(&registry);
///         thread::spawn(move || registry.insert_if_absent("shared"))
///     })
///     .collect();
///
/// let winners = handles
///     .into_iter()
///     .map(|handle| handle.join().unwrap())
///     .filter(|inserted| *inserted)
///     .count();
/// assert_eq!(winners, 1);
/// ```
#[derive(Debug)]
pub struct ConcurrentKeySeenRegistry<K, S = DefaultKeyHasher> {
    shards: Box<[Mutex<HashSet<K, S>>]>,
    shard_shift: u32,
    hasher: S,
}

impl<K> ConcurrentKeySeenRegistry<K> {
    /// Creates an empty registry with the default hasher and a shard count
    /// derived from the number of CPUs.
    pub fn new() -> Self {
        Self::with_shard_count(num_cpus::get() * SHARDS_PER_CPU, DefaultKeyHasher::default())
    }
}

impl<K, S: Clone> ConcurrentKeySeenRegistry<K, S> {
    /// Creates an empty registry with the default shard count and `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_shard_count(num_cpus::get() * SHARDS_PER_CPU, hasher)
    }

    /// Creates an empty registry with at least `shard_count` shards.
    ///
    /// The count is rounded up to a power of two; zero is treated as one.
    pub fn with_shard_count(shard_count: usize, hasher: S) -> Self {
        let shard_count = shard_count.max(1).next_power_of_two();
        tracing::debug!(shard_count, "constructed concurrent key registry");

        let shards = (0..shard_count)
            .map(|_| Mutex::new(HashSet::with_hasher(hasher.clone())))
            .collect();

        Self {
            shards,
            shard_shift: u64::BITS - shard_count.trailing_zeros(),
            hasher,
        }
    }
}

impl<K, S> ConcurrentKeySeenRegistry<K, S> {
    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the number of distinct keys observed so far.
    ///
    /// Shards are locked one at a time, so the count is only exact when no
    /// insert runs concurrently.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Returns `true` if no key has been observed.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }
}

impl<K, S> ConcurrentKeySeenRegistry<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Atomically inserts `key` unless it is already present.
    ///
    /// Returns `true` for exactly one of any number of concurrent calls with
    /// equal keys.
    pub fn insert_if_absent(&self, key: K) -> bool {
        self.shard_for(&key).lock().insert(key)
    }

    /// Returns `true` if `key` has been observed.
    pub fn contains(&self, key: &K) -> bool {
        self.shard_for(key).lock().contains(key)
    }

    fn shard_for(&self, key: &K) -> &Mutex<HashSet<K, S>> {
        // High bits pick the shard; the shard's own table indexes by low bits.
        let hash = self.hasher.hash_one(key);
        let index = hash.checked_shr(self.shard_shift).unwrap_or(0);
        &self.shards[usize::try_from(index).unwrap_or(0)]
    }
}

impl<K> Default for ConcurrentKeySeenRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConcurrentDedupFilter
// =============================================================================

/// A deduplication predicate safe to call from many threads at once.
///
/// Same contract as [`DedupFilter`](super::DedupFilter), but
/// [`test`](Self::test) takes `&self` and the filter is `Sync` whenever the
/// key projection is `Sync` and keys are `Send`.
#[derive(Debug)]
pub struct ConcurrentDedupFilter<F, K, S = DefaultKeyHasher> {
    key_function: F,
    registry: ConcurrentKeySeenRegistry<K, S>,
}

impl<F, K> ConcurrentDedupFilter<F, K> {
    /// Creates a filter with an empty registry.
    pub fn new(key_function: F) -> Self {
        Self {
            key_function,
            registry: ConcurrentKeySeenRegistry::new(),
        }
    }
}

impl<F, K, S> ConcurrentDedupFilter<F, K, S> {
    /// Creates a filter over an existing, typically empty, registry.
    pub const fn with_registry(key_function: F, registry: ConcurrentKeySeenRegistry<K, S>) -> Self {
        Self {
            key_function,
            registry,
        }
    }

    /// Returns the registry of observed keys.
    pub const fn registry(&self) -> &ConcurrentKeySeenRegistry<K, S> {
        &self.registry
    }

    /// Returns the number of distinct keys accepted so far.
    pub fn seen_count(&self) -> usize {
        self.registry.len()
    }
}

impl<F, K, S> ConcurrentDedupFilter<F, K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns `true` if this call is the one that recorded `element`'s key.
    pub fn test<T>(&self, element: &T) -> bool
    where
        T: ?Sized,
        F: Fn(&T) -> K,
    {
        self.registry.insert_if_absent((self.key_function)(element))
    }

    /// Like [`test`](Self::test), for a fallible key projection.
    ///
    /// # Errors
    ///
    /// Returns the projection's error unchanged without touching the registry.
    pub fn try_test<T, E>(&self, element: &T) -> Result<bool, E>
    where
        T: ?Sized,
        F: Fn(&T) -> Result<K, E>,
    {
        let key = (self.key_function)(element)?;
        Ok(self.registry.insert_if_absent(key))
    }

    /// Borrows the filter as a predicate closure.
    pub fn as_predicate<T>(&self) -> impl Fn(&T) -> bool + '_
    where
        T: ?Sized,
        F: Fn(&T) -> K,
    {
        move |element: &T| self.test(element)
    }

    /// Converts the filter into an owned predicate closure.
    pub fn into_predicate<T>(self) -> impl Fn(&T) -> bool
    where
        T: ?Sized,
        F: Fn(&T) -> K,
    {
        move |element: &T| self.test(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(3, 4)]
    #[case(16, 16)]
    #[case(17, 32)]
    fn shard_count_rounds_to_power_of_two(#[case] requested: usize, #[case] expected: usize) {
        let registry: ConcurrentKeySeenRegistry<u64> =
            ConcurrentKeySeenRegistry::with_shard_count(requested, DefaultKeyHasher::default());
        assert_eq!(registry.shard_count(), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(8)]
    fn insert_if_absent_reports_first_insertion_only(#[case] shard_count: usize) {
        let registry =
            ConcurrentKeySeenRegistry::with_shard_count(shard_count, DefaultKeyHasher::default());

        assert!(registry.is_empty());
        assert!(registry.insert_if_absent(42));
        assert!(!registry.insert_if_absent(42));
        assert!(registry.insert_if_absent(7));
        assert!(registry.contains(&42));
        assert!(!registry.contains(&1));
        assert_eq!(registry.len(), 2);
    }

    #[rstest]
    fn test_accepts_first_occurrence_sequentially() {
        let dedup = concurrent_dedup_by_key(|value: &i32| *value);

        let survivors: Vec<i32> = [1, 2, 1, 3, 2, 4]
            .into_iter()
            .filter(|value| dedup.test(value))
            .collect();

        assert_eq!(survivors, vec![1, 2, 3, 4]);
        assert_eq!(dedup.seen_count(), 4);
    }

    #[rstest]
    fn test_accepts_each_key_once_across_threads() {
        let dedup = concurrent_dedup_by_key(|value: &usize| value % 50);
        let accepted = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for value in 0..500 {
                        if dedup.test(&value) {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(accepted.load(Ordering::SeqCst), 50);
        assert_eq!(dedup.seen_count(), 50);
    }

    #[rstest]
    fn try_test_propagates_projection_error() {
        let dedup = ConcurrentDedupFilter::new(|text: &str| text.parse::<u8>());

        assert_eq!(dedup.try_test("1"), Ok(true));
        assert!(dedup.try_test("x").is_err());
        assert_eq!(dedup.try_test("1"), Ok(false));
    }

    #[rstest]
    fn as_predicate_shares_registry_with_filter() {
        let dedup = concurrent_dedup_by_key(|value: &i32| *value);

        let first: Vec<i32> = vec![1, 2].into_iter().filter(dedup.as_predicate()).collect();
        let second: Vec<i32> = vec![2, 3].into_iter().filter(dedup.as_predicate()).collect();

        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![3]);
    }

    #[rstest]
    fn into_predicate_filters_iterator() {
        let predicate = concurrent_dedup_by_key(|value: &u32| value % 100).into_predicate();
        let survivors: Vec<u32> = (0..1000).filter(predicate).collect();

        assert_eq!(survivors, (0..100).collect::<Vec<_>>());
    }

    #[rstest]
    fn with_registry_uses_supplied_registry() {
        let registry = ConcurrentKeySeenRegistry::with_shard_count(2, DefaultKeyHasher::default());
        let dedup = ConcurrentDedupFilter::with_registry(|value: &i32| *value, registry);

        assert!(dedup.test(&5));
        assert_eq!(dedup.registry().shard_count(), 2);
    }
}
