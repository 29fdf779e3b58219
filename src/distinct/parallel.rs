//! Rayon integration for concurrent deduplication.

use std::hash::Hash;

use rayon::iter::ParallelIterator;

use super::ConcurrentDedupFilter;

/// Extension trait adding key-based deduplication to rayon parallel iterators.
///
/// # Examples
///
/// ```rust
/// use rayon::prelude::*;
/// use statestream::distinct::ParallelDistinctExt;
///
/// let survivors = (0..10_000_u32)
///     .into_par_iter()
///     .par_distinct_by_key(|value: &u32| value % 100)
///     .count();
///
/// assert_eq!(survivors, 100);
/// ```
pub trait ParallelDistinctExt: ParallelIterator {
    /// Keeps exactly one element per projected key.
    ///
    /// Which element survives for a key depends on thread scheduling.
    fn par_distinct_by_key<K, F>(self, key_function: F) -> impl ParallelIterator<Item = Self::Item>
    where
        K: Hash + Eq + Send,
        F: Fn(&Self::Item) -> K + Sync + Send,
    {
        let dedup = ConcurrentDedupFilter::new(key_function);
        self.filter(move |element| dedup.test(element))
    }
}

impl<I: ParallelIterator> ParallelDistinctExt for I {}
