//! Iterator glue for the stateful primitives.
//!
//! [`StatefulIteratorExt`] lets any `Iterator` act as the driver for the
//! primitives of this crate. Each method builds a fresh primitive, so state
//! never leaks from one pipeline into another.

#[cfg(feature = "distinct")]
use std::hash::Hash;

#[cfg(feature = "distinct")]
use crate::distinct::DedupFilter;
#[cfg(feature = "fold")]
use crate::fold::{BatchPartitioner, Fold, InvalidPartitionSizeError};
#[cfg(feature = "ordinal")]
use crate::ordinal::pair_with_ordinal;

/// Extension methods driving the stateful primitives from an `Iterator`.
///
/// # Examples
///
/// ```rust
/// use statestream::iter::StatefulIteratorExt;
///
/// let labelled: Vec<(&str, usize)> = ["a", "b", "a", "c"]
///     .into_iter()
///     .distinct_by_key(|letter: &&str| *letter)
///     .pair_with_ordinals()
///     .collect();
///
/// assert_eq!(labelled, vec![("a", 0), ("b", 1), ("c", 2)]);
/// ```
pub trait StatefulIteratorExt: Iterator + Sized {
    /// Runs `fold` over the remaining elements.
    #[cfg(feature = "fold")]
    fn fold_with<F>(self, fold: &F) -> F::Output
    where
        F: Fold<Self::Item>,
    {
        fold.fold_all(self)
    }

    /// Collects the remaining elements into partitions of `partition_size`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPartitionSizeError`] if `partition_size` is zero,
    /// before consuming any element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statestream::iter::StatefulIteratorExt;
    ///
    /// assert_eq!((1..=5).partitioned(2).unwrap(), vec![vec![1, 2], vec![3, 4], vec![5]]);
    /// assert!((1..=5).partitioned(0).is_err());
    /// ```
    #[cfg(feature = "fold")]
    fn partitioned(self, partition_size: usize) -> Result<Vec<Vec<Self::Item>>, InvalidPartitionSizeError> {
        let partitioner = BatchPartitioner::new(partition_size)?;
        Ok(partitioner.fold_all(self))
    }

    /// Keeps the first element bearing each projected key.
    #[cfg(feature = "distinct")]
    fn distinct_by_key<K, F>(self, key_function: F) -> impl Iterator<Item = Self::Item>
    where
        K: Hash + Eq,
        F: FnMut(&Self::Item) -> K,
    {
        let mut dedup = DedupFilter::new(key_function);
        self.filter(move |element| dedup.test(element))
    }

    /// Pairs each element with its zero-based position.
    ///
    /// Unlike [`Iterator::enumerate`] the ordinal comes second, matching
    /// [`OrdinalPairer`](crate::ordinal::OrdinalPairer).
    #[cfg(feature = "ordinal")]
    fn pair_with_ordinals(self) -> impl Iterator<Item = (Self::Item, usize)> {
        let mut pairer = pair_with_ordinal();
        self.map(move |element| pairer.pair(element))
    }
}

impl<I: Iterator> StatefulIteratorExt for I {}
