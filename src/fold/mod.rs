//! Three-part folds and the batch partitioner.
//!
//! This module provides the [`Fold`] trait, a reduction split into an
//! initial-state constructor, a per-element accumulate step and a merge step
//! for two partial states. Splitting the reduction this way lets the same
//! batching logic run under a plain loop, an `Iterator`, or a parallel
//! split/merge driver, and lets callers plug in an arbitrary final transform.
//!
//! - [`Fold`]: The fold abstraction
//! - [`MapOutput`]: A fold whose output is post-processed by a function
//! - [`BatchPartitioner`]: Groups elements into ordered, bounded-size partitions
//! - [`PartitionState`]: The accumulation state of a [`BatchPartitioner`]
//!
//! # Examples
//!
//! ```rust
//! use statestream::fold::{Fold, partition};
//!
//! let partitioner = partition(2).unwrap();
//! assert_eq!(
//!     partitioner.fold_all(vec![1, 2, 3, 4, 5]),
//!     vec![vec![1, 2], vec![3, 4], vec![5]]
//! );
//!
//! // The same partitioner with a final transform plugged in.
//! let sums = partitioner.map_output(|partitions: Vec<Vec<i32>>| {
//!     partitions
//!         .into_iter()
//!         .map(|partition| partition.into_iter().sum::<i32>())
//!         .collect::<Vec<_>>()
//! });
//! assert_eq!(sums.fold_all(vec![1, 2, 3, 4, 5]), vec![3, 7, 5]);
//! ```

mod error;
mod partition;

pub use error::InvalidPartitionSizeError;
pub use partition::{BatchPartitioner, PartitionState, partition};

#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// A reduction expressed as three composable steps.
///
/// A `Fold` never iterates by itself. A driver creates a state with
/// [`new_state`](Fold::new_state), feeds elements through
/// [`accumulate`](Fold::accumulate), optionally combines partial states with
/// [`merge`](Fold::merge), and converts the final state with
/// [`finish`](Fold::finish).
///
/// # Merge Contract
///
/// `merge(left, right)` must only be called with `left` holding the results
/// of elements that precede, in encounter order, every element in `right`.
/// Individual implementations may add stronger preconditions; see
/// [`BatchPartitioner`].
///
/// # Examples
///
/// ```rust
/// use statestream::fold::{Fold, partition};
///
/// let partitioner = partition(3).unwrap();
///
/// let mut state = partitioner.new_state();
/// for element in 1..=4 {
///     partitioner.accumulate(&mut state, element);
/// }
/// assert_eq!(partitioner.finish(state), vec![vec![1, 2, 3], vec![4]]);
/// ```
pub trait Fold<T> {
    /// The mutable accumulation state.
    type State;

    /// The value produced from a finished state.
    type Output;

    /// Creates a fresh, empty state.
    fn new_state(&self) -> Self::State;

    /// Folds one element into the state.
    fn accumulate(&self, state: &mut Self::State, element: T);

    /// Combines two partial states, `left` preceding `right` in encounter order.
    fn merge(&self, left: Self::State, right: Self::State) -> Self::State;

    /// Converts a state into the final output.
    fn finish(&self, state: Self::State) -> Self::Output;

    /// Runs the fold sequentially over `elements`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statestream::fold::{Fold, partition};
    ///
    /// let partitioner = partition(2).unwrap();
    /// let empty: Vec<i32> = Vec::new();
    /// assert!(partitioner.fold_all(empty).is_empty());
    /// ```
    fn fold_all<I>(&self, elements: I) -> Self::Output
    where
        I: IntoIterator<Item = T>,
    {
        let mut state = self.new_state();
        for element in elements {
            self.accumulate(&mut state, element);
        }
        self.finish(state)
    }

    /// Returns a fold that applies `transform` to the output of this fold.
    ///
    /// The accumulate and merge steps are unchanged.
    fn map_output<G, O>(self, transform: G) -> MapOutput<Self, G>
    where
        Self: Sized,
        G: Fn(Self::Output) -> O,
    {
        MapOutput {
            inner: self,
            transform,
        }
    }

    /// Runs the fold over a parallel iterator with rayon's split/merge driver.
    ///
    /// Each worker folds a contiguous sub-range into its own state, and the
    /// partial states are merged in encounter order. The result is only as
    /// correct as this fold's [`merge`](Fold::merge) under arbitrary splits;
    /// [`BatchPartitioner`] does not guarantee that.
    #[cfg(feature = "rayon")]
    fn fold_parallel<I>(&self, elements: I) -> Self::Output
    where
        Self: Sync,
        Self::State: Send,
        T: Send,
        I: IntoParallelIterator<Item = T>,
    {
        let state = elements
            .into_par_iter()
            .fold(
                || self.new_state(),
                |mut state, element| {
                    self.accumulate(&mut state, element);
                    state
                },
            )
            .reduce(|| self.new_state(), |left, right| self.merge(left, right));
        self.finish(state)
    }
}

/// A [`Fold`] whose output is transformed by a function.
///
/// Created by [`Fold::map_output`].
#[derive(Debug, Clone, Copy)]
pub struct MapOutput<F, G> {
    inner: F,
    transform: G,
}

impl<F, G> MapOutput<F, G> {
    /// Returns a reference to the wrapped fold.
    pub const fn inner(&self) -> &F {
        &self.inner
    }
}

impl<T, F, G, O> Fold<T> for MapOutput<F, G>
where
    F: Fold<T>,
    G: Fn(F::Output) -> O,
{
    type State = F::State;
    type Output = O;

    fn new_state(&self) -> Self::State {
        self.inner.new_state()
    }

    fn accumulate(&self, state: &mut Self::State, element: T) {
        self.inner.accumulate(state, element);
    }

    fn merge(&self, left: Self::State, right: Self::State) -> Self::State {
        self.inner.merge(left, right)
    }

    fn finish(&self, state: Self::State) -> Self::Output {
        (self.transform)(self.inner.finish(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fold_all_matches_manual_accumulation() {
        let partitioner = partition(2).unwrap();

        let mut state = partitioner.new_state();
        for element in 0..7 {
            partitioner.accumulate(&mut state, element);
        }

        assert_eq!(partitioner.finish(state), partitioner.fold_all(0..7));
    }

    #[rstest]
    fn map_output_transforms_finished_state() {
        let counted = partition(3)
            .unwrap()
            .map_output(|partitions: Vec<Vec<char>>| partitions.len());

        assert_eq!(counted.fold_all("abcdefg".chars()), 3);
    }

    #[rstest]
    fn map_output_keeps_merge_behavior() {
        let lengths = partition(2)
            .unwrap()
            .map_output(|partitions: Vec<Vec<i32>>| {
                partitions.iter().map(Vec::len).collect::<Vec<_>>()
            });

        let mut left = lengths.new_state();
        lengths.accumulate(&mut left, 1);
        lengths.accumulate(&mut left, 2);
        let mut right = lengths.new_state();
        lengths.accumulate(&mut right, 3);

        let merged = lengths.merge(left, right);
        assert_eq!(lengths.finish(merged), vec![2, 1]);
    }

    #[rstest]
    fn map_output_exposes_inner_fold() {
        let mapped = partition(4).unwrap().map_output(|partitions: Vec<Vec<u8>>| partitions);
        assert_eq!(mapped.inner().partition_size(), 4);
    }
}
