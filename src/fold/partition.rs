//! Ordered batch partitioning.
//!
//! [`BatchPartitioner`] folds a sequence into consecutive partitions of at
//! most `partition_size` elements. Under sequential use the partitions
//! preserve encounter order, every partition but the last is full, and the
//! last holds between one and `partition_size` elements.
//!
//! # Merge Caveat
//!
//! [`Fold::merge`] concatenates the partition lists of both states. The result
//! keeps the partition invariants only when `left`'s last partition is full.
//! Merging after `left` stopped mid-partition produces a short partition in
//! the middle of the output. That case is reported through `tracing` but left
//! as is: whether parallel partitioning is supported beyond full-partition
//! boundaries is an open design question, and this type does not guess at a
//! rebalancing strategy.

use std::num::NonZeroUsize;

use super::{Fold, InvalidPartitionSizeError, MapOutput};

/// Creates a [`BatchPartitioner`] producing partitions of `partition_size`.
///
/// # Errors
///
/// Returns [`InvalidPartitionSizeError`] if `partition_size` is zero.
///
/// # Examples
///
/// ```rust
/// use statestream::fold::{Fold, partition};
///
/// let partitioner = partition(2).unwrap();
/// assert_eq!(
///     partitioner.fold_all([1, 2, 3, 4, 5]),
///     vec![vec![1, 2], vec![3, 4], vec![5]]
/// );
///
/// assert!(partition(0).is_err());
/// ```
pub fn partition(partition_size: usize) -> Result<BatchPartitioner, InvalidPartitionSizeError> {
    BatchPartitioner::new(partition_size)
}

/// A [`Fold`] grouping elements into ordered partitions of a fixed size.
///
/// The partitioner holds only its configuration. All mutable data lives in
/// [`PartitionState`], so one partitioner can be built once and reused for
/// any number of independent folds.
///
/// # Examples
///
/// ```rust
/// use statestream::fold::{BatchPartitioner, Fold};
///
/// let partitioner = BatchPartitioner::new(3).unwrap();
///
/// let words = partitioner.fold_all(["a", "b", "c", "d"]);
/// assert_eq!(words, vec![vec!["a", "b", "c"], vec!["d"]]);
///
/// // Reused for a second, unrelated fold.
/// let numbers = partitioner.fold_all(0..6);
/// assert_eq!(numbers, vec![vec![0, 1, 2], vec![3, 4, 5]]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchPartitioner {
    partition_size: NonZeroUsize,
}

impl BatchPartitioner {
    /// Creates a partitioner producing partitions of `partition_size`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPartitionSizeError`] if `partition_size` is zero.
    pub fn new(partition_size: usize) -> Result<Self, InvalidPartitionSizeError> {
        NonZeroUsize::new(partition_size).map_or_else(
            || Err(Self::reject(0)),
            |partition_size| {
                tracing::debug!(partition_size = partition_size.get(), "constructed batch partitioner");
                Ok(Self { partition_size })
            },
        )
    }

    /// Creates a partitioner from a signed size.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPartitionSizeError`] if `partition_size` is zero or
    /// negative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statestream::fold::BatchPartitioner;
    ///
    /// assert!(BatchPartitioner::from_signed(4).is_ok());
    /// assert!(BatchPartitioner::from_signed(0).is_err());
    /// assert!(BatchPartitioner::from_signed(-1).is_err());
    /// ```
    pub fn from_signed(partition_size: isize) -> Result<Self, InvalidPartitionSizeError> {
        usize::try_from(partition_size)
            .map_or_else(|_| Err(Self::reject(partition_size)), Self::new)
    }

    /// Creates a partitioner from a size already known to be positive.
    pub const fn from_non_zero(partition_size: NonZeroUsize) -> Self {
        Self { partition_size }
    }

    /// Returns the configured partition size.
    pub const fn partition_size(&self) -> usize {
        self.partition_size.get()
    }

    /// Returns a fold that applies `transform` to every finished partition.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statestream::fold::{BatchPartitioner, Fold};
    ///
    /// let boxed = BatchPartitioner::new(2)
    ///     .unwrap()
    ///     .map_partitions(|partition: Vec<u8>| partition.into_boxed_slice());
    ///
    /// let partitions: Vec<Box<[u8]>> = boxed.fold_all([1, 2, 3]);
    /// assert_eq!(&*partitions[0], &[1, 2]);
    /// assert_eq!(&*partitions[1], &[3]);
    /// ```
    pub fn map_partitions<T, U, G>(
        self,
        transform: G,
    ) -> MapOutput<Self, impl Fn(Vec<Vec<T>>) -> Vec<U>>
    where
        G: Fn(Vec<T>) -> U,
    {
        MapOutput {
            inner: self,
            transform: move |partitions: Vec<Vec<T>>| {
                partitions.into_iter().map(&transform).collect::<Vec<U>>()
            },
        }
    }

    fn reject(partition_size: isize) -> InvalidPartitionSizeError {
        tracing::warn!(partition_size, "rejected non-positive partition size");
        InvalidPartitionSizeError::new(partition_size)
    }
}

/// Accumulation state of a [`BatchPartitioner`].
///
/// Holds the partitions built so far, the number of elements placed in the
/// open partition (`fill_count`) and the index of that partition
/// (`open_partition_index`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionState<T> {
    partitions: Vec<Vec<T>>,
    fill_count: usize,
    open_partition_index: usize,
}

impl<T> PartitionState<T> {
    /// Creates an empty state.
    pub const fn new() -> Self {
        Self {
            partitions: Vec::new(),
            fill_count: 0,
            open_partition_index: 0,
        }
    }

    /// Returns the partitions built so far.
    pub fn partitions(&self) -> &[Vec<T>] {
        &self.partitions
    }

    /// Returns the number of elements in the open partition.
    pub const fn fill_count(&self) -> usize {
        self.fill_count
    }

    /// Returns the index of the partition currently being filled.
    pub const fn open_partition_index(&self) -> usize {
        self.open_partition_index
    }

    /// Returns `true` if no element has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Consumes the state, returning its partitions.
    pub fn into_partitions(self) -> Vec<Vec<T>> {
        self.partitions
    }
}

impl<T> Default for PartitionState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fold<T> for BatchPartitioner {
    type State = PartitionState<T>;
    type Output = Vec<Vec<T>>;

    fn new_state(&self) -> Self::State {
        PartitionState::new()
    }

    fn accumulate(&self, state: &mut Self::State, element: T) {
        if state.fill_count % self.partition_size.get() == 0 {
            state.partitions.push(Vec::new());
            state.open_partition_index = state.partitions.len() - 1;
            state.fill_count = 0;
        }
        state.partitions[state.open_partition_index].push(element);
        state.fill_count += 1;
    }

    /// Concatenates the partitions of `left` and `right`.
    ///
    /// Precondition (not checked): both states were filled from contiguous,
    /// non-interleaved sub-ranges, `left` before `right`, and `left`'s last
    /// partition is full. Otherwise the merged output contains a short
    /// partition before the last one.
    fn merge(&self, mut left: Self::State, right: Self::State) -> Self::State {
        if right.partitions.is_empty() {
            return left;
        }
        if left.partitions.is_empty() {
            return right;
        }

        let left_partitions = left.partitions.len();
        tracing::trace!(
            left_partitions,
            right_partitions = right.partitions.len(),
            "merging partition states"
        );
        if left.fill_count < self.partition_size.get() {
            tracing::warn!(
                fill_count = left.fill_count,
                partition_size = self.partition_size.get(),
                "merging after a partially filled partition; output will hold a short partition before the last"
            );
        }

        left.partitions.extend(right.partitions);
        left.fill_count = right.fill_count;
        left.open_partition_index = left_partitions + right.open_partition_index;
        left
    }

    fn finish(&self, state: Self::State) -> Self::Output {
        state.partitions
    }
}
