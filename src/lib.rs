//! # statestream
//!
//! Stateful stream primitives for Rust: small objects that hold mutable state
//! across invocations and are driven one element at a time by an external
//! iteration driver (`Iterator`, a `rayon` parallel iterator, or a plain loop).
//!
//! ## Overview
//!
//! - **Fold**: A three-part reduction (`new_state`, `accumulate`, `merge`) and
//!   the [`BatchPartitioner`](fold::BatchPartitioner) that groups elements into
//!   fixed-size partitions
//! - **Distinct**: Key-based deduplication filters, sequential and
//!   concurrency-safe
//! - **Ordinal**: Pairing elements with zero-based positions in encounter order
//! - **Iterator glue**: [`StatefulIteratorExt`](iter::StatefulIteratorExt)
//!
//! None of the primitives iterate on their own. They are per-element state
//! transitions handed to whatever drives the sequence.
//!
//! ## Feature Flags
//!
//! - `fold`: The `Fold` trait and the batch partitioner
//! - `distinct`: Sequential deduplication filters
//! - `concurrent`: Thread-safe deduplication filters
//! - `ordinal`: Ordinal pairing
//! - `rayon`: Parallel drivers built on rayon
//! - `fxhash` / `ahash`: Faster default hashers for key registries
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use statestream::prelude::*;
//!
//! let batches = vec![1, 2, 3, 4, 5].into_iter().partitioned(2).unwrap();
//! assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
//!
//! let distinct: Vec<i32> = vec![1, 2, 1, 3, 2, 4]
//!     .into_iter()
//!     .distinct_by_key(|value: &i32| *value)
//!     .collect();
//! assert_eq!(distinct, vec![1, 2, 3, 4]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, traits and factory functions.
///
/// # Usage
///
/// ```rust
/// use statestream::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "fold")]
    pub use crate::fold::*;

    #[cfg(feature = "distinct")]
    pub use crate::distinct::*;

    #[cfg(feature = "ordinal")]
    pub use crate::ordinal::*;

    pub use crate::iter::StatefulIteratorExt;
}

#[cfg(feature = "fold")]
pub mod fold;

#[cfg(feature = "distinct")]
pub mod distinct;

#[cfg(feature = "ordinal")]
pub mod ordinal;

pub mod iter;
