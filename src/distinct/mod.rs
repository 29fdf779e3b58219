//! Key-based deduplication filters.
//!
//! This module provides predicates that accept the first occurrence of each
//! projected key during a single pass and reject every later one:
//!
//! - [`KeySeenRegistry`]: An owned set of observed keys
//! - [`DedupFilter`]: A sequential filter over a [`KeySeenRegistry`]
//! - [`ConcurrentKeySeenRegistry`]: A sharded, thread-safe set of observed keys
//!   (requires the `concurrent` feature)
//! - [`ConcurrentDedupFilter`]: A filter callable from many threads at once
//!   (requires the `concurrent` feature)
//!
//! Filters hold derived keys only, never the elements themselves. A filter is
//! built per pass and dropped afterwards; it is not a cache and never evicts.
//!
//! # Hashing
//!
//! Registries hash keys with [`DefaultKeyHasher`]. The `fxhash` feature
//! switches it to `rustc_hash::FxBuildHasher` and the `ahash` feature to
//! `ahash::RandomState`. A custom hasher can always be supplied through the
//! `with_hasher` constructors.
//!
//! # Examples
//!
//! ```rust
//! use statestream::distinct::dedup_by_key;
//!
//! let mut first_per_residue = dedup_by_key(|value: &u32| value % 100);
//! let survivors: Vec<u32> = (0..1000).filter(|value| first_per_residue.test(value)).collect();
//!
//! assert_eq!(survivors, (0..100).collect::<Vec<_>>());
//! ```

mod filter;
mod registry;

#[cfg(feature = "concurrent")]
mod concurrent;

#[cfg(feature = "rayon")]
mod parallel;

pub use filter::{DedupFilter, dedup_by_key};
pub use registry::KeySeenRegistry;

#[cfg(feature = "concurrent")]
pub use concurrent::{ConcurrentDedupFilter, ConcurrentKeySeenRegistry, concurrent_dedup_by_key};

#[cfg(feature = "rayon")]
pub use parallel::ParallelDistinctExt;

// =============================================================================
// Default Hasher Selection
// =============================================================================

/// The hasher builder used by registries unless one is supplied explicitly.
///
/// With the `fxhash` feature this is `rustc_hash::FxBuildHasher`.
#[cfg(feature = "fxhash")]
pub type DefaultKeyHasher = rustc_hash::FxBuildHasher;

/// The hasher builder used by registries unless one is supplied explicitly.
///
/// With the `ahash` feature this is `ahash::RandomState`.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultKeyHasher = ahash::RandomState;

/// The hasher builder used by registries unless one is supplied explicitly.
///
/// Without a hashing feature this is the standard library's `RandomState`.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultKeyHasher = std::hash::RandomState;
