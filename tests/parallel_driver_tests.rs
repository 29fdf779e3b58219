//! Tests for the rayon-driven entry points.
//!
//! Requires the `rayon` feature.

#![cfg(feature = "rayon")]

use std::collections::HashSet;

use rayon::prelude::*;
use rstest::rstest;
use statestream::distinct::{ParallelDistinctExt, concurrent_dedup_by_key};
use statestream::fold::{Fold, partition};

// =============================================================================
// Parallel Deduplication
// =============================================================================

#[rstest]
fn par_distinct_by_key_keeps_one_per_key() {
    let survivors: Vec<u32> = (0..100_000_u32)
        .into_par_iter()
        .par_distinct_by_key(|value: &u32| value % 1000)
        .collect();

    let keys: HashSet<u32> = survivors.iter().map(|value| value % 1000).collect();
    assert_eq!(survivors.len(), 1000);
    assert_eq!(keys.len(), 1000);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(500)]
fn par_filter_with_shared_filter_accepts_each_key_once(#[case] key_count: u64) {
    let dedup = concurrent_dedup_by_key(|value: &u64| value % key_count);

    let accepted = (0..50_000_u64)
        .into_par_iter()
        .filter(|value| dedup.test(value))
        .count();

    assert_eq!(accepted, usize::try_from(key_count).unwrap());
}

// =============================================================================
// Parallel Fold
// =============================================================================

#[rstest]
fn fold_parallel_with_unit_partitions_preserves_order() {
    let partitioner = partition(1).unwrap();
    let elements: Vec<i32> = (0..10_000).collect();

    let partitions = partitioner.fold_parallel(elements.clone());

    let expected: Vec<Vec<i32>> = elements.into_iter().map(|element| vec![element]).collect();
    assert_eq!(partitions, expected);
}

#[rstest]
fn fold_parallel_never_drops_elements() {
    let partitioner = partition(16).unwrap();

    let partitions = partitioner.fold_parallel((0..10_000_usize).collect::<Vec<_>>());
    let flattened: Vec<usize> = partitions.into_iter().flatten().collect();

    assert_eq!(flattened, (0..10_000).collect::<Vec<_>>());
}

#[rstest]
fn fold_parallel_of_empty_input_is_empty() {
    let partitioner = partition(4).unwrap();
    let partitions = partitioner.fold_parallel(Vec::<u8>::new());

    assert!(partitions.is_empty());
}
