//! Error types for fold construction.

/// Represents an error when a partition size is not a positive integer.
///
/// Returned by the [`BatchPartitioner`](super::BatchPartitioner)
/// constructors. The check happens when the partitioner is built, never when
/// the first element arrives.
///
/// # Examples
///
/// ```rust
/// use statestream::fold::{BatchPartitioner, InvalidPartitionSizeError};
///
/// let error = BatchPartitioner::from_signed(-3).unwrap_err();
/// assert_eq!(error, InvalidPartitionSizeError::new(-3));
/// assert_eq!(
///     format!("{error}"),
///     "partition size must be a positive integer, got -3"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPartitionSizeError {
    size: isize,
}

impl InvalidPartitionSizeError {
    /// Creates an error for the rejected `size`.
    pub const fn new(size: isize) -> Self {
        Self { size }
    }

    /// Returns the rejected size.
    pub const fn size(&self) -> isize {
        self.size
    }
}

impl std::fmt::Display for InvalidPartitionSizeError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "partition size must be a positive integer, got {}",
            self.size
        )
    }
}

impl std::error::Error for InvalidPartitionSizeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "partition size must be a positive integer, got 0")]
    #[case(-1, "partition size must be a positive integer, got -1")]
    #[case(-1024, "partition size must be a positive integer, got -1024")]
    fn test_invalid_partition_size_error_display(#[case] size: isize, #[case] expected: &str) {
        assert_eq!(format!("{}", InvalidPartitionSizeError::new(size)), expected);
    }

    #[rstest]
    fn test_invalid_partition_size_error_equality() {
        assert_eq!(
            InvalidPartitionSizeError::new(0),
            InvalidPartitionSizeError::new(0)
        );
        assert_ne!(
            InvalidPartitionSizeError::new(0),
            InvalidPartitionSizeError::new(-1)
        );
    }

    #[rstest]
    fn test_invalid_partition_size_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(InvalidPartitionSizeError::new(-7));
        assert_eq!(error.to_string(), "partition size must be a positive integer, got -7");
    }
}
