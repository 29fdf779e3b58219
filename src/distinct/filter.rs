//! The sequential deduplication filter.

use std::hash::{BuildHasher, Hash};

use super::{DefaultKeyHasher, KeySeenRegistry};

/// Creates a [`DedupFilter`] that accepts the first element bearing each key.
///
/// # Examples
///
/// ```rust
/// use statestream::distinct::dedup_by_key;
///
/// let mut dedup = dedup_by_key(|value: &i32| *value);
/// let distinct: Vec<i32> = vec![1, 2, 1, 3, 2, 4]
///     .into_iter()
///     .filter(|value| dedup.test(value))
///     .collect();
///
/// assert_eq!(distinct, vec![1, 2, 3, 4]);
/// ```
pub fn dedup_by_key<T, K, F>(key_function: F) -> DedupFilter<F, K>
where
    T: ?Sized,
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    DedupFilter::new(key_function)
}

/// A predicate that is `true` the first time a key is seen and `false` after.
///
/// Each call projects the element to a key and inserts the key into an owned
/// [`KeySeenRegistry`]. The filter is not thread-safe: [`test`](Self::test)
/// takes `&mut self`. Use
/// [`ConcurrentDedupFilter`](super::ConcurrentDedupFilter) when the driver
/// invokes the predicate from several threads.
///
/// # Type Parameters
///
/// * `F` - The key projection
/// * `K` - The key type
/// * `S` - The hasher builder of the registry
#[derive(Debug, Clone)]
pub struct DedupFilter<F, K, S = DefaultKeyHasher> {
    key_function: F,
    registry: KeySeenRegistry<K, S>,
}

impl<F, K> DedupFilter<F, K> {
    /// Creates a filter with an empty registry and the default hasher.
    pub fn new(key_function: F) -> Self {
        Self::with_hasher(key_function, DefaultKeyHasher::default())
    }
}

impl<F, K, S> DedupFilter<F, K, S> {
    /// Creates a filter whose registry hashes keys with `hasher`.
    pub fn with_hasher(key_function: F, hasher: S) -> Self {
        Self {
            key_function,
            registry: KeySeenRegistry::with_hasher(hasher),
        }
    }

    /// Returns the number of distinct keys accepted so far.
    pub fn seen_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the registry of observed keys.
    pub const fn registry(&self) -> &KeySeenRegistry<K, S> {
        &self.registry
    }
}

impl<F, K, S> DedupFilter<F, K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns `true` if `element`'s key has not been seen before.
    ///
    /// A panic inside the key projection propagates unchanged and leaves the
    /// registry untouched.
    pub fn test<T>(&mut self, element: &T) -> bool
    where
        T: ?Sized,
        F: FnMut(&T) -> K,
    {
        let key = (self.key_function)(element);
        self.registry.insert_if_absent(key)
    }

    /// Like [`test`](Self::test), for a fallible key projection.
    ///
    /// # Errors
    ///
    /// Returns the projection's error unchanged. The registry is not modified
    /// in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statestream::distinct::DedupFilter;
    ///
    /// let mut dedup = DedupFilter::new(|text: &str| text.parse::<i32>());
    ///
    /// assert_eq!(dedup.try_test("7"), Ok(true));
    /// assert_eq!(dedup.try_test("07"), Ok(false));
    /// assert!(dedup.try_test("seven").is_err());
    /// assert_eq!(dedup.seen_count(), 1);
    /// ```
    pub fn try_test<T, E>(&mut self, element: &T) -> Result<bool, E>
    where
        T: ?Sized,
        F: FnMut(&T) -> Result<K, E>,
    {
        let key = (self.key_function)(element)?;
        Ok(self.registry.insert_if_absent(key))
    }

    /// Converts the filter into a plain predicate closure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statestream::distinct::dedup_by_key;
    ///
    /// let words = ["apple", "avocado", "banana", "blueberry", "cherry"];
    /// let first_per_letter: Vec<&str> = words
    ///     .into_iter()
    ///     .filter(dedup_by_key(|word: &&str| word.as_bytes()[0]).into_predicate())
    ///     .collect();
    ///
    /// assert_eq!(first_per_letter, vec!["apple", "banana", "cherry"]);
    /// ```
    pub fn into_predicate<T>(mut self) -> impl FnMut(&T) -> bool
    where
        T: ?Sized,
        F: FnMut(&T) -> K,
    {
        move |element: &T| self.test(element)
    }
}
