//! Pairing elements with their ordinal position.
//!
//! [`OrdinalPairer`] holds a counter starting at 0 and an optional
//! projection. Every call pairs the (projected) element with the current
//! counter value and then increments the counter.
//!
//! # Sequential Use Only
//!
//! [`OrdinalPairer::pair`] takes `&mut self`, so a pairer cannot be shared
//! between threads without external locking. Even with locking, ordinals then
//! follow lock acquisition order rather than any encounter order. Reusing a
//! pairer for a second pass continues counting where the first pass stopped;
//! build a fresh pairer per pass.
//!
//! # Examples
//!
//! ```rust
//! use statestream::ordinal::pair_with_ordinal;
//!
//! let mut pairer = pair_with_ordinal();
//! let pairs: Vec<(char, usize)> = "abc".chars().map(|letter| pairer.pair(letter)).collect();
//!
//! assert_eq!(pairs, vec![('a', 0), ('b', 1), ('c', 2)]);
//! ```

/// Creates an [`OrdinalPairer`] pairing each element itself with its ordinal.
pub fn pair_with_ordinal<T>() -> OrdinalPairer<fn(T) -> T> {
    OrdinalPairer::new(std::convert::identity as fn(T) -> T)
}

/// Creates an [`OrdinalPairer`] pairing `projection(element)` with its ordinal.
///
/// # Examples
///
/// ```rust
/// use statestream::ordinal::pair_with_ordinal_by;
///
/// let mut pairer = pair_with_ordinal_by(|word: &str| word.len());
///
/// assert_eq!(pairer.pair("one"), (3, 0));
/// assert_eq!(pairer.pair("three"), (5, 1));
/// ```
pub fn pair_with_ordinal_by<T, R, F>(projection: F) -> OrdinalPairer<F>
where
    F: FnMut(T) -> R,
{
    OrdinalPairer::new(projection)
}

/// A counter paired with a projection, assigning zero-based ordinals.
///
/// # Type Parameters
///
/// * `F` - The projection applied to each element before pairing
#[derive(Debug, Clone)]
pub struct OrdinalPairer<F> {
    projection: F,
    next_ordinal: usize,
}

impl<F> OrdinalPairer<F> {
    /// Creates a pairer whose first ordinal is 0.
    pub const fn new(projection: F) -> Self {
        Self {
            projection,
            next_ordinal: 0,
        }
    }

    /// Returns the ordinal the next element will receive.
    pub const fn next_ordinal(&self) -> usize {
        self.next_ordinal
    }

    /// Pairs the projected `element` with the next ordinal.
    ///
    /// If the projection panics the counter is left unchanged.
    pub fn pair<T, R>(&mut self, element: T) -> (R, usize)
    where
        F: FnMut(T) -> R,
    {
        let ordinal = self.next_ordinal;
        let projected = (self.projection)(element);
        self.next_ordinal += 1;
        (projected, ordinal)
    }

    /// Converts the pairer into a plain mapping closure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statestream::ordinal::pair_with_ordinal_by;
    ///
    /// let squares: Vec<(u32, usize)> = (1..=3)
    ///     .map(pair_with_ordinal_by(|value: u32| value * value).into_function())
    ///     .collect();
    ///
    /// assert_eq!(squares, vec![(1, 0), (4, 1), (9, 2)]);
    /// ```
    pub fn into_function<T, R>(mut self) -> impl FnMut(T) -> (R, usize)
    where
        F: FnMut(T) -> R,
    {
        move |element| self.pair(element)
    }
}
