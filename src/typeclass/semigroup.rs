//! Semigroup type class - values that merge through an associative operation.
//!
//! A type `T` is a semigroup if there exists a function
//! `combine: (T, T) -> T` that is associative. Every value stored in an
//! [`OrderedMergeMap`](crate::persistent::OrderedMergeMap) is a semigroup:
//! adding a key that is already present, or merging two maps that share a
//! key, combines the two values instead of replacing one with the other.
//!
//! # Laws
//!
//! For all `a`, `b`, `c` of type `T`:
//!
//! ## Associativity
//!
//! ```text
//! (a.combine(b)).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! Merge maps additionally rely on commutativity and idempotence of their
//! values when those properties are expected of the map itself:
//!
//! ```text
//! a.combine(b) == b.combine(a)
//! a.combine(a) == a
//! ```
//!
//! Set union satisfies all three.
//!
//! # Examples
//!
//! ```rust
//! use mergemap::persistent::StringSet;
//! use mergemap::typeclass::Semigroup;
//!
//! let left = StringSet::singleton("a");
//! let right = StringSet::singleton("b");
//! let merged = left.combine(right);
//! assert_eq!(merged.to_vec(), vec!["a".to_string(), "b".to_string()]);
//! ```

/// A type class for types with an associative binary operation.
///
/// # Laws
///
/// ## Associativity
///
/// For all `a`, `b`, `c`:
/// ```text
/// (a.combine(b)).combine(c) == a.combine(b.combine(c))
/// ```
pub trait Semigroup {
    /// Combines two values into one.
    ///
    /// This operation must be associative.
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Combines two values by reference, returning a new value.
    ///
    /// The default implementation clones both values and calls `combine`.
    /// Persistent types override this to avoid the clones, since both sides
    /// are only read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::StringSet;
    /// use mergemap::typeclass::Semigroup;
    ///
    /// let left = StringSet::singleton("1");
    /// let right = StringSet::singleton("2");
    /// let merged = left.combine_ref(&right);
    /// // Original values are still available
    /// assert_eq!(left.len(), 1);
    /// assert_eq!(right.len(), 1);
    /// assert_eq!(merged.len(), 2);
    /// ```
    #[must_use]
    fn combine_ref(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        self.clone().combine(other.clone())
    }

    /// Reduces all elements in an iterator using the semigroup operation.
    ///
    /// Returns `None` if the iterator is empty.
    /// For a version that returns the identity for empty iterators, see
    /// [`Monoid::combine_all`](super::Monoid::combine_all).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::StringSet;
    /// use mergemap::typeclass::Semigroup;
    ///
    /// let sets = vec![StringSet::singleton("a"), StringSet::singleton("b")];
    /// assert_eq!(StringSet::reduce_all(sets).map(|set| set.len()), Some(2));
    ///
    /// let none: Vec<StringSet> = vec![];
    /// assert!(StringSet::reduce_all(none).is_none());
    /// ```
    fn reduce_all<I>(iterator: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .reduce(|accumulator, element| accumulator.combine(element))
    }
}

// =============================================================================
// Option Implementation
// =============================================================================

/// `None` is absorbed: combining with `None` yields the other side.
impl<T: Semigroup> Semigroup for Option<T> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(left), Some(right)) => Some(left.combine(right)),
            (Some(value), None) | (None, Some(value)) => Some(value),
            (None, None) => None,
        }
    }
}
