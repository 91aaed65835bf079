//! Monoid type class - semigroups with an identity element.
//!
//! A type `T` is a monoid if it is a [`Semigroup`] and has an identity
//! element `empty` such that for all `a`:
//!
//! - `empty.combine(a) == a` (left identity)
//! - `a.combine(empty) == a` (right identity)
//!
//! The identity doubles as the default value returned by
//! [`OrderedMergeMap::lookup`](crate::persistent::OrderedMergeMap::lookup)
//! for a key that is not present, and as the value decoded for a nil entry.
//!
//! # Examples
//!
//! ```rust
//! use mergemap::persistent::{Sets, StringSet};
//! use mergemap::typeclass::{Monoid, Semigroup};
//!
//! let snapshot = Sets::new().add("host", StringSet::singleton("a"));
//! assert_eq!(Sets::empty().combine(snapshot.clone()), snapshot);
//! assert_eq!(snapshot.clone().combine(Sets::empty()), snapshot);
//! ```

use super::semigroup::Semigroup;

/// A type class for semigroups with an identity element.
///
/// # Laws
///
/// In addition to associativity, for all `a`:
/// ```text
/// Self::empty().combine(a) == a
/// a.combine(Self::empty()) == a
/// ```
pub trait Monoid: Semigroup {
    /// Returns the identity element for this monoid.
    fn empty() -> Self;

    /// Combines all elements in an iterator, starting from the identity element.
    ///
    /// Unlike [`Semigroup::reduce_all`], this always returns a value (the
    /// identity for an empty iterator). This is the usual way to fold a batch
    /// of snapshots into one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::{Sets, StringSet};
    /// use mergemap::typeclass::Monoid;
    ///
    /// let snapshots = vec![
    ///     Sets::new().add("a", StringSet::singleton("1")),
    ///     Sets::new().add("a", StringSet::singleton("2")),
    ///     Sets::new().add("b", StringSet::singleton("3")),
    /// ];
    /// let merged = Sets::combine_all(snapshots);
    /// assert_eq!(merged.size(), 2);
    /// assert_eq!(merged.lookup("a").0.len(), 2);
    /// ```
    fn combine_all<I>(iterator: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .fold(Self::empty(), |accumulator, element| {
                accumulator.combine(element)
            })
    }

    /// Returns whether this value is the identity element.
    fn is_empty_value(&self) -> bool
    where
        Self: PartialEq + Sized,
    {
        *self == Self::empty()
    }
}

/// `None` is the identity for any semigroup lifted into `Option`.
impl<T: Semigroup> Monoid for Option<T> {
    fn empty() -> Self {
        None
    }
}
