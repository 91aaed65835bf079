//! Algebraic type classes for mergeable values.
//!
//! - [`Semigroup`]: associative binary operation (`combine`)
//! - [`Monoid`]: semigroup with an identity element (`empty`)
//!
//! Any `V: Semigroup + Monoid + Clone + PartialEq` can be stored in an
//! [`OrderedMergeMap`](crate::persistent::OrderedMergeMap).
//!
//! # Examples
//!
//! ```rust
//! use mergemap::persistent::StringSet;
//! use mergemap::typeclass::{Monoid, Semigroup};
//!
//! let tags = StringSet::singleton("web").combine(StringSet::singleton("db"));
//! assert_eq!(tags.len(), 2);
//! assert!(StringSet::empty().is_empty());
//! ```

mod monoid;
mod semigroup;

pub use monoid::Monoid;
pub use semigroup::Semigroup;
