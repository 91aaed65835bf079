//! # mergemap
//!
//! Persistent, key-ordered maps from strings to mergeable values, built to
//! combine snapshots taken independently (for example by several observers
//! of the same system) without ever modifying a snapshot someone else holds.
//!
//! ## Overview
//!
//! - **Type Classes**: [`Semigroup`](typeclass::Semigroup) and
//!   [`Monoid`](typeclass::Monoid), the contract a value type must meet
//! - **Persistent Collections**: [`OrderedMergeMap`](persistent::OrderedMergeMap),
//!   [`StringSet`](persistent::StringSet) and the [`Sets`](persistent::Sets) alias
//!
//! Maps stay sorted by key at all times, so merging two of them is a single
//! linear pass. Adding a key that already exists, or merging maps that share
//! a key, combines the values (set union for `StringSet`).
//!
//! ## Feature Flags
//!
//! - `typeclass`: Semigroup and Monoid
//! - `persistent`: the collections (requires `typeclass`)
//! - `serde`: the hand-written wire codec for the collections
//!
//! All three are enabled by default.
//!
//! ## Example
//!
//! ```rust
//! use mergemap::prelude::*;
//!
//! let left = Sets::new().add("a", StringSet::singleton("1"));
//! let right = Sets::new().add("a", StringSet::singleton("2"));
//! let merged = left.combine_ref(&right);
//! assert_eq!(merged.lookup("a").0.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use mergemap::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "persistent")]
pub mod persistent;
