//! Persistent (immutable) mergeable collections.
//!
//! - [`OrderedMergeMap`]: key-ordered map whose values combine on collision
//! - [`StringSet`]: sorted set of strings, the usual value type
//! - [`Sets`]: `OrderedMergeMap<StringSet>`, a string to string-set map
//!
//! # Structural Sharing
//!
//! Storage is held behind `std::sync::Arc` and never written after it is
//! built. Every operation that "changes" a collection allocates a new
//! backing slice and hands back a new value; entries copied into it share
//! their key and value allocations with the previous version. Any version can
//! be read from many threads at once.
//!
//! # Examples
//!
//! ```rust
//! use mergemap::persistent::{Sets, StringSet};
//!
//! // Two observers report tags for the same host
//! let first = Sets::new().add("host-1", StringSet::singleton("web"));
//! let second = Sets::new()
//!     .add("host-1", StringSet::singleton("db"))
//!     .add("host-2", StringSet::singleton("cache"));
//!
//! let combined = first.merge(&second);
//! assert_eq!(combined.keys(), vec!["host-1", "host-2"]);
//! assert_eq!(combined.lookup("host-1").0.to_string(), "[db, web]");
//!
//! // Neither report changed
//! assert_eq!(first.size(), 1);
//! assert_eq!(second.size(), 2);
//! ```

mod merge_map;
mod string_set;

pub use merge_map::OrderedMergeMap;
pub use merge_map::OrderedMergeMapIterator;
pub use string_set::StringSet;

/// A persistent map from string keys to string sets, merged by set union.
pub type Sets = OrderedMergeMap<StringSet>;
