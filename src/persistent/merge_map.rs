//! Persistent key-ordered map whose values merge instead of being replaced.
//!
//! [`OrderedMergeMap`] stores `(key, value)` entries in a single slice that
//! is strictly increasing by key. The slice lives behind an `Arc` and is never
//! written after construction: `add`, `delete` and `merge` each build a fresh
//! slice and return it in a new map, so every earlier version stays valid for
//! whoever still holds it. Entries copied into a new version keep sharing
//! their key allocation and (for `Arc`-backed values such as
//! [`StringSet`](super::StringSet)) their value storage.
//!
//! # Absent and empty
//!
//! A map is either *absent* ([`OrderedMergeMap::absent`], the `Default`) or
//! *present* with zero or more entries ([`OrderedMergeMap::new`] is present
//! and empty). Both states hold no entries and compare equal, but the codec
//! keeps them apart: absent encodes as nil, empty as a zero-length map.
//!
//! # Time Complexity
//!
//! | Operation | Complexity   |
//! |-----------|--------------|
//! | `lookup`  | O(log n)     |
//! | `add`     | O(n)         |
//! | `delete`  | O(n)         |
//! | `merge`   | O(n + m)     |
//! | `size`    | O(1)         |
//! | `keys`    | O(n)         |
//!
//! # Examples
//!
//! ```rust
//! use mergemap::persistent::{Sets, StringSet};
//!
//! let empty = Sets::new();
//! let left = empty.add("a", StringSet::singleton("1"));
//! let right = empty.add("a", StringSet::singleton("2"));
//!
//! let merged = left.merge(&right);
//! assert_eq!(merged.size(), 1);
//! assert_eq!(merged.lookup("a").0.to_string(), "[1, 2]");
//!
//! // Inputs are untouched
//! assert_eq!(left.lookup("a").0.to_string(), "[1]");
//! assert_eq!(right.lookup("a").0.to_string(), "[2]");
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::typeclass::{Monoid, Semigroup};

/// A single key and its value. Always copied or replaced as a whole.
#[derive(Clone)]
struct Entry<V> {
    key: Arc<str>,
    value: V,
}

/// A persistent map from string keys to mergeable values, sorted by key.
///
/// Adding a key that already exists combines the stored value with the new
/// one through [`Semigroup::combine`]; merging two maps combines the values
/// of every shared key the same way.
///
/// # Type Parameters
///
/// * `V` - The value type. Operations that combine values require
///   [`Semigroup`] + `Clone`; [`lookup`](Self::lookup) additionally needs
///   [`Monoid`] for the not-found value.
pub struct OrderedMergeMap<V> {
    entries: Option<Arc<[Entry<V>]>>,
}

impl<V> OrderedMergeMap<V> {
    /// Creates a present map with no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::Sets;
    ///
    /// let map = Sets::new();
    /// assert_eq!(map.size(), 0);
    /// assert!(!map.is_absent());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Creates an absent map, the value that encodes as nil.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::Sets;
    ///
    /// let map = Sets::absent();
    /// assert!(map.is_absent());
    /// assert_eq!(map, Sets::new());
    /// ```
    #[inline]
    #[must_use]
    pub const fn absent() -> Self {
        Self { entries: None }
    }

    fn from_entries(entries: Vec<Entry<V>>) -> Self {
        debug_assert!(
            entries.windows(2).all(|pair| pair[0].key < pair[1].key),
            "OrderedMergeMap entries must be strictly increasing by key"
        );
        Self {
            entries: Some(Arc::from(entries)),
        }
    }

    /// Returns `true` if this is the absent map.
    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.entries.is_none()
    }

    #[inline]
    fn as_slice(&self) -> &[Entry<V>] {
        self.entries.as_deref().unwrap_or(&[])
    }

    /// Returns the insertion point for `key`: the index of the first entry
    /// whose key is not less than `key`, or `size()` if there is none.
    fn locate(&self, key: &str) -> usize {
        self.as_slice()
            .partition_point(|entry| entry.key.as_ref() < key)
    }

    fn position(&self, key: &str) -> Option<usize> {
        let index = self.locate(key);
        self.as_slice()
            .get(index)
            .filter(|entry| entry.key.as_ref() == key)
            .map(|_| index)
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if the map holds no entries, absent or not.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::{Sets, StringSet};
    ///
    /// let map = Sets::new().add("host", StringSet::singleton("a"));
    /// assert!(map.get("host").is_some());
    /// assert!(map.get("pod").is_none());
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|index| &self.as_slice()[index].value)
    }

    /// Returns `true` if the map has an entry for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Returns every key in ascending order.
    ///
    /// The `Vec` is freshly allocated; later versions of the map do not
    /// affect it.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.as_slice()
            .iter()
            .map(|entry| entry.key.to_string())
            .collect()
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.as_slice().iter().map(|entry| &entry.value)
    }

    /// Returns an iterator over `(key, value)` pairs in key order.
    #[must_use]
    pub fn iter(&self) -> OrderedMergeMapIterator<'_, V> {
        OrderedMergeMapIterator {
            inner: self.as_slice().iter(),
        }
    }
}

impl<V: Clone> OrderedMergeMap<V> {
    /// Returns a new map without the entry for `key`.
    ///
    /// When `key` is not present the result holds the same entries as the
    /// receiver. Deleting from the absent map yields the absent map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::{Sets, StringSet};
    ///
    /// let map = Sets::new()
    ///     .add("a", StringSet::singleton("1"))
    ///     .add("b", StringSet::singleton("2"));
    /// let deleted = map.delete("a");
    /// assert_eq!(deleted.keys(), vec!["b"]);
    /// assert_eq!(map.size(), 2); // Original unchanged
    /// ```
    #[must_use]
    pub fn delete(&self, key: &str) -> Self {
        let Some(index) = self.position(key) else {
            return self.clone();
        };
        let entries = self.as_slice();
        let mut result = Vec::with_capacity(entries.len() - 1);
        result.extend_from_slice(&entries[..index]);
        result.extend_from_slice(&entries[index + 1..]);
        Self::from_entries(result)
    }
}

impl<V: Semigroup + Clone> OrderedMergeMap<V> {
    /// Returns a new map with `value` added under `key`.
    ///
    /// If `key` is already present the stored value becomes
    /// `existing.combine(value)`; `add` never discards what was there.
    /// Adding to the absent map yields a present map with one entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::{Sets, StringSet};
    ///
    /// let map = Sets::new().add("a", StringSet::singleton("1"));
    /// let added = map.add("a", StringSet::singleton("2"));
    /// assert_eq!(added.size(), 1);
    /// assert_eq!(added.lookup("a").0.to_string(), "[1, 2]");
    /// ```
    #[must_use]
    pub fn add(&self, key: &str, value: V) -> Self {
        let entries = self.as_slice();
        let index = self.locate(key);

        match entries.get(index) {
            Some(existing) if existing.key.as_ref() == key => {
                let mut result = Vec::with_capacity(entries.len());
                result.extend_from_slice(&entries[..index]);
                result.push(Entry {
                    key: Arc::clone(&existing.key),
                    value: existing.value.combine_ref(&value),
                });
                result.extend_from_slice(&entries[index + 1..]);
                Self::from_entries(result)
            }
            _ => {
                let mut result = Vec::with_capacity(entries.len() + 1);
                result.extend_from_slice(&entries[..index]);
                result.push(Entry {
                    key: Arc::from(key),
                    value,
                });
                result.extend_from_slice(&entries[index..]);
                Self::from_entries(result)
            }
        }
    }

    /// Merges two maps into a new one, combining the values of shared keys.
    ///
    /// Merging with the absent map returns the other side unchanged.
    /// Otherwise both entry slices are walked once in key order, so the cost
    /// is linear in the combined size. The operation is commutative,
    /// associative and idempotent whenever the value type's `combine` is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::{Sets, StringSet};
    ///
    /// let left = Sets::new()
    ///     .add("a", StringSet::singleton("1"))
    ///     .add("b", StringSet::singleton("2"));
    /// let right = Sets::new()
    ///     .add("b", StringSet::singleton("3"))
    ///     .add("c", StringSet::singleton("4"));
    ///
    /// let merged = left.merge(&right);
    /// assert_eq!(merged.keys(), vec!["a", "b", "c"]);
    /// assert_eq!(merged.lookup("b").0.to_string(), "[2, 3]");
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        match (&self.entries, &other.entries) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(left), Some(right)) => Self::from_entries(merge_entries(left, right)),
        }
    }
}

impl<V: Monoid + Clone> OrderedMergeMap<V> {
    /// Looks up `key`, returning the value and whether it was found.
    ///
    /// A missing key yields `(V::empty(), false)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::{Sets, StringSet};
    ///
    /// let map = Sets::new().add("a", StringSet::singleton("1"));
    /// let (value, found) = map.lookup("a");
    /// assert!(found);
    /// assert!(value.contains("1"));
    ///
    /// let (value, found) = map.lookup("z");
    /// assert!(!found);
    /// assert!(value.is_empty());
    /// ```
    #[must_use]
    pub fn lookup(&self, key: &str) -> (V, bool) {
        self.get(key)
            .map_or_else(|| (V::empty(), false), |value| (value.clone(), true))
    }
}

/// Two-pointer merge of two strictly increasing entry slices.
///
/// Entries with equal keys collapse into one holding `left.combine(right)`.
/// Key ranges that do not overlap are concatenated without comparing
/// individual entries.
fn merge_entries<V: Semigroup + Clone>(left: &[Entry<V>], right: &[Entry<V>]) -> Vec<Entry<V>> {
    let mut result = Vec::with_capacity(left.len() + right.len());

    match (left.last(), right.first(), right.last(), left.first()) {
        (Some(left_last), Some(right_first), _, _) if left_last.key < right_first.key => {
            result.extend_from_slice(left);
            result.extend_from_slice(right);
            return result;
        }
        (_, _, Some(right_last), Some(left_first)) if right_last.key < left_first.key => {
            result.extend_from_slice(right);
            result.extend_from_slice(left);
            return result;
        }
        _ => {}
    }

    let mut left_index = 0;
    let mut right_index = 0;

    while left_index < left.len() && right_index < right.len() {
        let left_entry = &left[left_index];
        let right_entry = &right[right_index];
        match left_entry.key.cmp(&right_entry.key) {
            std::cmp::Ordering::Less => {
                result.push(left_entry.clone());
                left_index += 1;
            }
            std::cmp::Ordering::Greater => {
                result.push(right_entry.clone());
                right_index += 1;
            }
            std::cmp::Ordering::Equal => {
                result.push(Entry {
                    key: Arc::clone(&left_entry.key),
                    value: left_entry.value.combine_ref(&right_entry.value),
                });
                left_index += 1;
                right_index += 1;
            }
        }
    }

    result.extend_from_slice(&left[left_index..]);
    result.extend_from_slice(&right[right_index..]);
    result
}

// =============================================================================
// Iterator
// =============================================================================

/// An iterator over the entries of an [`OrderedMergeMap`] in key order.
pub struct OrderedMergeMapIterator<'a, V> {
    inner: std::slice::Iter<'a, Entry<V>>,
}

impl<'a, V> Iterator for OrderedMergeMapIterator<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| (entry.key.as_ref(), &entry.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for OrderedMergeMapIterator<'_, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|entry| (entry.key.as_ref(), &entry.value))
    }
}

impl<V> ExactSizeIterator for OrderedMergeMapIterator<'_, V> {}

impl<V> FusedIterator for OrderedMergeMapIterator<'_, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V> Clone for OrderedMergeMap<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<V> Default for OrderedMergeMap<V> {
    #[inline]
    fn default() -> Self {
        Self::absent()
    }
}

impl<K: AsRef<str>, V: Semigroup + Clone> FromIterator<(K, V)> for OrderedMergeMap<V> {
    /// Folds every pair through [`add`](OrderedMergeMap::add), so repeated
    /// keys combine their values.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.add(key.as_ref(), value))
    }
}

impl<'a, V> IntoIterator for &'a OrderedMergeMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = OrderedMergeMapIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: PartialEq> PartialEq for OrderedMergeMap<V> {
    fn eq(&self, other: &Self) -> bool {
        let left = self.as_slice();
        let right = other.as_slice();
        left.len() == right.len()
            && left
                .iter()
                .zip(right)
                .all(|(left, right)| left.key == right.key && left.value == right.value)
    }
}

impl<V: Eq> Eq for OrderedMergeMap<V> {}

impl<V: fmt::Debug> fmt::Debug for OrderedMergeMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            return formatter.write_str("absent");
        }
        formatter.debug_map().entries(self.iter()).finish()
    }
}

/// Renders `{key: value,\n...}` in key order. Meant for logs, not for parsing.
impl<V: fmt::Display> fmt::Display for OrderedMergeMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (key, value) in self {
            writeln!(formatter, "{key}: {value},")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<V: Semigroup + Clone> Semigroup for OrderedMergeMap<V> {
    fn combine(self, other: Self) -> Self {
        self.merge(&other)
    }

    fn combine_ref(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl<V: Semigroup + Clone> Monoid for OrderedMergeMap<V> {
    fn empty() -> Self {
        Self::new()
    }
}

// =============================================================================
// Serde Support
// =============================================================================
//
// Wire shape: nil for the absent map, otherwise `some(map)` holding one
// key/value pair per entry in key order. These impls are the only codec for
// the type; nothing derives a structural encoding for it.

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for OrderedMergeMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match &self.entries {
            None => serializer.serialize_none(),
            Some(entries) => serializer.serialize_some(&SerializeEntries(entries)),
        }
    }
}

#[cfg(feature = "serde")]
struct SerializeEntries<'a, V>(&'a [Entry<V>]);

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for SerializeEntries<'_, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(entry.key.as_ref(), &entry.value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedMergeMapVisitor<V> {
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<V> OrderedMergeMapVisitor<V> {
    const fn new() -> Self {
        Self {
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, V: serde::Deserialize<'de>> serde::de::Visitor<'de> for OrderedMergeMapVisitor<V> {
    type Value = OrderedMergeMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("nil or a map with string keys")
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(OrderedMergeMap::absent())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(OrderedMergeMap::absent())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    /// Rebuilds the sorted invariant from whatever order the stream uses.
    ///
    /// A key seen twice keeps the value decoded last. The values are not
    /// combined, unlike [`OrderedMergeMap::add`].
    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut entries: Vec<Entry<V>> =
            Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));

        while let Some(key) = access.next_key::<String>()? {
            let value = access.next_value::<V>()?;
            let index = entries.partition_point(|entry| entry.key.as_ref() < key.as_str());
            match entries.get_mut(index) {
                Some(existing) if existing.key.as_ref() == key => {
                    tracing::trace!(key = %key, "duplicate key in encoded map, keeping last value");
                    existing.value = value;
                }
                _ => {
                    if index < entries.len() {
                        tracing::trace!(key = %key, index, "out-of-order key in encoded map");
                    }
                    entries.insert(
                        index,
                        Entry {
                            key: Arc::from(key),
                            value,
                        },
                    );
                }
            }
        }

        Ok(OrderedMergeMap::from_entries(entries))
    }
}

#[cfg(feature = "serde")]
impl<'de, V: serde::Deserialize<'de>> serde::Deserialize<'de> for OrderedMergeMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_option(OrderedMergeMapVisitor::new())
    }
}

static_assertions::assert_impl_all!(OrderedMergeMap<super::StringSet>: Send, Sync, Clone);
