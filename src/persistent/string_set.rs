//! Persistent sorted set of strings.
//!
//! [`StringSet`] is the value type of [`Sets`](super::Sets): a sorted,
//! deduplicated sequence of strings held behind an `Arc`, so cloning a set
//! (and therefore copying a map entry that holds one) never copies the
//! strings.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity |
//! |----------------|------------|
//! | `contains`     | O(log n)   |
//! | `insert`       | O(n)       |
//! | `remove`       | O(n)       |
//! | `merge`        | O(n + m)   |
//! | `intersection` | O(n + m)   |
//! | `len`          | O(1)       |
//!
//! # Examples
//!
//! ```rust
//! use mergemap::persistent::StringSet;
//!
//! let set: StringSet = ["b", "a", "b"].into_iter().collect();
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.to_string(), "[a, b]");
//!
//! let extended = set.insert("c");
//! assert_eq!(set.len(), 2);      // Original unchanged
//! assert_eq!(extended.len(), 3); // New version
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::typeclass::{Monoid, Semigroup};

/// A persistent, sorted set of strings.
///
/// All operations return new sets; the receiver is never modified.
#[derive(Clone)]
pub struct StringSet {
    elements: Arc<[String]>,
}

impl StringSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Arc::from(Vec::new()),
        }
    }

    /// Creates a set holding exactly one string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::StringSet;
    ///
    /// let set = StringSet::singleton("web");
    /// assert!(set.contains("web"));
    /// ```
    #[must_use]
    pub fn singleton(element: impl Into<String>) -> Self {
        Self::from_sorted_vec(vec![element.into()])
    }

    /// Builds a set from a vector that is already strictly increasing.
    fn from_sorted_vec(elements: Vec<String>) -> Self {
        debug_assert!(
            is_strictly_sorted(&elements),
            "StringSet storage must be strictly increasing"
        );
        Self {
            elements: Arc::from(elements),
        }
    }

    /// Builds a set from arbitrary strings, sorting and removing duplicates.
    fn from_unsorted_vec(mut elements: Vec<String>) -> Self {
        elements.sort_unstable();
        elements.dedup();
        Self::from_sorted_vec(elements)
    }

    /// Returns the number of strings in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the set holds no strings.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns `true` if `element` is in the set.
    #[must_use]
    pub fn contains(&self, element: &str) -> bool {
        self.position(element).is_ok()
    }

    fn position(&self, element: &str) -> Result<usize, usize> {
        self.elements
            .binary_search_by(|probe| probe.as_str().cmp(element))
    }

    /// Returns a new set with `element` added.
    ///
    /// If the element is already present the result shares storage with
    /// the receiver.
    #[must_use]
    pub fn insert(&self, element: impl Into<String>) -> Self {
        let element = element.into();
        match self.position(&element) {
            Ok(_) => self.clone(),
            Err(position) => {
                let mut elements = Vec::with_capacity(self.len() + 1);
                elements.extend_from_slice(&self.elements[..position]);
                elements.push(element);
                elements.extend_from_slice(&self.elements[position..]);
                Self::from_sorted_vec(elements)
            }
        }
    }

    /// Returns a new set without `element`.
    #[must_use]
    pub fn remove(&self, element: &str) -> Self {
        match self.position(element) {
            Ok(position) => {
                let mut elements = Vec::with_capacity(self.len() - 1);
                elements.extend_from_slice(&self.elements[..position]);
                elements.extend_from_slice(&self.elements[position + 1..]);
                Self::from_sorted_vec(elements)
            }
            Err(_) => self.clone(),
        }
    }

    /// Returns the union of two sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mergemap::persistent::StringSet;
    ///
    /// let left: StringSet = ["1", "3"].into_iter().collect();
    /// let right: StringSet = ["2", "3"].into_iter().collect();
    /// assert_eq!(left.merge(&right).to_string(), "[1, 2, 3]");
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_sorted_vec(union_slices(&self.elements, &other.elements))
    }

    /// Returns the strings present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::new();
        }
        Self::from_sorted_vec(intersection_slices(&self.elements, &other.elements))
    }

    /// Iterates over the strings in ascending order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.elements.iter().map(String::as_str)
    }

    /// Returns the strings as a freshly allocated, sorted `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.elements.to_vec()
    }
}

fn union_slices(left: &[String], right: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(left.len() + right.len());
    let mut left_index = 0;
    let mut right_index = 0;

    while left_index < left.len() && right_index < right.len() {
        match left[left_index].cmp(&right[right_index]) {
            Ordering::Less => {
                result.push(left[left_index].clone());
                left_index += 1;
            }
            Ordering::Greater => {
                result.push(right[right_index].clone());
                right_index += 1;
            }
            Ordering::Equal => {
                result.push(left[left_index].clone());
                left_index += 1;
                right_index += 1;
            }
        }
    }

    result.extend_from_slice(&left[left_index..]);
    result.extend_from_slice(&right[right_index..]);
    result
}

fn intersection_slices(left: &[String], right: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(left.len().min(right.len()));
    let mut left_index = 0;
    let mut right_index = 0;

    while left_index < left.len() && right_index < right.len() {
        match left[left_index].cmp(&right[right_index]) {
            Ordering::Less => left_index += 1,
            Ordering::Greater => right_index += 1,
            Ordering::Equal => {
                result.push(left[left_index].clone());
                left_index += 1;
                right_index += 1;
            }
        }
    }

    result
}

fn is_strictly_sorted(elements: &[String]) -> bool {
    elements.windows(2).all(|window| window[0] < window[1])
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl Default for StringSet {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for StringSet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements) || self.elements == other.elements
    }
}

impl Eq for StringSet {}

impl<S: Into<String>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_unsorted_vec(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for StringSet {
    fn from(elements: Vec<String>) -> Self {
        Self::from_unsorted_vec(elements)
    }
}

impl fmt::Debug for StringSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for StringSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl Semigroup for StringSet {
    fn combine(self, other: Self) -> Self {
        self.merge(&other)
    }

    fn combine_ref(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl Monoid for StringSet {
    fn empty() -> Self {
        Self::new()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for StringSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct StringSetVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for StringSetVisitor {
    type Value = StringSet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of strings")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some(element) = access.next_element::<String>()? {
            elements.push(element);
        }
        Ok(StringSet::from_unsorted_vec(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StringSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(StringSetVisitor)
    }
}

static_assertions::assert_impl_all!(StringSet: Send, Sync);


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn serialize_sorted_sequence() {
        let collected: StringSet = ["b", "a"].into_iter().collect();
        let json = serde_json::to_string(&collected).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }

    #[rstest]
    fn deserialize_normalizes_input() {
        let decoded: StringSet = serde_json::from_str(r#"["c","a","c","b"]"#).unwrap();
        assert_eq!(decoded.to_vec(), vec!["a", "b", "c"]);
    }

    #[rstest]
    fn deserialize_rejects_non_sequence() {
        let result: Result<StringSet, _> = serde_json::from_str(r#"{"a":1}"#);
        assert!(result.is_err());
    }
}
