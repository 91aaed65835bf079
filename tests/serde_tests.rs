#![cfg(all(feature = "serde", feature = "persistent"))]

//! Integration tests for the OrderedMergeMap wire codec.
//!
//! These tests verify the nil/map distinction, decode-time repair of
//! unsorted and duplicated input, and round trips through both a
//! self-describing format (JSON) and a compact binary one (bincode).

use mergemap::persistent::{OrderedMergeMap, Sets, StringSet};
use rstest::rstest;

fn set(elements: &[&str]) -> StringSet {
    elements.iter().copied().collect()
}

fn sample() -> Sets {
    Sets::new()
        .add("host", set(&["a", "b"]))
        .add("container", set(&["c"]))
        .add("pod", StringSet::new())
}

// =============================================================================
// Encoding
// =============================================================================

#[rstest]
fn test_absent_encodes_as_null() {
    let json = serde_json::to_string(&Sets::absent()).unwrap();
    assert_eq!(json, "null");
}

#[rstest]
fn test_empty_encodes_as_empty_map() {
    let json = serde_json::to_string(&Sets::new()).unwrap();
    assert_eq!(json, "{}");
}

#[rstest]
fn test_entries_encode_in_key_order() {
    let json = serde_json::to_string(&sample()).unwrap();
    assert_eq!(json, r#"{"container":["c"],"host":["a","b"],"pod":[]}"#);
}

// =============================================================================
// Decoding
// =============================================================================

#[rstest]
fn test_null_decodes_as_absent() {
    let map: Sets = serde_json::from_str("null").unwrap();
    assert!(map.is_absent());
}

#[rstest]
fn test_empty_map_decodes_as_present() {
    let map: Sets = serde_json::from_str("{}").unwrap();
    assert!(!map.is_absent());
    assert!(map.is_empty());
}

#[rstest]
fn test_decode_sorts_out_of_order_keys() {
    let map: Sets = serde_json::from_str(r#"{"c":["3"],"a":["1"],"b":["2"]}"#).unwrap();
    assert_eq!(map.keys(), vec!["a", "b", "c"]);
    assert_eq!(map.lookup("b"), (set(&["2"]), true));
}

#[rstest]
fn test_decode_duplicate_key_keeps_last_value() {
    let map: Sets = serde_json::from_str(r#"{"x":["1"],"x":["2"]}"#).unwrap();
    assert_eq!(map.size(), 1);
    assert_eq!(map.lookup("x"), (set(&["2"]), true));
}

#[rstest]
fn test_decode_duplicate_differs_from_add() {
    let decoded: Sets = serde_json::from_str(r#"{"x":["1"],"x":["2"]}"#).unwrap();
    let added = Sets::new().add("x", set(&["1"])).add("x", set(&["2"]));
    assert_ne!(decoded, added);
    assert_eq!(added.lookup("x").0, set(&["1", "2"]));
}

#[rstest]
fn test_decode_normalizes_value_sets() {
    let map: Sets = serde_json::from_str(r#"{"a":["2","1","2"]}"#).unwrap();
    assert_eq!(map.lookup("a").0.to_vec(), vec!["1", "2"]);
}

#[rstest]
#[case("[]")]
#[case("42")]
#[case(r#""text""#)]
#[case(r#"{"a":5}"#)]
fn test_decode_rejects_other_shapes(#[case] json: &str) {
    let result: Result<Sets, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[rstest]
fn test_decode_is_fixed_point_after_normalization() {
    let once: Sets =
        serde_json::from_str(r#"{"b":["2"],"a":["1"],"b":["3"],"a":["4"]}"#).unwrap();
    let json = serde_json::to_string(&once).unwrap();
    let twice: Sets = serde_json::from_str(&json).unwrap();
    assert_eq!(once, twice);
    assert_eq!(json, serde_json::to_string(&twice).unwrap());
    assert_eq!(json, r#"{"a":["4"],"b":["3"]}"#);
}

// =============================================================================
// Round Trips
// =============================================================================

#[rstest]
#[case(Sets::absent())]
#[case(Sets::new())]
#[case(sample())]
fn test_json_roundtrip(#[case] original: Sets) {
    let json = serde_json::to_string(&original).unwrap();
    let restored: Sets = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, original);
    assert_eq!(restored.is_absent(), original.is_absent());
}

#[rstest]
#[case(Sets::absent())]
#[case(Sets::new())]
#[case(sample())]
fn test_bincode_roundtrip(#[case] original: Sets) {
    let bytes = bincode::serialize(&original).unwrap();
    let restored: Sets = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, original);
    assert_eq!(restored.is_absent(), original.is_absent());
    assert_eq!(bincode::serialize(&restored).unwrap(), bytes);
}

#[rstest]
fn test_bincode_absent_and_empty_differ_on_the_wire() {
    let absent = bincode::serialize(&Sets::absent()).unwrap();
    let empty = bincode::serialize(&Sets::new()).unwrap();
    assert_ne!(absent, empty);
}

#[rstest]
fn test_large_roundtrip() {
    let original: Sets = (0..200)
        .map(|index| (format!("key{index:03}"), StringSet::singleton(index.to_string())))
        .collect();
    let json = serde_json::to_string(&original).unwrap();
    let restored: Sets = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, original);
}

#[rstest]
fn test_nested_maps_compose() {
    let inner = sample();
    let outer: OrderedMergeMap<Sets> = OrderedMergeMap::new()
        .add("present", inner)
        .add("empty", Sets::new())
        .add("absent", Sets::absent());

    let json = serde_json::to_string(&outer).unwrap();
    let restored: OrderedMergeMap<Sets> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, outer);
    assert!(restored.get("absent").is_some_and(OrderedMergeMap::is_absent));
    assert!(restored.get("empty").is_some_and(|map| !map.is_absent()));

    let bytes = bincode::serialize(&outer).unwrap();
    let restored: OrderedMergeMap<Sets> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, outer);
}

#[rstest]
fn test_struct_field_roundtrip() {
    #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Report {
        name: String,
        sets: Sets,
    }

    let report = Report {
        name: "probe".to_string(),
        sets: sample(),
    };
    let json = serde_json::to_string(&report).unwrap();
    let restored: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, report);
}
