#![cfg(feature = "persistent")]
//! Integration tests for sharing persistent maps across threads.
//!
//! These tests verify that many threads can read one snapshot and derive
//! new versions from it concurrently without any of them observing a change
//! to the shared original.

use mergemap::persistent::{Sets, StringSet};
use mergemap::typeclass::Monoid;
use rstest::rstest;
use std::sync::Arc;
use std::thread;

fn base() -> Sets {
    Sets::new()
        .add("a", StringSet::singleton("1"))
        .add("b", StringSet::singleton("2"))
        .add("c", StringSet::singleton("3"))
}

#[rstest]
fn test_cross_thread_derivation_leaves_original_untouched() {
    let original = Arc::new(base());

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let shared = Arc::clone(&original);
            thread::spawn(move || {
                let tag = index.to_string();
                let derived = shared
                    .add("a", StringSet::singleton(tag.as_str()))
                    .add(&format!("thread-{index}"), StringSet::singleton(tag.as_str()))
                    .delete("c");
                assert_eq!(shared.size(), 3);
                assert_eq!(shared.lookup("a").0, StringSet::singleton("1"));
                derived
            })
        })
        .collect();

    let results: Vec<Sets> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, derived) in results.iter().enumerate() {
        assert_eq!(derived.size(), 3);
        assert!(derived.contains_key(&format!("thread-{index}")));
        assert!(derived.lookup("a").0.contains(&index.to_string()));
    }
    assert_eq!(*original, base());
}

#[rstest]
fn test_snapshots_from_threads_merge_deterministically() {
    let handles: Vec<_> = (0..4)
        .map(|observer| {
            thread::spawn(move || {
                (0..10).fold(Sets::new(), |map, host| {
                    map.add(
                        &format!("host-{host}"),
                        StringSet::singleton(format!("observer-{observer}")),
                    )
                })
            })
        })
        .collect();

    let snapshots: Vec<Sets> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    let forward = Sets::combine_all(snapshots.iter().cloned());
    let backward = Sets::combine_all(snapshots.iter().rev().cloned());

    assert_eq!(forward, backward);
    assert_eq!(forward.size(), 10);
    for (_, observers) in &forward {
        assert_eq!(observers.len(), 4);
    }
}

#[rstest]
fn test_concurrent_readers_share_one_value() {
    let shared = base();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(shared.keys(), vec!["a", "b", "c"]);
                let merged = shared.merge(&shared);
                assert_eq!(merged, shared);
            });
        }
    });
}
