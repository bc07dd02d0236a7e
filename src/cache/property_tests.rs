//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the short-life cache bounds and the glob matcher.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::cache::{glob_match, Namespace, ShortLifeCache};

// == Test Configuration ==
const TEST_MAX_AGE: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates logical cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:-]{1,32}".prop_map(|s| s)
}

/// Generates encoded values
fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

#[derive(Debug, Clone)]
enum SlcOp {
    Put { key: String, value: Vec<u8> },
    Get { key: String },
    Invalidate { key: String },
}

fn slc_op_strategy() -> impl Strategy<Value = SlcOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| SlcOp::Put { key, value }),
        key_strategy().prop_map(|key| SlcOp::Get { key }),
        key_strategy().prop_map(|key| SlcOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The short-life cache never holds more than its maximum size, and its
    // order index tracks exactly the stored keys.
    #[test]
    fn prop_size_bound_and_index_consistency(
        max_size in 1usize..20,
        ops in prop::collection::vec(slc_op_strategy(), 1..100)
    ) {
        let mut slc = ShortLifeCache::new(max_size, TEST_MAX_AGE);

        for op in ops {
            match op {
                SlcOp::Put { key, value } => slc.put(&key, value, None),
                SlcOp::Get { key } => { let _ = slc.get(&key); }
                SlcOp::Invalidate { key } => { slc.invalidate(&key); }
            }

            prop_assert!(slc.len() <= max_size, "size {} exceeds {}", slc.len(), max_size);
            let ordered = slc.keys();
            prop_assert_eq!(ordered.len(), slc.len());
            for key in &ordered {
                prop_assert!(slc.contains(key), "index holds unknown key {}", key);
            }
        }
    }

    // Inserting max_size + n distinct keys keeps exactly the last max_size,
    // evicting the n oldest first.
    #[test]
    fn prop_fifo_eviction_order(
        keys in prop::collection::hash_set(key_strategy(), 1..60),
        max_size in 1usize..20
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut slc = ShortLifeCache::new(max_size, TEST_MAX_AGE);

        for key in &keys {
            slc.put(key, key.as_bytes().to_vec(), None);
        }

        let kept = keys.len().min(max_size);
        let expected: Vec<String> = keys[keys.len() - kept..].to_vec();
        prop_assert_eq!(slc.keys(), expected);
        prop_assert_eq!(slc.stats().evictions as usize, keys.len() - kept);
    }

    // The last value put for a key is the one read back.
    #[test]
    fn prop_last_write_wins(
        key in key_strategy(),
        values in prop::collection::vec(value_strategy(), 1..10)
    ) {
        let mut slc = ShortLifeCache::new(10, TEST_MAX_AGE);
        for value in &values {
            slc.put(&key, value.clone(), None);
        }

        prop_assert_eq!(slc.get(&key), values.last().cloned());
        prop_assert_eq!(slc.len(), 1);
    }

    // Pattern invalidation removes exactly the keys the matcher selects.
    #[test]
    fn prop_invalidate_matching_agrees_with_matcher(
        keys in prop::collection::hash_set(key_strategy(), 1..30),
        prefix in "[a-z]{1,3}"
    ) {
        let mut slc = ShortLifeCache::new(100, TEST_MAX_AGE);
        for key in &keys {
            slc.put(key, vec![1], None);
        }

        let pattern = format!("{}*", prefix);
        let expected: HashSet<&String> = keys.iter().filter(|k| !k.starts_with(&prefix)).collect();
        let removed = slc.invalidate_matching(&pattern);

        prop_assert_eq!(removed, keys.len() - expected.len());
        let remaining = slc.keys();
        prop_assert_eq!(remaining.len(), expected.len());
        for key in &remaining {
            prop_assert!(expected.contains(key));
            prop_assert!(!glob_match(&pattern, key));
        }
    }

    // A literal pattern only matches itself.
    #[test]
    fn prop_literal_pattern_matches_itself(text in "[a-zA-Z0-9_:-]{0,32}") {
        prop_assert!(glob_match(&text, &text));
        prop_assert!(glob_match("*", &text));
    }

    // Namespacing is injective and reversible.
    #[test]
    fn prop_namespace_round_trip(
        name in "[a-z][a-z0-9-]{0,10}",
        a in key_strategy(),
        b in key_strategy()
    ) {
        let ns = Namespace::new(name.clone()).unwrap();
        let key = ns.key(&a);

        prop_assert_eq!(key.clone(), format!("{}:{}", name, a));
        prop_assert_eq!(ns.strip(&key), Some(a.as_str()));
        if a != b {
            prop_assert_ne!(key, ns.key(&b));
        }
    }

    // Distinct namespaces never map two logical keys to one backend key, and
    // one namespace's prefix never selects another namespace's keys.
    #[test]
    fn prop_distinct_namespaces_are_disjoint(
        first in "[a-z][a-z0-9-]{0,6}",
        second in "[a-z][a-z0-9-]{0,6}",
        a in key_strategy(),
        b in key_strategy()
    ) {
        prop_assume!(first != second);
        let ns_a = Namespace::new(first).unwrap();
        let ns_b = Namespace::new(second).unwrap();

        prop_assert_ne!(ns_a.key(&a), ns_b.key(&b));
        let b_key = ns_b.key(&b);
        prop_assert_eq!(ns_a.strip(&b_key), None);
        prop_assert!(!ns_b.key(&b).starts_with(ns_a.prefix()));
    }
}
