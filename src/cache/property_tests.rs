//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's invariants over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;

// == Strategies ==
/// Generates cache keys from a small alphabet so sequences revisit keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,32}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl: Option<u64> },
    Get { key: String },
    Delete { key: String },
    Exists { key: String },
}

/// Either no TTL or a zero TTL, which is already expired when stored
fn ttl_strategy() -> impl Strategy<Value = Option<u64>> {
    prop_oneof![3 => Just(None), 1 => Just(Some(0))]
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Exists { key }),
    ]
}

/// Reference model: a plain vector ordered most to least recently used.
///
/// Each value carries an `expired` flag: expired entries keep their slot and
/// recency position but are invisible to reads.
#[derive(Debug, Default)]
struct Model {
    order: Vec<String>,
    values: HashMap<String, (String, bool)>,
}

impl Model {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.insert(0, key.to_string());
    }

    fn set(&mut self, key: String, value: String, ttl: Option<u64>, capacity: usize) {
        if !self.values.contains_key(&key) && self.values.len() >= capacity {
            if let Some(victim) = self.order.pop() {
                self.values.remove(&victim);
            }
        }
        self.touch(&key);
        self.values.insert(key, (value, ttl == Some(0)));
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let value = self
            .values
            .get(key)
            .filter(|(_, expired)| !expired)
            .map(|(value, _)| value.clone());
        if value.is_some() {
            self.touch(key);
        }
        value
    }

    fn exists(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(|(_, expired)| !expired)
    }

    fn delete(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The store behaves exactly like a naive MRU-ordered list, and its
    // structural invariants hold after every single operation.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut store = CacheStore::new(capacity);
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => {
                    store.set(key.clone(), value.clone(), ttl);
                    model.set(key, value, ttl, capacity);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key));
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.delete(&key);
                }
                CacheOp::Exists { key } => {
                    prop_assert_eq!(store.exists(&key), model.exists(&key));
                }
            }

            prop_assert!(store.verify_integrity().is_ok(), "{:?}", store.verify_integrity());
            prop_assert_eq!(store.keys_by_recency(), model.order.clone());
            prop_assert_eq!(store.len(), model.values.len());
        }
    }

    // Once full, every further new-key SET evicts exactly one key: the least recently touched.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..20,
        keys in prop::collection::hash_set("[a-z]{1,8}", 1..60)
    ) {
        let mut store = CacheStore::new(capacity);
        let keys: Vec<String> = keys.into_iter().collect();

        for (i, key) in keys.iter().enumerate() {
            let expected_victim = if store.len() == capacity {
                store.keys_by_recency().last().cloned()
            } else {
                None
            };

            let evicted = store.set(key.clone(), "v".to_string(), None);

            prop_assert_eq!(evicted, expected_victim);
            prop_assert_eq!(store.len(), (i + 1).min(capacity));
        }
    }

    // Overwriting an existing key never changes the entry count or evicts anything.
    #[test]
    fn prop_overwrite_preserves_slot(
        keys in prop::collection::hash_set("[a-z]{1,8}", 2..10),
        pick in any::<prop::sample::Index>(),
        value in value_strategy()
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let capacity = keys.len();
        let mut store = CacheStore::new(capacity);
        for key in &keys {
            store.set(key.clone(), "old".to_string(), None);
        }

        let target = pick.get(&keys).clone();
        let evicted = store.set(target.clone(), value.clone(), Some(60));

        prop_assert_eq!(evicted, None);
        prop_assert_eq!(store.len(), capacity);
        prop_assert_eq!(store.stats().evictions, 0);
        prop_assert_eq!(store.get(&target), Some(value));
    }

    // After filling k1..kN and reading k1, the next new key evicts k2.
    #[test]
    fn prop_get_protects_from_eviction(
        keys in prop::collection::vec("[a-z]{1,8}", 2..10),
        new_key in "[A-Z]{1,8}"
    ) {
        let unique: Vec<String> = {
            let mut seen = HashSet::new();
            keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
        };
        prop_assume!(unique.len() >= 2);

        let mut store = CacheStore::new(unique.len());
        for key in &unique {
            store.set(key.clone(), format!("value_{}", key), None);
        }

        prop_assert!(store.get(&unique[0]).is_some());
        let evicted = store.set(new_key.clone(), "new".to_string(), None);

        prop_assert_eq!(evicted.as_ref(), Some(&unique[1]));
        prop_assert!(store.exists(&unique[0]));
        prop_assert!(store.exists(&new_key));
    }

    // Deleting an absent key leaves contents and recency order untouched.
    #[test]
    fn prop_delete_absent_is_noop(
        keys in prop::collection::vec("[a-z]{1,4}", 0..10),
        absent in "[0-9]{1,4}"
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY);
        for key in &keys {
            store.set(key.clone(), "v".to_string(), None);
        }
        let before = store.keys_by_recency();
        let stats_before = store.stats();

        prop_assert!(!store.delete(&absent));

        prop_assert_eq!(store.keys_by_recency(), before);
        prop_assert_eq!(store.stats(), stats_before);
    }

    // Zero-TTL entries are never visible, yet still occupy their slot until purged.
    #[test]
    fn prop_zero_ttl_is_invisible(
        key in key_strategy(),
        value in value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_CAPACITY);

        store.set(key.clone(), value, Some(0));

        prop_assert!(!store.exists(&key));
        prop_assert_eq!(store.get(&key), None);
        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.purge_expired(), 1);
        prop_assert!(store.is_empty());
        prop_assert!(store.verify_integrity().is_ok());
    }
}
