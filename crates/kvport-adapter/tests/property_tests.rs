//! Property-based tests for the storage adapter using proptest
//!
//! These tests verify that:
//! 1. Set followed by Get returns the value unchanged
//! 2. PushToSet is idempotent and leaves exactly one copy of the value
//! 3. RemoveFromSet of an absent value leaves the stored text untouched
//! 4. Membership ignores object key order (the dev build enables
//!    `serde_json/preserve_order`, so reversed objects really differ)

use proptest::prelude::*;
use serde_json::{Map, Value};

use kvport_adapter::{canonical_json, StorageAdapter};
use kvport_store::{InMemoryStore, KeyValueStore};

// ============================================================================
// PROPERTY GENERATORS
// ============================================================================

/// Numbers that survive a text round-trip exactly.
fn arb_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        (-4000i32..4000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number(),
        "[a-z0-9 \"\\\\\n]{0,12}".prop_map(Value::String),
    ]
}

/// Arbitrary JSON values, nested up to a few levels.
fn arb_json() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|fields| {
                Value::Object(fields.into_iter().collect::<Map<String, Value>>())
            }),
        ]
    })
}

/// Rebuild every object in `value` with its fields inserted in reverse order.
fn reverse_key_order(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(reverse_key_order).collect()),
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.reverse();
            Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k.clone(), reverse_key_order(v)))
                    .collect(),
            )
        }
        other => other.clone(),
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn set_then_get_roundtrips(key in "[a-zA-Z]{1,10}", value in arb_json()) {
        let adapter = StorageAdapter::new(InMemoryStore::new());
        adapter.set_item(&key, &value).unwrap();
        prop_assert_eq!(adapter.get_item(&key).unwrap(), value);
    }

    #[test]
    fn push_is_idempotent(
        start in prop::collection::vec(arb_json(), 0..6),
        value in arb_json(),
    ) {
        let adapter = StorageAdapter::new(InMemoryStore::new());
        let needle = canonical_json(&value).unwrap();
        let start: Vec<Value> = start
            .into_iter()
            .filter(|item| canonical_json(item).unwrap() != needle)
            .collect();
        adapter.set_item("set", &Value::Array(start)).unwrap();

        adapter.push_to_set("set", &value).unwrap();
        let once = adapter.store().get_item("set").unwrap();
        adapter.push_to_set("set", &value).unwrap();
        let twice = adapter.store().get_item("set").unwrap();
        prop_assert_eq!(&once, &twice);

        let Value::Array(items) = adapter.get_item("set").unwrap() else {
            panic!("set is not an array");
        };
        let hits = items
            .iter()
            .filter(|item| canonical_json(item).unwrap() == needle)
            .count();
        prop_assert_eq!(hits, 1);
    }

    #[test]
    fn remove_absent_value_is_byte_identical(
        start in prop::collection::vec(arb_json(), 0..6),
        value in arb_json(),
    ) {
        let adapter = StorageAdapter::new(InMemoryStore::new());
        let needle = canonical_json(&value).unwrap();
        let start: Vec<Value> = start
            .into_iter()
            .filter(|item| canonical_json(item).unwrap() != needle)
            .collect();
        adapter.set_item("set", &Value::Array(start)).unwrap();

        let before = adapter.store().get_item("set").unwrap();
        adapter.remove_from_set("set", &value).unwrap();
        prop_assert_eq!(adapter.store().get_item("set").unwrap(), before);
    }

    #[test]
    fn removal_ignores_key_order(value in arb_json(), other in arb_json()) {
        let adapter = StorageAdapter::new(InMemoryStore::new());
        adapter.set_item("set", &Value::Array(vec![value.clone(), other.clone()])).unwrap();

        adapter.remove_from_set("set", &reverse_key_order(&value)).unwrap();

        let Value::Array(items) = adapter.get_item("set").unwrap() else {
            panic!("set is not an array");
        };
        let needle = canonical_json(&value).unwrap();
        prop_assert!(items.iter().all(|item| canonical_json(item).unwrap() != needle));
    }
}
