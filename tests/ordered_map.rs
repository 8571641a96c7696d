use ordered_collections::OrderedMap;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i64> {
    -100i64..100i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    GetOrInsert(i64, i64),
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        2 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| MapOp::GetOrInsert(k, v)),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

/// Association-list model: entries in insertion order.
fn model_position(model: &[(i64, i64)], key: i64) -> Option<usize> {
    model.iter().position(|&(k, _)| k == key)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Replays random operations on an `OrderedMap` and an association list.
    #[test]
    fn map_ops_match_model(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map = OrderedMap::new();
        let mut model: Vec<(i64, i64)> = Vec::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    let expected = match model_position(&model, k) {
                        Some(p) => Some(std::mem::replace(&mut model[p].1, v)),
                        None => {
                            model.push((k, v));
                            None
                        }
                    };
                    prop_assert_eq!(map.insert(k, v), expected, "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    let expected = model_position(&model, k).map(|p| model.remove(p).1);
                    prop_assert_eq!(map.remove(&k), expected, "remove({})", k);
                }
                MapOp::Get(k) => {
                    let expected = model_position(&model, k).map(|p| &model[p].1);
                    prop_assert_eq!(map.get(&k), expected, "get({})", k);
                    prop_assert_eq!(map.index_of(&k), model_position(&model, k), "index_of({})", k);
                }
                MapOp::GetOrInsert(k, v) => {
                    let expected = match model_position(&model, k) {
                        Some(p) => model[p].1,
                        None => {
                            model.push((k, v));
                            v
                        }
                    };
                    prop_assert_eq!(*map.get_or_insert_with(k, || v), expected, "get_or_insert_with({})", k);
                }
                MapOp::PopFirst => {
                    let expected = (!model.is_empty()).then(|| model.remove(0));
                    prop_assert_eq!(map.pop_first(), expected, "pop_first()");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(map.pop_last(), model.pop(), "pop_last()");
                }
            }
            prop_assert_eq!(map.len(), model.len(), "len mismatch after {:?}", op);
        }

        let entries: Vec<(i64, i64)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&entries, &model, "iteration order mismatch");
        let reversed: Vec<(i64, i64)> = map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let expected: Vec<(i64, i64)> = model.iter().rev().copied().collect();
        prop_assert_eq!(&reversed, &expected, "reverse iteration mismatch");
        let owned: Vec<(i64, i64)> = map.into_iter().collect();
        prop_assert_eq!(&owned, &model, "into_iter mismatch");
    }

    /// Positional lookup agrees with the association list.
    #[test]
    fn get_index_matches_model(keys in proptest::collection::vec(key_strategy(), 0..300)) {
        let map: OrderedMap<i64, usize> = keys.iter().copied().zip(0..).collect();
        let mut model: Vec<i64> = Vec::new();
        for k in &keys {
            if !model.contains(k) {
                model.push(*k);
            }
        }
        for (p, k) in model.iter().enumerate() {
            prop_assert_eq!(map.get_index(p).map(|(key, _)| key), Some(k));
        }
        prop_assert!(map.get_index(model.len()).is_none());
    }

    /// Retain keeps the order of survivors.
    #[test]
    fn retain_keeps_order(keys in proptest::collection::vec(key_strategy(), 0..300)) {
        let mut map: OrderedMap<i64, i64> = keys.iter().map(|&k| (k, k * 2)).collect();
        let expected: Vec<i64> = map.keys().copied().filter(|k| k % 3 != 0).collect();
        map.retain(|k, _| k % 3 != 0);
        prop_assert_eq!(map.keys().copied().collect::<Vec<_>>(), expected);
    }
}

#[test]
fn overwriting_keeps_position() {
    let mut map = OrderedMap::from([("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(map.insert("a", 10), Some(1));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(map["a"], 10);
}

#[test]
fn reinserting_moves_to_end() {
    let mut map = OrderedMap::from([("a", 1), ("b", 2)]);
    map.remove("a");
    map.insert("a", 3);
    assert_eq!(map.iter().collect::<Vec<_>>(), [(&"b", &2), (&"a", &3)]);
}

#[test]
fn iter_mut_updates_in_place() {
    let mut map = OrderedMap::from([(1, 1), (2, 2), (3, 3)]);
    for (_, value) in map.iter_mut().rev() {
        *value *= 10;
    }
    for value in map.values_mut() {
        *value += 1;
    }
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [11, 21, 31]);
}

#[test]
fn first_and_last_follow_insertion() {
    let mut map = OrderedMap::new();
    assert_eq!(map.first(), None);
    map.insert('z', 0);
    map.insert('a', 1);
    assert_eq!(map.first(), Some((&'z', &0)));
    assert_eq!(map.last(), Some((&'a', &1)));
    assert_eq!(map.pop_last(), Some(('a', 1)));
    assert_eq!(map.first(), map.last());
}

#[test]
fn clear_then_reuse() {
    let mut map: OrderedMap<u32, u32> = (0..100).map(|n| (n, n)).collect();
    map.clear();
    assert!(map.is_empty());
    map.insert(7, 7);
    assert_eq!(map.iter().collect::<Vec<_>>(), [(&7, &7)]);
    assert_eq!(map.get_index(0), Some((&7, &7)));
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_panics_when_absent() {
    let map: OrderedMap<&str, i32> = OrderedMap::new();
    let _value = &map["missing"];
}

#[cfg(feature = "serde")]
#[test]
fn serde_keeps_order() {
    let map = OrderedMap::from([("z".to_owned(), 1), ("a".to_owned(), 2)]);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"z":1,"a":2}"#);
    let restored: OrderedMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, map);
}
