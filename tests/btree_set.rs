use std::collections::{BTreeSet as StdBTreeSet, HashSet};

use ordered_btree_set::{BTreeConfig, BTreeSet, BTreeSetError};
use rand::{rngs::StdRng, seq::SliceRandom, thread_rng, Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn verified_set(order: usize) -> BTreeSet<i32> {
    BTreeSet::with_config(BTreeConfig::new().order(order).self_verify(true)).unwrap()
}

fn contents<C>(set: &BTreeSet<i32, C>) -> Vec<i32> {
    set.iter().copied().collect()
}

#[test]
fn btree_set_works() {
    init_logger();
    let mut set: BTreeSet<i32> = BTreeSet::new();
    assert_eq!(set.order(), 6);
    assert!(set.is_empty());

    for i in 0..1000 {
        assert_eq!(set.add(i), Ok(true));
    }
    assert_eq!(set.len(), 1000);

    for i in 0..1000 {
        assert!(set.contains(&i));
    }
    assert!(!set.contains(&1000));
    assert!(!set.contains(&-1));

    assert!(set.remove(&12));
    assert!(!set.contains(&12));
    assert_eq!(set.add(12), Ok(true));
    assert_eq!(contents(&set), (0..1000).collect::<Vec<_>>());
    assert!(set.verify().is_ok());
}

#[test]
fn works_on_pointer_types() {
    let mut set: BTreeSet<String> = BTreeSet::with_order(5).unwrap();
    assert!(!set.contains(&"test".to_string()));
    assert_eq!(set.add("test".to_string()), Ok(true));
    for i in 0..100 {
        set.add(i.to_string()).unwrap();
    }
    assert_eq!(set.len(), 101);
    for i in 0..100 {
        assert!(set.contains(&i.to_string()));
    }

    let mut expected: Vec<String> = (0..100).map(|i| i.to_string()).collect();
    expected.push("test".to_string());
    expected.sort();
    assert_eq!(set.iter().cloned().collect::<Vec<_>>(), expected);
}

#[test]
fn random_op_test() {
    init_logger();
    let mut set: BTreeSet<i32> = BTreeSet::new();

    let n = 50000;

    let mut rng = thread_rng();

    let mut keys = HashSet::new();
    while keys.len() < n {
        keys.insert(rng.gen::<u16>() as i32);
    }
    let mut keys: Vec<_> = keys.into_iter().collect();

    for &key in keys.iter() {
        assert_eq!(set.add(key), Ok(true));
    }

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(contents(&set), sorted);

    keys.shuffle(&mut rng);
    let removed_keys = keys.split_off(n / 2);
    for key in removed_keys.iter() {
        assert!(set.remove(key));
    }

    for key in removed_keys.iter() {
        assert!(!set.contains(key));
    }

    for key in keys.iter() {
        assert!(set.contains(key));
    }
    assert_eq!(set.len(), n - n / 2);
    assert!(set.verify().is_ok());

    for key in keys.iter() {
        assert!(set.remove(key));
    }
    assert_eq!(set.len(), 0);
    assert!(set.iter().next().is_none());
    assert!(set.verify().is_ok());
}

#[test]
fn invariants_hold_after_every_operation() {
    init_logger();
    for order in [3, 4, 5, 6, 7, 10, 33] {
        let mut rng = StdRng::seed_from_u64(order as u64);
        let mut set = verified_set(order);
        let mut model = StdBTreeSet::new();

        for _ in 0..4000 {
            let key: i32 = rng.gen_range(0..400);
            if rng.gen_bool(0.55) {
                assert_eq!(set.add(key), Ok(model.insert(key)), "order {order} add {key}");
            } else {
                assert_eq!(set.remove(&key), model.remove(&key), "order {order} remove {key}");
            }
            if let Err(err) = set.verify() {
                panic!("order {order}: {err}\n{:?}", set);
            }
            assert_eq!(set.len(), model.len());
        }

        assert_eq!(contents(&set), model.iter().copied().collect::<Vec<_>>());
        for key in 0..400 {
            assert_eq!(set.contains(&key), model.contains(&key));
        }
    }
}

#[test]
fn add_is_idempotent() {
    let mut set: BTreeSet<i32> = BTreeSet::new();
    assert_eq!(set.add(7), Ok(true));
    assert_eq!(set.add(7), Ok(false));
    assert_eq!(set.len(), 1);
}

#[test]
fn removing_absent_element_changes_nothing() {
    let mut set: BTreeSet<i32> = BTreeSet::new_from(0..50).unwrap();
    let before = contents(&set);
    assert!(!set.remove(&50));
    assert!(!set.remove(&-3));
    assert_eq!(set.len(), 50);
    assert_eq!(contents(&set), before);
}

#[test]
fn round_trip_random_elements() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for order in 3..=9 {
        let mut values: Vec<i64> = (0..2000).map(|_| rng.gen_range(-1_000_000..1_000_000)).collect();
        values.sort();
        values.dedup();
        values.shuffle(&mut rng);

        let mut set: BTreeSet<i64> = BTreeSet::with_order(order).unwrap();
        for &v in &values {
            assert_eq!(set.add(v), Ok(true));
        }

        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), sorted);
        assert!(set.iter().zip(set.iter().skip(1)).all(|(a, b)| a < b));

        values.shuffle(&mut rng);
        for v in &values {
            assert!(set.remove(v));
        }
        assert_eq!(set.size(), 0);
        assert!(values.iter().all(|v| !set.contains(v)));
        assert_eq!(set.depth(), 1);
        assert!(set.verify().is_ok());
    }
}

#[test]
fn empty_set_iterates_nothing() {
    let set: BTreeSet<i32> = BTreeSet::new();
    let mut it = set.iter();
    assert!(!it.has_next());
    assert_eq!(it.next(), None);
}

#[test]
fn ascending_inserts_split_root_on_sixth_key() {
    init_logger();
    let mut set = verified_set(6);
    for i in 1..=5 {
        set.add(i).unwrap();
        assert_eq!(set.depth(), 1);
    }
    set.add(6).unwrap();
    assert_eq!(set.depth(), 2);
    assert_eq!(set.stats().splits, 1);

    for i in 7..=20 {
        set.add(i).unwrap();
    }
    assert_eq!(set.depth(), 2);
    assert_eq!(set.size(), 20);
}

#[test]
fn small_order_removals_rebalance() {
    init_logger();
    let mut set = verified_set(4);
    for i in [10, 20, 30, 40, 50] {
        set.add(i).unwrap();
    }

    assert!(set.remove(&10));
    assert!(set.remove(&20));
    let stats = set.stats();
    assert!(stats.steals + stats.merges >= 1);
    assert_eq!(contents(&set), vec![30, 40, 50]);
}

#[test]
fn adding_none_is_rejected() {
    let mut set: BTreeSet<i32> = BTreeSet::new_from([1, 2, 3]).unwrap();
    assert!(matches!(set.add(None), Err(BTreeSetError::InvalidArgument(_))));
    assert_eq!(set.size(), 3);
}

#[test]
fn cursor_removal_then_fresh_iteration() {
    init_logger();
    let mut set = verified_set(4);
    for i in 0..40 {
        set.add(i).unwrap();
    }

    {
        let mut cursor = set.cursor();
        for _ in 0..7 {
            cursor.next().unwrap();
        }
        cursor.remove().unwrap();
        assert_eq!(cursor.next(), Err(BTreeSetError::StaleCursor));
    }

    assert!(set.verify().is_ok());
    assert!(!set.contains(&6));
    assert_eq!(set.iter().count(), 39);

    // draining through one fresh cursor per removal
    loop {
        let mut cursor = set.cursor();
        if !cursor.has_next() {
            break;
        }
        let x = cursor.next().unwrap();
        if x % 2 == 0 {
            cursor.remove().unwrap();
            continue;
        }
        break;
    }
    assert!(set.verify().is_ok());
    assert_eq!(set.iter().next(), Some(&1));
}

#[test]
fn custom_comparator_takes_priority() {
    let mut set = BTreeSet::with_comparator(3, |a: &i32, b: &i32| b.cmp(a)).unwrap();
    for i in 0..100 {
        set.add(i).unwrap();
    }
    assert_eq!(contents(&set), (0..100).rev().collect::<Vec<_>>());
    assert!(set.verify().is_ok());

    let mut by_len = BTreeSet::with_comparator(6, |a: &&str, b: &&str| a.len().cmp(&b.len())).unwrap();
    assert_eq!(by_len.add("aa"), Ok(true));
    assert_eq!(by_len.add("bb"), Ok(false));
    assert!(by_len.contains(&"zz"));
}

#[test]
fn incomparable_elements_are_unorderable() {
    let mut set = BTreeSet::new_from([1.5, 2.5]).unwrap();
    assert_eq!(set.add(f64::NAN), Err(BTreeSetError::Unorderable));
    assert_eq!(set.len(), 2);
    assert!(set.verify().is_ok());

    assert!(matches!(
        BTreeSet::new_from([1.0, f64::NAN]),
        Err(BTreeSetError::Unorderable)
    ));
}

#[test]
fn order_below_three_is_rejected() {
    for order in [0, 1, 2] {
        assert!(matches!(
            BTreeSet::<i32>::with_order(order),
            Err(BTreeSetError::InvalidArgument(_))
        ));
    }
    assert!(BTreeSet::<i32>::with_order(3).is_ok());
}

#[test]
fn clear_then_reuse() {
    let mut set: BTreeSet<i32> = BTreeSet::new_from(0..500).unwrap();
    assert!(set.depth() > 1);
    set.clear();
    assert_eq!(set.len(), 0);
    assert_eq!(set.depth(), 1);
    assert!(set.iter().next().is_none());

    set.extend([3, 1, 2]);
    assert_eq!(contents(&set), vec![1, 2, 3]);
    assert_eq!(set.stats().nodes(), 1);
}

#[test]
fn clear_with_custom_comparator() {
    let mut set = BTreeSet::with_comparator(4, |a: &i32, b: &i32| b.cmp(a)).unwrap();
    set.extend(0..200);
    assert!(set.depth() > 1);
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.depth(), 1);
    assert!(set.verify().is_ok());

    set.extend([1, 3, 2]);
    assert_eq!(contents(&set), vec![3, 2, 1]);
}
