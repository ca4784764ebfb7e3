use super::*;

/// Both directions agree on every pair.
fn assert_consistent(map: &BiMap<&'static str, u32>) {
    assert_eq!(map.forward.len(), map.backward.len());
    for (left, right) in map.iter() {
        assert_eq!(map.get_by_right(right), Some(left));
    }
}

#[test]
fn test_insert_and_lookup_both_ways() {
    let mut map = BiMap::new();
    assert!(map.insert("a", 1).is_empty());
    assert!(map.insert("b", 2).is_empty());

    assert_eq!(map.get_by_left(&"a"), Some(&1));
    assert_eq!(map.get_by_right(&2), Some(&"b"));
    assert!(map.contains_left(&"b"));
    assert!(!map.contains_right(&3));
    assert_eq!(map.len(), 2);
    assert_consistent(&map);
}

#[test]
fn test_insert_evicts_stale_partners() {
    let mut map = BiMap::new();
    map.insert("a", 1);
    map.insert("b", 2);

    // "a" moves to 2: both ("a", 1) and ("b", 2) are gone.
    let evicted = map.insert("a", 2);
    assert_eq!(evicted, vec![("a", 1), ("b", 2)]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_by_right(&1), None);
    assert_eq!(map.get_by_left(&"b"), None);
    assert_consistent(&map);
}

#[test]
fn test_reinserting_same_pair_replaces_it() {
    let mut map = BiMap::new();
    map.insert("a", 1);
    assert_eq!(map.insert("a", 1), vec![("a", 1)]);
    assert_eq!(map.len(), 1);
    assert_consistent(&map);
}

#[test]
fn test_remove_from_either_side() {
    let mut map = BiMap::new();
    map.insert("a", 1);
    map.insert("b", 2);

    assert_eq!(map.remove_by_left(&"a"), Some(("a", 1)));
    assert_eq!(map.remove_by_left(&"a"), None);
    assert_eq!(map.remove_by_right(&2), Some(("b", 2)));
    assert_eq!(map.remove_by_right(&2), None);
    assert!(map.is_empty());
    assert_consistent(&map);
}

#[test]
fn test_random_operations_keep_bijection() {
    let mut map = BiMap::new();
    let lefts = ["a", "b", "c", "d"];
    // Deterministic pseudo-random sequence of inserts and removals.
    let mut seed = 7u32;
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let left = lefts[(seed >> 8) as usize % lefts.len()];
        let right = (seed >> 16) % 5;
        match seed % 3 {
            0 => {
                map.remove_by_left(&left);
            }
            1 => {
                map.remove_by_right(&right);
            }
            _ => {
                map.insert(left, right);
            }
        }
        assert_consistent(&map);
    }
    map.clear();
    assert!(map.is_empty());
}
