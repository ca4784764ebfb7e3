//! One-to-one map between two key types.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Bijective map. Inserting a pair evicts any pair that shared either key,
/// so every left key has exactly one right key and vice versa.
#[derive(Clone, Debug)]
pub struct BiMap<L, R> {
    forward: FxHashMap<L, R>,
    backward: FxHashMap<R, L>,
}

impl<L, R> Default for BiMap<L, R> {
    fn default() -> Self {
        BiMap {
            forward: FxHashMap::default(),
            backward: FxHashMap::default(),
        }
    }
}

impl<L, R> BiMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `left <-> right`, returning the pairs that were evicted.
    pub fn insert(&mut self, left: L, right: R) -> Vec<(L, R)> {
        let mut evicted = Vec::new();
        if let Some(old) = self.remove_by_left(&left) {
            evicted.push(old);
        }
        if let Some(old) = self.remove_by_right(&right) {
            evicted.push(old);
        }
        self.forward.insert(left.clone(), right.clone());
        self.backward.insert(right, left);
        evicted
    }

    pub fn get_by_left(&self, left: &L) -> Option<&R> {
        self.forward.get(left)
    }

    pub fn get_by_right(&self, right: &R) -> Option<&L> {
        self.backward.get(right)
    }

    pub fn contains_left(&self, left: &L) -> bool {
        self.forward.contains_key(left)
    }

    pub fn contains_right(&self, right: &R) -> bool {
        self.backward.contains_key(right)
    }

    pub fn remove_by_left(&mut self, left: &L) -> Option<(L, R)> {
        let right = self.forward.remove(left)?;
        let left = self.backward.remove(&right)?;
        Some((left, right))
    }

    pub fn remove_by_right(&mut self, right: &R) -> Option<(L, R)> {
        let left = self.backward.remove(right)?;
        let right = self.forward.remove(&left)?;
        Some((left, right))
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, &R)> {
        self.forward.iter()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
    }
}

#[cfg(test)]
#[path = "tests/bimap_tests.rs"]
mod bimap_tests;
