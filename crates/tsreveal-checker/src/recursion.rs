//! Bounded walks over self-referential types.
//!
//! Expansion and assignability both follow references that can lead back to
//! a type already being processed. A [`RecursionGuard`] tracks the keys on the
//! current path and refuses entry on a cycle, past a depth limit, or once a
//! total step budget is spent. Callers degrade instead of failing: expansion
//! prints the type by name, assignability assumes success.

use std::hash::Hash;

use rustc_hash::FxHashSet;
use tsreveal_common::limits::{MAX_ASSIGNABILITY_DEPTH, MAX_EXPANSION_DEPTH};

/// Steps a single guard may take before it refuses everything.
const STEP_BUDGET: u32 = 100_000;

/// Which walk a guard protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    TypeExpansion,
    Assignability,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            RecursionProfile::TypeExpansion => MAX_EXPANSION_DEPTH,
            RecursionProfile::Assignability => MAX_ASSIGNABILITY_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the current path.
    Cycle,
    DepthExceeded,
    BudgetExceeded,
}

impl RecursionResult {
    pub fn is_entered(self) -> bool {
        self == RecursionResult::Entered
    }
}

/// Keys on the current path plus the limits. `enter` and `leave` calls pair
/// up per key.
#[derive(Debug)]
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    path: FxHashSet<K>,
    max_depth: u32,
    budget: u32,
    steps_left: u32,
    /// A limit (not a cycle) refused entry.
    limited: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, budget: u32) -> Self {
        RecursionGuard {
            path: FxHashSet::default(),
            max_depth,
            budget,
            steps_left: budget,
            limited: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        RecursionGuard::new(profile.max_depth(), STEP_BUDGET)
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        let Some(left) = self.steps_left.checked_sub(1) else {
            self.limited = true;
            return RecursionResult::BudgetExceeded;
        };
        self.steps_left = left;
        if self.path.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth() >= self.max_depth {
            self.limited = true;
            return RecursionResult::DepthExceeded;
        }
        self.path.insert(key);
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let removed = self.path.remove(&key);
        debug_assert!(removed, "left a key that was never entered");
    }

    pub fn is_visiting(&self, key: &K) -> bool {
        self.path.contains(key)
    }

    /// Some key on the current path satisfies `pred`.
    pub fn any_visiting(&self, pred: impl FnMut(&K) -> bool) -> bool {
        self.path.iter().any(pred)
    }

    pub fn depth(&self) -> u32 {
        u32::try_from(self.path.len()).unwrap_or(u32::MAX)
    }

    pub fn is_exceeded(&self) -> bool {
        self.limited
    }

    /// Start a fresh walk with a full budget.
    pub fn reset(&mut self) {
        self.path.clear();
        self.steps_left = self.budget;
        self.limited = false;
    }
}

#[cfg(test)]
#[path = "tests/recursion_tests.rs"]
mod recursion_tests;
