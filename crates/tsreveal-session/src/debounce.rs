//! Trailing-edge debouncing.

use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::trace;
use tsreveal_common::limits::MIN_DEBOUNCE_MS;

/// Holds at most one deadline per key. Every `schedule` pushes the key's
/// deadline to `now + delay`, so a burst of calls fires once, one quiet
/// period after the last call.
#[derive(Debug)]
pub struct Debouncer<K> {
    delay: Duration,
    deadlines: FxHashMap<K, Instant>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Ord + std::fmt::Debug,
{
    /// `delay` is raised to the minimum quiet period when shorter.
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay: delay.max(Duration::from_millis(MIN_DEBOUNCE_MS)),
            deadlines: FxHashMap::default(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, key: K, now: Instant) {
        let deadline = now + self.delay;
        trace!(?key, delay_ms = self.delay.as_millis() as u64, "debounce scheduled");
        self.deadlines.insert(key, deadline);
    }

    /// Drop the pending deadline for `key`. Returns whether there was one.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.deadlines.remove(key).is_some()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.deadlines.contains_key(key)
    }

    /// Remove and return the keys whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(Instant, K)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, key.clone()))
            .collect();
        due.sort();
        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod debounce_tests;
