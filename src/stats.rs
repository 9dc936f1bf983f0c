//! In-process delivery counters, kept per destination.

use crate::core::StatsSink;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Counter label for every attempt, regardless of outcome.
pub const TOTAL: &str = "total";
/// Counter label for successful deliveries.
pub const OK: &str = "ok";
/// Counter label for failed deliveries.
pub const ERROR: &str = "error";

/// A table of `destination -> outcome -> count`.
#[derive(Debug, Default)]
pub struct OutputStats {
    counters: Mutex<HashMap<String, HashMap<String, u64>>>,
}

impl OutputStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of one counter, or 0 if it was never touched.
    pub fn get(&self, destination: &str, outcome: &str) -> u64 {
        let counters = match self.counters.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        counters
            .get(destination)
            .and_then(|by_outcome| by_outcome.get(outcome))
            .copied()
            .unwrap_or(0)
    }

    /// Returns a sorted copy of all counters for one destination.
    pub fn snapshot(&self, destination: &str) -> BTreeMap<String, u64> {
        let counters = match self.counters.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        counters
            .get(destination)
            .map(|by_outcome| by_outcome.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }
}

impl StatsSink for OutputStats {
    fn add(&self, destination: &str, outcome: &str, delta: u64) {
        let mut counters = match self.counters.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *counters
            .entry(destination.to_string())
            .or_default()
            .entry(outcome.to_string())
            .or_insert(0) += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_add_and_snapshot() {
        let stats = OutputStats::new();
        stats.add("slack", TOTAL, 1);
        stats.add("slack", OK, 1);
        stats.add("slack", TOTAL, 2);

        assert_eq!(stats.get("slack", TOTAL), 3);
        assert_eq!(stats.get("slack", OK), 1);
        assert_eq!(stats.get("slack", ERROR), 0);
        assert_eq!(stats.get("webhook", TOTAL), 0);

        let snapshot = stats.snapshot("slack");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[TOTAL], 3);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let stats = Arc::new(OutputStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = stats.clone();
                tokio::spawn(async move {
                    for _ in 0..100 {
                        stats.add("slack", TOTAL, 1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(stats.get("slack", TOTAL), 800);
    }
}
