use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of codec state for monitoring
#[derive(Debug, Clone)]
pub struct CodecStats {
    pub row_count: usize,
    pub dictionary_size: usize,
    pub compression_ratio: f64,
    pub memory_usage_bytes: usize,
    pub simd_backend: &'static str,
}

/// Per-codec query counters, maintained by every query method.
///
/// Relaxed atomics: the counters are monotonic tallies for an external
/// harness, not synchronization points.
#[derive(Debug, Default)]
pub struct QueryCounters {
    queries: AtomicU64,
    matched_rows: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryStats {
    pub total_queries: u64,
    pub total_matches: u64,
}

impl QueryCounters {
    pub fn new() -> Self {
        QueryCounters::default()
    }

    pub fn record(&self, matches: usize) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.matched_rows.fetch_add(matches as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> QueryStats {
        QueryStats {
            total_queries: self.queries.load(Ordering::Relaxed),
            total_matches: self.matched_rows.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.queries.store(0, Ordering::Relaxed);
        self.matched_rows.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let counters = QueryCounters::new();
        counters.record(3);
        counters.record(0);
        let stats = counters.snapshot();
        assert_eq!(stats.total_queries, 2);
        assert_eq!(stats.total_matches, 3);

        counters.reset();
        assert_eq!(counters.snapshot().total_queries, 0);
    }
}
