//! Operation counters and a stopwatch injected into every algorithm.
//!
//! Each algorithm takes its collector by value (or by `&mut`, through the
//! blanket impl) and hands it back to the caller, so stages never share one
//! mutable collector. [`NoopMetrics`] is a valid drop-in when nobody reads the
//! numbers.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Counter names recorded by the algorithms in this crate.
pub mod ops {
    /// One per vertex entered by a depth-first traversal.
    pub const DFS_VISITS: &str = "dfs_visits";
    /// One per adjacency entry examined by a depth-first traversal.
    pub const DFS_EDGES: &str = "dfs_edges";
    /// One per vertex pushed on the DFS finish stack.
    pub const STACK_PUSHES: &str = "stack_pushes";
    /// One per adjacency entry scanned while computing in-degrees.
    pub const IN_DEGREE_CALC: &str = "in_degree_calc";
    /// One per vertex enqueued by Kahn's algorithm.
    pub const QUEUE_PUSHES: &str = "queue_pushes";
    /// One per vertex dequeued by Kahn's algorithm.
    pub const QUEUE_POPS: &str = "queue_pops";
    /// One per vertex taken from the topological order during relaxation.
    pub const RELAXATIONS: &str = "relaxations";
    /// One per outgoing edge examined during relaxation.
    pub const EDGE_CHECKS: &str = "edge_checks";
    /// One per improved distance.
    pub const DISTANCE_UPDATES: &str = "distance_updates";

    /// Every counter above.
    pub const ALL: &[&str] = &[
        DFS_VISITS,
        DFS_EDGES,
        STACK_PUSHES,
        IN_DEGREE_CALC,
        QUEUE_PUSHES,
        QUEUE_POPS,
        RELAXATIONS,
        EDGE_CHECKS,
        DISTANCE_UPDATES,
    ];
}

/// Capability interface for metrics collection.
pub trait Metrics {
    /// Add one to the counter for `operation`.
    fn increment_operation(&mut self, operation: &str);

    /// Record the start timestamp.
    fn start_timer(&mut self);

    /// Record the stop timestamp.
    fn stop_timer(&mut self);

    /// Current value of the counter for `operation` (0 if never incremented).
    fn operation_count(&self, operation: &str) -> u64;

    /// Time between the last start and stop; zero until both are recorded.
    fn elapsed_time(&self) -> Duration;

    /// Clear all counters and the timer.
    fn reset(&mut self);

    /// [`Metrics::elapsed_time`] in whole nanoseconds, saturating at `u64::MAX`.
    fn elapsed_nanos(&self) -> u64 {
        u64::try_from(self.elapsed_time().as_nanos()).unwrap_or(u64::MAX)
    }
}

impl<M: Metrics + ?Sized> Metrics for &mut M {
    fn increment_operation(&mut self, operation: &str) {
        (**self).increment_operation(operation);
    }

    fn start_timer(&mut self) {
        (**self).start_timer();
    }

    fn stop_timer(&mut self) {
        (**self).stop_timer();
    }

    fn operation_count(&self, operation: &str) -> u64 {
        (**self).operation_count(operation)
    }

    fn elapsed_time(&self) -> Duration {
        (**self).elapsed_time()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Map-backed collector with a monotonic stopwatch.
#[derive(Debug, Clone, Default)]
pub struct SimpleMetrics {
    operations: BTreeMap<String, u64>,
    started: Option<Instant>,
    stopped: Option<Instant>,
}

impl SimpleMetrics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All counters in name order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, u64)> {
        self.operations
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    /// Freeze the current counters and elapsed time.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            elapsed_ns: self.elapsed_nanos(),
            operations: self.operations.clone(),
        }
    }
}

impl Metrics for SimpleMetrics {
    fn increment_operation(&mut self, operation: &str) {
        if let Some(count) = self.operations.get_mut(operation) {
            *count += 1;
        } else {
            self.operations.insert(operation.to_string(), 1);
        }
    }

    fn start_timer(&mut self) {
        self.started = Some(Instant::now());
        self.stopped = None;
    }

    fn stop_timer(&mut self) {
        self.stopped = Some(Instant::now());
    }

    fn operation_count(&self, operation: &str) -> u64 {
        self.operations.get(operation).copied().unwrap_or(0)
    }

    fn elapsed_time(&self) -> Duration {
        match (self.started, self.stopped) {
            (Some(start), Some(stop)) => stop.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    fn reset(&mut self) {
        self.operations.clear();
        self.started = None;
        self.stopped = None;
    }
}

/// Collector that records nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn increment_operation(&mut self, _operation: &str) {}

    fn start_timer(&mut self) {}

    fn stop_timer(&mut self) {}

    fn operation_count(&self, _operation: &str) -> u64 {
        0
    }

    fn elapsed_time(&self) -> Duration {
        Duration::ZERO
    }

    fn reset(&mut self) {}
}

/// Serializable, frozen view of one stage's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Wall time of the stage in nanoseconds.
    pub elapsed_ns: u64,
    /// Counter values keyed by operation name.
    pub operations: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    /// Snapshot any collector through the [`Metrics`] trait, reading the
    /// counters listed in `names`. Counters still at zero are left out, so
    /// capturing a [`SimpleMetrics`] with [`ops::ALL`] equals
    /// [`SimpleMetrics::snapshot`] for the names this crate records.
    #[must_use]
    pub fn capture<M: Metrics + ?Sized>(metrics: &M, names: &[&str]) -> Self {
        let operations = names
            .iter()
            .filter_map(|&name| {
                let count = metrics.operation_count(name);
                (count > 0).then(|| (name.to_string(), count))
            })
            .collect();
        Self {
            elapsed_ns: metrics.elapsed_nanos(),
            operations,
        }
    }
}
