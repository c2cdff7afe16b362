//! Topological ordering.
//!
//! [`TopologicalSorter::order_kahn`] is the authoritative order and the only
//! one that detects cycles. Its tie-break is fully determined:
//!
//! 1. the queue is seeded with every zero in-degree vertex in ascending id order;
//! 2. the queue is FIFO;
//! 3. successors are decremented in adjacency insertion order, and a successor
//!    is enqueued the moment its in-degree reaches zero.
//!
//! [`TopologicalSorter::order_dfs`] returns reverse DFS finish order. It never
//! fails, and on a cyclic graph its result only approximates a topological
//! order.

use std::collections::VecDeque;

use tracing::{debug, instrument, trace};

use crate::error::GraphError;
use crate::graph::{Graph, Vertex};
use crate::metrics::{Metrics, ops};

/// Topological sorting with an injected metrics collector.
#[derive(Debug, Default)]
pub struct TopologicalSorter<M> {
    metrics: M,
}

impl<M: Metrics> TopologicalSorter<M> {
    /// Wrap a metrics collector.
    #[must_use]
    pub const fn new(metrics: M) -> Self {
        Self { metrics }
    }

    /// The collector populated by the last call.
    #[must_use]
    pub const fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Give the collector back to the caller.
    #[must_use]
    pub fn into_metrics(self) -> M {
        self.metrics
    }

    /// Kahn's algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] when fewer than `vertex_count`
    /// vertices could be ordered. No partial order is returned.
    #[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn order_kahn(&mut self, graph: &Graph) -> Result<Vec<Vertex>, GraphError> {
        self.metrics.start_timer();
        let result = self.kahn(graph);
        self.metrics.stop_timer();
        result
    }

    /// Reverse postorder of a depth-first traversal started from every
    /// unvisited vertex in ascending id order.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError::IndexOutOfRange`] from the graph accessors.
    /// Cycles are *not* reported.
    #[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn order_dfs(&mut self, graph: &Graph) -> Result<Vec<Vertex>, GraphError> {
        self.metrics.start_timer();
        let result = self.dfs(graph);
        self.metrics.stop_timer();
        result
    }

    fn kahn(&mut self, graph: &Graph) -> Result<Vec<Vertex>, GraphError> {
        let n = graph.vertex_count();
        let mut in_degree = vec![0_usize; n];

        for v in graph.vertices() {
            for &w in graph.neighbors(v)? {
                in_degree[w] += 1;
                self.metrics.increment_operation(ops::IN_DEGREE_CALC);
            }
        }

        let mut queue: VecDeque<Vertex> = VecDeque::new();
        for v in graph.vertices() {
            if in_degree[v] == 0 {
                queue.push_back(v);
                self.metrics.increment_operation(ops::QUEUE_PUSHES);
            }
        }

        let mut order = Vec::with_capacity(n);
        while let Some(v) = queue.pop_front() {
            self.metrics.increment_operation(ops::QUEUE_POPS);
            order.push(v);

            for &w in graph.neighbors(v)? {
                in_degree[w] -= 1;
                if in_degree[w] == 0 {
                    queue.push_back(w);
                    self.metrics.increment_operation(ops::QUEUE_PUSHES);
                }
            }
        }

        if order.len() != n {
            debug!(ordered = order.len(), vertices = n, "cycle detected");
            return Err(GraphError::CycleDetected {
                ordered: order.len(),
                vertex_count: n,
            });
        }
        Ok(order)
    }

    fn dfs(&mut self, graph: &Graph) -> Result<Vec<Vertex>, GraphError> {
        let n = graph.vertex_count();
        let mut visited = vec![false; n];
        let mut finished: Vec<Vertex> = Vec::with_capacity(n);
        let mut frames: Vec<(Vertex, usize)> = Vec::new();

        for root in graph.vertices() {
            if visited[root] {
                continue;
            }
            self.metrics.increment_operation(ops::DFS_VISITS);
            visited[root] = true;
            frames.push((root, 0));

            while let Some(frame) = frames.last_mut() {
                let (v, cursor) = *frame;
                if let Some(&w) = graph.neighbors(v)?.get(cursor) {
                    frame.1 += 1;
                    self.metrics.increment_operation(ops::DFS_EDGES);
                    if !visited[w] {
                        self.metrics.increment_operation(ops::DFS_VISITS);
                        visited[w] = true;
                        frames.push((w, 0));
                    }
                } else {
                    frames.pop();
                    finished.push(v);
                    self.metrics.increment_operation(ops::STACK_PUSHES);
                }
            }
        }

        finished.reverse();
        trace!(?finished, "dfs order");
        Ok(finished)
    }
}

/// Whether `order` lists every vertex of `graph` exactly once with `u`
/// before `v` for every edge `u → v`.
///
/// # Errors
///
/// Propagates [`GraphError::IndexOutOfRange`] from the graph accessors.
pub fn is_topological_order(graph: &Graph, order: &[Vertex]) -> Result<bool, GraphError> {
    let n = graph.vertex_count();
    if order.len() != n {
        return Ok(false);
    }

    let mut position = vec![usize::MAX; n];
    for (pos, &v) in order.iter().enumerate() {
        match position.get_mut(v) {
            Some(slot) if *slot == usize::MAX => *slot = pos,
            _ => return Ok(false),
        }
    }

    for u in graph.vertices() {
        for &v in graph.neighbors(u)? {
            if position[u] >= position[v] {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
