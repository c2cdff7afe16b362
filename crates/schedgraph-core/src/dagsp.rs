//! Single-source shortest and longest paths over a topological order.
//!
//! # Preconditions
//!
//! The supplied order must be a topological order of the supplied graph.
//! The engine does not re-validate it; an approximate (DFS fallback) order
//! yields distances that are merely upper/lower bounds.
//!
//! # Sentinels and arithmetic
//!
//! Distances are [`Weight`] (`i32`). A vertex the source cannot reach keeps
//! [`UNREACHED_SHORTEST`] (`i32::MAX`) or [`UNREACHED_LONGEST`] (`i32::MIN`).
//! Additions wrap on overflow, exactly like two's-complement machine integers;
//! a sum that wraps onto or past a sentinel is compared like any other value.
//!
//! # Reconstruction
//!
//! Paths are rebuilt backward from the target. At each step the first vertex
//! `i` (ascending id) with an edge `i → current` and
//! `dist[i] + weight(i, current) == dist[current]` becomes the predecessor.
//! If no such vertex exists before the source is reached, the partial path is
//! returned. Each step scans every vertex, so reconstruction is `O(V²)` in the
//! worst case.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::GraphError;
use crate::graph::{Graph, Vertex, Weight};
use crate::metrics::{Metrics, ops};

/// Shortest-path distance of a vertex the source cannot reach.
pub const UNREACHED_SHORTEST: Weight = Weight::MAX;

/// Longest-path distance of a vertex the source cannot reach.
pub const UNREACHED_LONGEST: Weight = Weight::MIN;

/// The longest path found by [`DagPathEngine::find_critical_path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPathResult {
    /// Vertices from the source to `end_vertex`.
    pub path: Vec<Vertex>,
    /// Maximum finite longest-path distance.
    pub length: Weight,
    /// Lowest-id vertex achieving `length`.
    pub end_vertex: Vertex,
    /// `false` when reconstruction stopped before reaching the source.
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Objective {
    Shortest,
    Longest,
}

impl Objective {
    const fn sentinel(self) -> Weight {
        match self {
            Self::Shortest => UNREACHED_SHORTEST,
            Self::Longest => UNREACHED_LONGEST,
        }
    }

    const fn improves(self, candidate: Weight, current: Weight) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }
}

/// Relaxation over a topological order with an injected metrics collector.
#[derive(Debug, Default)]
pub struct DagPathEngine<M> {
    metrics: M,
}

impl<M: Metrics> DagPathEngine<M> {
    /// Wrap a metrics collector.
    #[must_use]
    pub const fn new(metrics: M) -> Self {
        Self { metrics }
    }

    /// The collector populated by the calls so far.
    #[must_use]
    pub const fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Give the collector back to the caller.
    #[must_use]
    pub fn into_metrics(self) -> M {
        self.metrics
    }

    /// Shortest distances from `source`, relaxing vertices in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] if `source` or an entry of
    /// `order` is not a vertex of `graph`.
    #[instrument(skip(self, graph, order), fields(vertices = graph.vertex_count()))]
    pub fn shortest_paths(
        &mut self,
        graph: &Graph,
        order: &[Vertex],
        source: Vertex,
    ) -> Result<Vec<Weight>, GraphError> {
        self.relax(graph, order, source, Objective::Shortest)
    }

    /// Longest distances from `source`, relaxing vertices in `order`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] if `source` or an entry of
    /// `order` is not a vertex of `graph`.
    #[instrument(skip(self, graph, order), fields(vertices = graph.vertex_count()))]
    pub fn longest_paths(
        &mut self,
        graph: &Graph,
        order: &[Vertex],
        source: Vertex,
    ) -> Result<Vec<Weight>, GraphError> {
        self.relax(graph, order, source, Objective::Longest)
    }

    /// Longest path from `source` to the farthest reachable vertex.
    ///
    /// The end vertex is the lowest id with the strictly greatest finite
    /// longest-path distance.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] if `source` or an entry of
    /// `order` is not a vertex of `graph`.
    pub fn find_critical_path(
        &mut self,
        graph: &Graph,
        order: &[Vertex],
        source: Vertex,
    ) -> Result<CriticalPathResult, GraphError> {
        let dist = self.longest_paths(graph, order, source)?;

        let mut length = UNREACHED_LONGEST;
        let mut end_vertex = source;
        for (v, &d) in dist.iter().enumerate() {
            if d != UNREACHED_LONGEST && d > length {
                length = d;
                end_vertex = v;
            }
        }

        let path = reconstruct(graph, &dist, source, end_vertex, Objective::Longest)?;
        let complete = path.first() == Some(&source);
        debug!(length, end_vertex, hops = path.len(), "critical path found");

        Ok(CriticalPathResult {
            path,
            length,
            end_vertex,
            complete,
        })
    }

    fn relax(
        &mut self,
        graph: &Graph,
        order: &[Vertex],
        source: Vertex,
        objective: Objective,
    ) -> Result<Vec<Weight>, GraphError> {
        let n = graph.vertex_count();
        if source >= n {
            return Err(GraphError::IndexOutOfRange {
                vertex: source,
                vertex_count: n,
            });
        }

        self.metrics.start_timer();
        let result = self.relax_in_order(graph, order, source, objective);
        self.metrics.stop_timer();
        result
    }

    fn relax_in_order(
        &mut self,
        graph: &Graph,
        order: &[Vertex],
        source: Vertex,
        objective: Objective,
    ) -> Result<Vec<Weight>, GraphError> {
        let sentinel = objective.sentinel();
        let mut dist = vec![sentinel; graph.vertex_count()];
        dist[source] = 0;

        for &u in order {
            self.metrics.increment_operation(ops::RELAXATIONS);
            let succs = graph.neighbors(u)?;
            if dist[u] == sentinel {
                continue;
            }
            for &v in succs {
                let candidate = dist[u].wrapping_add(graph.weight(u, v)?);
                self.metrics.increment_operation(ops::EDGE_CHECKS);
                if objective.improves(candidate, dist[v]) {
                    dist[v] = candidate;
                    self.metrics.increment_operation(ops::DISTANCE_UPDATES);
                }
            }
        }

        Ok(dist)
    }
}

/// Rebuild the shortest path from `source` to `target` out of `dist`.
///
/// Returns an empty path when `dist[target]` is [`UNREACHED_SHORTEST`], and a
/// path that does not start at `source` when no qualifying predecessor was
/// found part-way (logged as a warning).
///
/// # Errors
///
/// Returns [`GraphError::IndexOutOfRange`] if `source` or `target` is not a
/// vertex of `graph`.
pub fn reconstruct_path(
    graph: &Graph,
    dist: &[Weight],
    source: Vertex,
    target: Vertex,
) -> Result<Vec<Vertex>, GraphError> {
    reconstruct(graph, dist, source, target, Objective::Shortest)
}

fn reconstruct(
    graph: &Graph,
    dist: &[Weight],
    source: Vertex,
    target: Vertex,
    objective: Objective,
) -> Result<Vec<Vertex>, GraphError> {
    // Validates both endpoints.
    graph.has_edge(source, target)?;

    let sentinel = objective.sentinel();
    let at = |v: Vertex| dist.get(v).copied().unwrap_or(sentinel);
    if at(target) == sentinel {
        return Ok(Vec::new());
    }

    let mut reversed = vec![target];
    let mut current = target;

    // A simple path has at most `vertex_count` vertices; the bound only
    // matters when `dist` did not come from an acyclic relaxation.
    while current != source && reversed.len() < graph.vertex_count() {
        let mut predecessor = None;
        for i in graph.vertices() {
            if !graph.has_edge(i, current)? || at(i) == sentinel {
                continue;
            }
            if at(i).wrapping_add(graph.weight(i, current)?) == at(current) {
                predecessor = Some(i);
                break;
            }
        }

        let Some(prev) = predecessor else {
            break;
        };
        reversed.push(prev);
        current = prev;
    }

    if current != source {
        warn!(source, target, stopped_at = current, "path reconstruction incomplete");
    }

    reversed.reverse();
    Ok(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{NoopMetrics, SimpleMetrics};
    use crate::topo::TopologicalSorter;

    fn kahn(graph: &Graph) -> Vec<Vertex> {
        TopologicalSorter::new(NoopMetrics)
            .order_kahn(graph)
            .expect("dag")
    }

    fn scenario_dag() -> Graph {
        Graph::from_edges(5, [(0, 1, 3), (0, 2, 2), (1, 3, 4), (2, 3, 1), (3, 4, 5)])
            .expect("valid edges")
    }

    #[test]
    fn shortest_paths_with_negative_weights() {
        let g = Graph::from_edges(
            6,
            [
                (0, 1, 5),
                (0, 2, 3),
                (1, 3, 6),
                (1, 2, 2),
                (2, 4, 4),
                (2, 5, 2),
                (2, 3, 7),
                (3, 4, -1),
                (4, 5, -2),
            ],
        )
        .expect("valid edges");
        let order = kahn(&g);

        let dist = DagPathEngine::new(NoopMetrics)
            .shortest_paths(&g, &order, 0)
            .expect("shortest");
        assert_eq!(dist, vec![0, 5, 3, 10, 7, 5]);
    }

    #[test]
    fn longest_paths_prefer_first_improvement_on_ties() {
        let g = Graph::from_edges(4, [(0, 1, 2), (0, 2, 1), (1, 3, 3), (2, 3, 4)])
            .expect("valid edges");
        let order = kahn(&g);

        let dist = DagPathEngine::new(NoopMetrics)
            .longest_paths(&g, &order, 0)
            .expect("longest");
        assert_eq!(dist, vec![0, 2, 1, 5]);
    }

    #[test]
    fn scenario_dag_distances_and_critical_path() {
        let g = scenario_dag();
        let order = kahn(&g);
        let mut engine = DagPathEngine::new(NoopMetrics);

        let shortest = engine.shortest_paths(&g, &order, 0).expect("shortest");
        assert_eq!(shortest[4], 8, "0 → 2 → 3 → 4 = 2 + 1 + 5");
        assert_eq!(
            reconstruct_path(&g, &shortest, 0, 4).expect("in range"),
            vec![0, 2, 3, 4]
        );

        let critical = engine.find_critical_path(&g, &order, 0).expect("critical");
        assert_eq!(critical.length, 12);
        assert_eq!(critical.end_vertex, 4);
        assert_eq!(critical.path, vec![0, 1, 3, 4]);
        assert!(critical.complete);
    }

    #[test]
    fn unreachable_vertices_keep_sentinels() {
        let g = Graph::from_edges(4, [(1, 0, 1), (1, 2, 1), (3, 3, 1)]).expect("valid edges");
        let order = vec![1, 3, 0, 2];
        let mut engine = DagPathEngine::new(NoopMetrics);

        let shortest = engine.shortest_paths(&g, &order, 0).expect("shortest");
        assert_eq!(
            shortest,
            vec![0, UNREACHED_SHORTEST, UNREACHED_SHORTEST, UNREACHED_SHORTEST]
        );
        let longest = engine.longest_paths(&g, &order, 0).expect("longest");
        assert_eq!(
            longest,
            vec![0, UNREACHED_LONGEST, UNREACHED_LONGEST, UNREACHED_LONGEST]
        );
        assert!(reconstruct_path(&g, &shortest, 0, 2).expect("in range").is_empty());
    }

    #[test]
    fn critical_path_from_sink_is_just_the_source() {
        let g = scenario_dag();
        let order = kahn(&g);
        let critical = DagPathEngine::new(NoopMetrics)
            .find_critical_path(&g, &order, 4)
            .expect("critical");
        assert_eq!(critical.length, 0);
        assert_eq!(critical.end_vertex, 4);
        assert_eq!(critical.path, vec![4]);
        assert!(critical.complete);
    }

    #[test]
    fn critical_path_ties_pick_lowest_vertex() {
        // Both 1 and 2 sit at distance 4.
        let g = Graph::from_edges(3, [(0, 2, 4), (0, 1, 4)]).expect("valid edges");
        let order = kahn(&g);
        let critical = DagPathEngine::new(NoopMetrics)
            .find_critical_path(&g, &order, 0)
            .expect("critical");
        assert_eq!(critical.end_vertex, 1);
        assert_eq!(critical.path, vec![0, 1]);
    }

    #[test]
    fn reconstruction_picks_lowest_qualifying_predecessor() {
        // 0 → 1 → 3 and 0 → 2 → 3 both cost 2.
        let g = Graph::from_edges(4, [(0, 2, 1), (2, 3, 1), (0, 1, 1), (1, 3, 1)])
            .expect("valid edges");
        let order = kahn(&g);
        let dist = DagPathEngine::new(NoopMetrics)
            .shortest_paths(&g, &order, 0)
            .expect("shortest");
        assert_eq!(
            reconstruct_path(&g, &dist, 0, 3).expect("in range"),
            vec![0, 1, 3]
        );
    }

    #[test]
    fn reconstruction_truncates_silently_without_predecessor() {
        let g = Graph::from_edges(2, [(0, 1, 3)]).expect("valid edges");
        // Inconsistent distances: nothing explains dist[1] = 5.
        let path = reconstruct_path(&g, &[0, 5], 0, 1).expect("in range");
        assert_eq!(path, vec![1]);
    }

    #[test]
    fn relaxation_metrics_follow_the_order() {
        let g = scenario_dag();
        let order = kahn(&g);
        let mut engine = DagPathEngine::new(SimpleMetrics::new());
        engine.shortest_paths(&g, &order, 0).expect("shortest");

        let metrics = engine.into_metrics();
        assert_eq!(metrics.operation_count(ops::RELAXATIONS), 5);
        assert_eq!(metrics.operation_count(ops::EDGE_CHECKS), 5);
        // 1, 2, 3 (via 1), 3 (via 2), 4.
        assert_eq!(metrics.operation_count(ops::DISTANCE_UPDATES), 5);
    }

    #[test]
    fn unreached_vertices_do_not_count_edge_checks() {
        let g = Graph::from_edges(3, [(1, 2, 1)]).expect("valid edges");
        let mut engine = DagPathEngine::new(SimpleMetrics::new());
        engine.shortest_paths(&g, &[0, 1, 2], 0).expect("shortest");
        assert_eq!(engine.metrics().operation_count(ops::RELAXATIONS), 3);
        assert_eq!(engine.metrics().operation_count(ops::EDGE_CHECKS), 0);
    }

    #[test]
    fn additions_wrap_like_fixed_width_integers() {
        let g = Graph::from_edges(4, [(0, 1, Weight::MAX), (1, 2, 1), (1, 3, 2)])
            .expect("valid edges");
        let order = kahn(&g);
        let mut engine = DagPathEngine::new(NoopMetrics);

        let longest = engine.longest_paths(&g, &order, 0).expect("longest");
        // MAX + 1 wraps onto the sentinel and never beats it; MAX + 2 does.
        assert_eq!(longest, vec![0, Weight::MAX, Weight::MIN, Weight::MIN + 1]);

        let shortest = engine.shortest_paths(&g, &order, 0).expect("shortest");
        // 0 + MAX equals the sentinel, so vertex 1 never looks reached.
        assert_eq!(
            shortest,
            vec![0, UNREACHED_SHORTEST, UNREACHED_SHORTEST, UNREACHED_SHORTEST]
        );
    }

    #[test]
    fn parallel_edges_relax_twice_with_last_weight() {
        let g = Graph::from_edges(2, [(0, 1, 9), (0, 1, 4)]).expect("valid edges");
        let mut engine = DagPathEngine::new(SimpleMetrics::new());
        let dist = engine.longest_paths(&g, &[0, 1], 0).expect("longest");
        assert_eq!(dist, vec![0, 4]);
        assert_eq!(engine.metrics().operation_count(ops::EDGE_CHECKS), 2);
        assert_eq!(engine.metrics().operation_count(ops::DISTANCE_UPDATES), 1);
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let g = scenario_dag();
        let err = DagPathEngine::new(NoopMetrics)
            .shortest_paths(&g, &[0, 1, 2, 3, 4], 5)
            .expect_err("5 is not a vertex");
        assert_eq!(
            err,
            GraphError::IndexOutOfRange {
                vertex: 5,
                vertex_count: 5
            }
        );
        assert!(reconstruct_path(&g, &[0; 5], 0, 9).is_err());
    }
}
