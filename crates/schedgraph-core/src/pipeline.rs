//! End-to-end analysis: SCCs → condensation → order → distances.
//!
//! Every stage, and each of the two path passes, gets its own
//! [`SimpleMetrics`]; the report carries a frozen snapshot of each. The Kahn → DFS fallback is decided here, by the caller of
//! the sorter, not inside the sorter.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::dagsp::{CriticalPathResult, DagPathEngine, UNREACHED_SHORTEST};
use crate::error::GraphError;
use crate::graph::{Graph, Vertex, Weight};
use crate::metrics::{Metrics, MetricsSnapshot, SimpleMetrics, ops};
use crate::scc::{Scc, SccFinder, build_condensation, component_of};
use crate::topo::TopologicalSorter;

/// Which SCC algorithm partitions the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SccAlgorithm {
    #[default]
    Tarjan,
    Kosaraju,
}

impl SccAlgorithm {
    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tarjan => "tarjan",
            Self::Kosaraju => "kosaraju",
        }
    }
}

/// Knobs for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub scc_algorithm: SccAlgorithm,
    /// Use the DFS order when Kahn's algorithm reports a cycle.
    pub dfs_fallback: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            scc_algorithm: SccAlgorithm::Tarjan,
            dfs_fallback: true,
        }
    }
}

/// Per-stage metrics snapshots.
///
/// The shortest-path and critical-path passes each run on a fresh collector.
/// Restarting a collector's timer drops the previous stop, so a shared one
/// would report the last pass's time next to both passes' counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageMetrics {
    pub scc: MetricsSnapshot,
    pub topo: MetricsSnapshot,
    pub shortest: MetricsSnapshot,
    pub critical: MetricsSnapshot,
}

/// Everything [`analyze`] computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub source: Vertex,
    pub scc_algorithm: SccAlgorithm,
    pub sccs: Vec<Scc>,
    /// Condensation vertex holding `source`.
    pub source_component: usize,
    pub condensation_vertex_count: usize,
    pub condensation_edge_count: usize,
    /// Order of condensation vertices used for relaxation.
    pub topological_order: Vec<Vertex>,
    /// `true` when the order came from the DFS fallback.
    pub order_is_approximate: bool,
    /// Shortest distance to each condensation vertex; `None` if unreachable.
    pub shortest_distances: Vec<Option<Weight>>,
    pub critical_path: CriticalPathResult,
    pub metrics: StageMetrics,
}

impl AnalysisReport {
    /// Number of components with more than one member.
    #[must_use]
    pub fn cyclic_component_count(&self) -> usize {
        self.sccs.iter().filter(|scc| scc.len() > 1).count()
    }
}

/// Order `graph` with Kahn's algorithm, falling back to DFS order on a cycle
/// when `dfs_fallback` is set. Returns the order and whether it is approximate.
///
/// # Errors
///
/// Returns [`GraphError::CycleDetected`] when the graph is cyclic and
/// `dfs_fallback` is off.
pub fn order_with_fallback<M: Metrics>(
    sorter: &mut TopologicalSorter<M>,
    graph: &Graph,
    dfs_fallback: bool,
) -> Result<(Vec<Vertex>, bool), GraphError> {
    match sorter.order_kahn(graph) {
        Ok(order) => Ok((order, false)),
        Err(err @ GraphError::CycleDetected { .. }) if dfs_fallback => {
            warn!(%err, "falling back to DFS order; result may not be topological");
            Ok((sorter.order_dfs(graph)?, true))
        }
        Err(err) => Err(err),
    }
}

/// Run the full pipeline on `graph` from `source`.
///
/// # Errors
///
/// Returns [`GraphError::IndexOutOfRange`] if `source` is not a vertex, and
/// [`GraphError::CycleDetected`] only if the ordering step fails with the
/// fallback disabled.
#[instrument(skip(graph, options), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn analyze(
    graph: &Graph,
    source: Vertex,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, GraphError> {
    graph.neighbors(source)?;

    let mut finder = SccFinder::new(SimpleMetrics::new());
    let sccs = match options.scc_algorithm {
        SccAlgorithm::Tarjan => finder.find_sccs_tarjan(graph)?,
        SccAlgorithm::Kosaraju => finder.find_sccs_kosaraju(graph)?,
    };
    let scc_metrics = finder.into_metrics();

    let condensation = build_condensation(graph, &sccs)?;
    let source_component = component_of(&sccs, graph.vertex_count())?[source].ok_or(
        GraphError::IndexOutOfRange {
            vertex: source,
            vertex_count: graph.vertex_count(),
        },
    )?;

    let mut sorter = TopologicalSorter::new(SimpleMetrics::new());
    let (topological_order, order_is_approximate) =
        order_with_fallback(&mut sorter, &condensation, options.dfs_fallback)?;
    let topo_metrics = sorter.into_metrics();

    let mut engine = DagPathEngine::new(SimpleMetrics::new());
    let shortest = engine.shortest_paths(&condensation, &topological_order, source_component)?;
    let shortest_metrics = engine.into_metrics();

    let mut engine = DagPathEngine::new(SimpleMetrics::new());
    let critical_path =
        engine.find_critical_path(&condensation, &topological_order, source_component)?;
    let critical_metrics = engine.into_metrics();

    info!(
        sccs = sccs.len(),
        source_component,
        critical_length = critical_path.length,
        "analysis complete"
    );

    Ok(AnalysisReport {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        source,
        scc_algorithm: options.scc_algorithm,
        source_component,
        condensation_vertex_count: condensation.vertex_count(),
        condensation_edge_count: condensation.edge_count(),
        sccs,
        topological_order,
        order_is_approximate,
        shortest_distances: shortest
            .into_iter()
            .map(|d| (d != UNREACHED_SHORTEST).then_some(d))
            .collect(),
        critical_path,
        metrics: StageMetrics {
            scc: MetricsSnapshot::capture(&scc_metrics, ops::ALL),
            topo: MetricsSnapshot::capture(&topo_metrics, ops::ALL),
            shortest: MetricsSnapshot::capture(&shortest_metrics, ops::ALL),
            critical: MetricsSnapshot::capture(&critical_metrics, ops::ALL),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NoopMetrics;

    fn cyclic_graph() -> Graph {
        // Cycle 1 → 2 → 3 → 1 hanging off 0, then a tail 1 → 4 → 5.
        Graph::from_edges(
            6,
            [(0, 1, 2), (1, 2, 3), (2, 3, 1), (3, 1, 2), (1, 4, 4), (4, 5, 2)],
        )
        .expect("valid edges")
    }

    #[test]
    fn analyze_condenses_cycle_and_walks_components() {
        let report = analyze(&cyclic_graph(), 0, &AnalysisOptions::default()).expect("analysis");

        assert_eq!(report.vertex_count, 6);
        assert_eq!(report.sccs.len(), 4);
        assert_eq!(report.cyclic_component_count(), 1);
        assert_eq!(report.condensation_vertex_count, 4);
        assert_eq!(report.condensation_edge_count, 3);
        assert!(!report.order_is_approximate);

        // Condensation is the chain {0} → {1,2,3} → {4} → {5}, unit weights.
        assert_eq!(report.critical_path.length, 3);
        assert_eq!(report.critical_path.path.len(), 4);
        assert_eq!(report.critical_path.path[0], report.source_component);
        assert!(report.critical_path.complete);
        assert!(report.shortest_distances.iter().all(Option::is_some));

        assert_eq!(report.metrics.scc.operations.get(ops::DFS_VISITS), Some(&6));
        assert_eq!(report.metrics.topo.operations.get(ops::QUEUE_POPS), Some(&4));
        assert_eq!(report.metrics.shortest.operations.get(ops::RELAXATIONS), Some(&4));
        assert_eq!(report.metrics.critical.operations.get(ops::RELAXATIONS), Some(&4));
    }

    #[test]
    fn path_passes_are_measured_separately() {
        // Source in the middle of the chain: only {1,2,3} → {4} → {5} is reachable.
        let report = analyze(&cyclic_graph(), 1, &AnalysisOptions::default()).expect("analysis");
        let shortest = &report.metrics.shortest;
        let critical = &report.metrics.critical;

        // One relaxation per order entry and one edge check per reachable edge,
        // per pass, with nothing carried over from the other pass.
        assert_eq!(shortest.operations.get(ops::RELAXATIONS), Some(&4));
        assert_eq!(shortest.operations.get(ops::EDGE_CHECKS), Some(&2));
        assert_eq!(critical.operations, shortest.operations);
    }

    #[test]
    fn kosaraju_variant_agrees_on_component_count() {
        let options = AnalysisOptions {
            scc_algorithm: SccAlgorithm::Kosaraju,
            ..AnalysisOptions::default()
        };
        let report = analyze(&cyclic_graph(), 0, &options).expect("analysis");
        assert_eq!(report.sccs.len(), 4);
        assert_eq!(report.critical_path.length, 3);
    }

    #[test]
    fn unreachable_components_are_none() {
        let report = analyze(&cyclic_graph(), 5, &AnalysisOptions::default()).expect("analysis");
        let reachable = report.shortest_distances.iter().filter(|d| d.is_some()).count();
        assert_eq!(reachable, 1);
        assert_eq!(report.critical_path.length, 0);
    }

    #[test]
    fn bad_source_is_rejected() {
        let err = analyze(&cyclic_graph(), 6, &AnalysisOptions::default()).expect_err("bad source");
        assert!(matches!(err, GraphError::IndexOutOfRange { vertex: 6, .. }));
    }

    #[test]
    fn fallback_policy_is_caller_controlled() {
        let cyclic = Graph::from_edges(3, [(0, 1, 1), (1, 2, 1), (2, 1, 1)]).expect("valid edges");

        let mut sorter = TopologicalSorter::new(NoopMetrics);
        let (order, approximate) =
            order_with_fallback(&mut sorter, &cyclic, true).expect("fallback");
        assert!(approximate);
        assert_eq!(order.len(), 3);

        let err = order_with_fallback(&mut sorter, &cyclic, false).expect_err("no fallback");
        assert!(matches!(err, GraphError::CycleDetected { .. }));
    }
}
