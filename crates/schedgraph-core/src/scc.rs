//! Strongly connected components and the condensation graph.
//!
//! # Algorithms
//!
//! - **Tarjan** (authoritative): one depth-first pass tracking a discovery
//!   index and low-link per vertex plus a stack of vertices on the current
//!   path. Components come out in the order their roots finish, and each
//!   component lists its members in pop order.
//! - **Kosaraju** (alternate): finish order over the forward graph, then a
//!   depth-first pass over the reverse graph in reverse finish order. Yields
//!   the same partition as Tarjan, possibly labeled and ordered differently.
//!
//! Both traversals run on an explicit stack of `(vertex, next-neighbor)`
//! frames, so path length is bounded by heap memory rather than the thread
//! stack.
//!
//! # Condensation
//!
//! [`build_condensation`] collapses each component to one vertex. Edges inside
//! a component are dropped and every distinct component pair gets exactly one
//! edge of weight 1, whatever the original weights were.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, Vertex, Weight};
use crate::metrics::{Metrics, ops};

/// One strongly connected component: a non-empty list of member vertices.
pub type Scc = Vec<Vertex>;

/// Weight given to every condensation edge.
pub const CONDENSATION_WEIGHT: Weight = 1;

const UNVISITED: usize = usize::MAX;

/// SCC discovery with an injected metrics collector.
#[derive(Debug, Default)]
pub struct SccFinder<M> {
    metrics: M,
}

impl<M: Metrics> SccFinder<M> {
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

    /// Partition `graph` with Tarjan's algorithm.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError::IndexOutOfRange`] from the graph accessors,
    /// which only happens for a graph whose adjacency is inconsistent.
    #[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn find_sccs_tarjan(&mut self, graph: &Graph) -> Result<Vec<Scc>, GraphError> {
        self.metrics.start_timer();
        let result = self.tarjan(graph);
        self.metrics.stop_timer();

        if let Ok(components) = &result {
            debug!(components = components.len(), "tarjan finished");
        }
        result
    }

    /// Partition `graph` with Kosaraju's algorithm.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError::IndexOutOfRange`] from the graph accessors.
    #[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn find_sccs_kosaraju(&mut self, graph: &Graph) -> Result<Vec<Scc>, GraphError> {
        self.metrics.start_timer();
        let result = self.kosaraju(graph);
        self.metrics.stop_timer();

        if let Ok(components) = &result {
            debug!(components = components.len(), "kosaraju finished");
        }
        result
    }

    fn tarjan(&mut self, graph: &Graph) -> Result<Vec<Scc>, GraphError> {
        let mut state = TarjanState::new(graph.vertex_count());
        let mut frames: Vec<(Vertex, usize)> = Vec::new();

        for root in graph.vertices() {
            if state.index[root] != UNVISITED {
                continue;
            }
            self.metrics.increment_operation(ops::DFS_VISITS);
            state.enter(root);
            frames.push((root, 0));

            while let Some(frame) = frames.last_mut() {
                let (v, cursor) = *frame;
                let succs = graph.neighbors(v)?;

                if let Some(&w) = succs.get(cursor) {
                    frame.1 += 1;
                    self.metrics.increment_operation(ops::DFS_EDGES);
                    if state.index[w] == UNVISITED {
                        self.metrics.increment_operation(ops::DFS_VISITS);
                        state.enter(w);
                        frames.push((w, 0));
                    } else if state.on_stack[w] {
                        state.low_link[v] = state.low_link[v].min(state.index[w]);
                    }
                    continue;
                }

                // All successors of `v` examined: the frame returns.
                frames.pop();
                if state.low_link[v] == state.index[v] {
                    state.emit_component(v);
                }
                if let Some(&(parent, _)) = frames.last() {
                    state.low_link[parent] = state.low_link[parent].min(state.low_link[v]);
                }
            }
        }

        Ok(state.components)
    }

    fn kosaraju(&mut self, graph: &Graph) -> Result<Vec<Scc>, GraphError> {
        let n = graph.vertex_count();
        let mut visited = vec![false; n];
        let mut finished: Vec<Vertex> = Vec::with_capacity(n);
        let mut frames: Vec<(Vertex, usize)> = Vec::new();

        // Pass 1: finish order over the forward graph.
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
                }
            }
        }

        // Pass 2: reverse graph, latest finisher first.
        visited.fill(false);
        let mut components = Vec::new();

        while let Some(root) = finished.pop() {
            if visited[root] {
                continue;
            }
            let mut component = Vec::new();
            self.metrics.increment_operation(ops::DFS_VISITS);
            visited[root] = true;
            component.push(root);
            frames.push((root, 0));

            while let Some(frame) = frames.last_mut() {
                let (v, cursor) = *frame;
                if let Some(&w) = graph.reverse_neighbors(v)?.get(cursor) {
                    frame.1 += 1;
                    self.metrics.increment_operation(ops::DFS_EDGES);
                    if !visited[w] {
                        self.metrics.increment_operation(ops::DFS_VISITS);
                        visited[w] = true;
                        component.push(w);
                        frames.push((w, 0));
                    }
                } else {
                    frames.pop();
                }
            }

            components.push(component);
        }

        Ok(components)
    }
}

/// Per-call Tarjan bookkeeping, owned by one traversal.
struct TarjanState {
    index: Vec<usize>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<Vertex>,
    next_index: usize,
    components: Vec<Scc>,
}

impl TarjanState {
    fn new(n: usize) -> Self {
        Self {
            index: vec![UNVISITED; n],
            low_link: vec![UNVISITED; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn enter(&mut self, v: Vertex) {
        self.index[v] = self.next_index;
        self.low_link[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    /// Pop the path stack down to and including `root`.
    fn emit_component(&mut self, root: Vertex) {
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            component.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(component);
    }
}

/// Map every vertex of a graph with `vertex_count` vertices to the index of
/// the component containing it. Vertices absent from `sccs` map to `None`.
///
/// # Errors
///
/// Returns [`GraphError::IndexOutOfRange`] if a component names a vertex
/// outside `0..vertex_count`.
pub fn component_of(sccs: &[Scc], vertex_count: usize) -> Result<Vec<Option<usize>>, GraphError> {
    let mut owner = vec![None; vertex_count];
    for (id, component) in sccs.iter().enumerate() {
        for &v in component {
            let slot = owner.get_mut(v).ok_or(GraphError::IndexOutOfRange {
                vertex: v,
                vertex_count,
            })?;
            *slot = Some(id);
        }
    }
    Ok(owner)
}

/// Collapse each component of `sccs` into one vertex of a new graph.
///
/// Vertex `i` of the result stands for `sccs[i]`. Original edges are scanned
/// by source vertex then insertion order; an edge between different
/// components adds `(comp(u), comp(v))` with weight [`CONDENSATION_WEIGHT`]
/// unless that pair was already added. The result has no self-loops and no
/// parallel edges.
///
/// # Errors
///
/// Returns [`GraphError::IndexOutOfRange`] if `sccs` names a vertex that is
/// not in `graph`.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), components = sccs.len()))]
pub fn build_condensation(graph: &Graph, sccs: &[Scc]) -> Result<Graph, GraphError> {
    let owner = component_of(sccs, graph.vertex_count())?;
    let mut condensation = Graph::new(sccs.len());
    let mut added: HashSet<(usize, usize)> = HashSet::new();

    for u in graph.vertices() {
        for &v in graph.neighbors(u)? {
            let (Some(from), Some(to)) = (owner[u], owner[v]) else {
                continue;
            };
            if from != to && added.insert((from, to)) {
                condensation.add_edge(from, to, CONDENSATION_WEIGHT)?;
            }
        }
    }

    debug!(edges = condensation.edge_count(), "condensation built");
    Ok(condensation)
}
