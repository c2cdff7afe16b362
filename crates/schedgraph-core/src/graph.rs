//! Directed, edge-weighted graph over the implicit vertex range `0..n`.
//!
//! # Storage
//!
//! - forward adjacency: successors of each vertex, in insertion order
//! - reverse adjacency: predecessors of each vertex, in insertion order
//! - weight lookup keyed by the ordered pair `(from, to)`
//!
//! ## Parallel edges
//!
//! Adding `(u, v)` twice keeps both adjacency entries, so traversals visit
//! `v` from `u` twice, but the weight lookup only remembers the most recent
//! weight for the pair. Every algorithm in this crate reads weights through
//! [`Graph::weight`], so both traversals of a parallel edge see that one
//! value.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::GraphError;

/// Vertex identifier: an index in `0..vertex_count`.
pub type Vertex = usize;

/// Edge weight and path distance type (fixed-width, wrapping on overflow).
pub type Weight = i32;

/// Weight reported for a pair that was never added.
pub const DEFAULT_WEIGHT: Weight = 1;

/// Directed weighted graph. Built once, then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    vertex_count: usize,
    adjacency: Vec<Vec<Vertex>>,
    reverse_adjacency: Vec<Vec<Vertex>>,
    weights: HashMap<(Vertex, Vertex), Weight>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            adjacency: vec![Vec::new(); vertex_count],
            reverse_adjacency: vec![Vec::new(); vertex_count],
            weights: HashMap::new(),
        }
    }

    /// Build a graph from `(from, to, weight)` triples, inserted in order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] on the first endpoint outside
    /// `0..vertex_count`.
    pub fn from_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item = (Vertex, Vertex, Weight)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new(vertex_count);
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Append `from → to` and overwrite the stored weight for that pair.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] if either endpoint is out of
    /// range; the graph is left untouched in that case.
    pub fn add_edge(&mut self, from: Vertex, to: Vertex, weight: Weight) -> Result<(), GraphError> {
        self.check(from)?;
        self.check(to)?;
        self.adjacency[from].push(to);
        self.reverse_adjacency[to].push(from);
        self.weights.insert((from, to), weight);
        Ok(())
    }

    /// Successors of `vertex`, in insertion order (duplicates kept).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] for an unknown vertex.
    pub fn neighbors(&self, vertex: Vertex) -> Result<&[Vertex], GraphError> {
        self.check(vertex)?;
        Ok(&self.adjacency[vertex])
    }

    /// Predecessors of `vertex`, in insertion order (duplicates kept).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] for an unknown vertex.
    pub fn reverse_neighbors(&self, vertex: Vertex) -> Result<&[Vertex], GraphError> {
        self.check(vertex)?;
        Ok(&self.reverse_adjacency[vertex])
    }

    /// Last weight written for `from → to`, or [`DEFAULT_WEIGHT`] if the pair
    /// was never added.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] if either endpoint is out of range.
    pub fn weight(&self, from: Vertex, to: Vertex) -> Result<Weight, GraphError> {
        self.check(from)?;
        self.check(to)?;
        Ok(self
            .weights
            .get(&(from, to))
            .copied()
            .unwrap_or(DEFAULT_WEIGHT))
    }

    /// Whether `from → to` was ever added. Consults the weight lookup only.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] if either endpoint is out of range.
    pub fn has_edge(&self, from: Vertex, to: Vertex) -> Result<bool, GraphError> {
        self.check(from)?;
        self.check(to)?;
        Ok(self.weights.contains_key(&(from, to)))
    }

    /// Number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of adjacency entries, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// The vertex id range `0..vertex_count`.
    #[must_use]
    pub const fn vertices(&self) -> Range<Vertex> {
        0..self.vertex_count
    }

    /// Every adjacency entry as `(from, to, weight)`, ordered by source vertex
    /// then insertion order. Parallel edges report the shared lookup weight.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex, Weight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(from, succs)| {
            succs.iter().map(move |&to| {
                let weight = self
                    .weights
                    .get(&(from, to))
                    .copied()
                    .unwrap_or(DEFAULT_WEIGHT);
                (from, to, weight)
            })
        })
    }

    const fn check(&self, vertex: Vertex) -> Result<(), GraphError> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(GraphError::IndexOutOfRange {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }
}
