//! JSON dataset model and loader.
//!
//! A dataset file looks like:
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 4,
//!   "edges": [ { "u": 0, "v": 1, "w": 3 }, { "u": 1, "v": 2, "w": 2 } ],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! Unknown fields are ignored. Edges are replayed through
//! [`Graph::add_edge`] in file order, so duplicate pairs behave exactly like
//! parallel edges added by hand.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::{Graph, Vertex, Weight};

/// One serialized edge `u → v` with weight `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub u: Vertex,
    pub v: Vertex,
    pub w: Weight,
}

/// A serialized graph description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default = "default_directed")]
    pub directed: bool,
    pub n: usize,
    #[serde(default)]
    pub edges: Vec<EdgeData>,
    #[serde(default)]
    pub source: Vertex,
    #[serde(default = "default_weight_model")]
    pub weight_model: String,
}

const fn default_directed() -> bool {
    true
}

fn default_weight_model() -> String {
    "edge".to_string()
}

impl GraphData {
    /// An empty directed dataset with `n` vertices and source 0.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            directed: true,
            n,
            edges: Vec::new(),
            source: 0,
            weight_model: default_weight_model(),
        }
    }

    /// Append an edge.
    pub fn push_edge(&mut self, u: Vertex, v: Vertex, w: Weight) {
        self.edges.push(EdgeData { u, v, w });
    }

    /// Parse a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or describes an undirected
    /// graph.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json).context("invalid graph JSON")?;
        if !data.directed {
            bail!("undirected graphs are not supported");
        }
        Ok(data)
    }

    /// Read and parse a dataset file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let data = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(n = data.n, edges = data.edges.len(), "dataset loaded");
        Ok(data)
    }

    /// Write the dataset as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Build the in-memory graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfRange`] for an edge endpoint outside
    /// `0..n`.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        Graph::from_edges(self.n, self.edges.iter().map(|e| (e.u, e.v, e.w)))
    }
}
