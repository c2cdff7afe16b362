#![forbid(unsafe_code)]
//! schedgraph-core library.
//!
//! Dependency-graph analysis for schedulers: strongly connected components,
//! condensation, topological ordering and single-source shortest/longest
//! paths over a DAG.
//!
//! # Conventions
//!
//! - **Errors**: Algorithms return [`GraphError`]; file and app boundaries use
//!   `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//! - **Metrics**: Every algorithm object owns a [`Metrics`] collector injected
//!   at construction. Pass `&mut collector` to share one across objects.

pub mod dagsp;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod pipeline;
pub mod scc;
pub mod topo;

pub use dagsp::{
    CriticalPathResult, DagPathEngine, UNREACHED_LONGEST, UNREACHED_SHORTEST, reconstruct_path,
};
pub use dataset::{EdgeData, GraphData};
pub use error::GraphError;
pub use graph::{DEFAULT_WEIGHT, Graph, Vertex, Weight};
pub use metrics::{Metrics, MetricsSnapshot, NoopMetrics, SimpleMetrics};
pub use pipeline::{AnalysisOptions, AnalysisReport, SccAlgorithm, analyze};
pub use scc::{Scc, SccFinder, build_condensation, component_of};
pub use topo::{TopologicalSorter, is_topological_order};
