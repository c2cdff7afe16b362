pub mod analyze;
pub mod generate;
pub mod sccs;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use schedgraph_core::{Graph, GraphData, SccAlgorithm};

/// `--scc` flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SccArg {
    Tarjan,
    Kosaraju,
}

impl From<SccArg> for SccAlgorithm {
    fn from(arg: SccArg) -> Self {
        match arg {
            SccArg::Tarjan => Self::Tarjan,
            SccArg::Kosaraju => Self::Kosaraju,
        }
    }
}

/// Load a dataset file and build its graph.
pub fn load_dataset(path: &Path) -> Result<(GraphData, Graph)> {
    let data = GraphData::load(path)?;
    let graph = data
        .to_graph()
        .with_context(|| format!("Invalid edge in {}", path.display()))?;
    Ok((data, graph))
}

/// Render a component as `{a, b, c}`.
pub fn format_component(members: &[usize]) -> String {
    let inner: Vec<String> = members.iter().map(ToString::to_string).collect();
    format!("{{{}}}", inner.join(", "))
}
