//! `schedgraph sccs`: list strongly connected components.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use schedgraph_core::{MetricsSnapshot, Scc, SccAlgorithm, SccFinder, SimpleMetrics};
use serde::Serialize;

use super::{SccArg, format_component, load_dataset};
use crate::config::AnalysisConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `schedgraph sccs`.
#[derive(Args, Debug)]
pub struct SccsArgs {
    /// Dataset JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// SCC algorithm; defaults to the config value.
    #[arg(long, value_enum)]
    pub scc: Option<SccArg>,
}

#[derive(Debug, Serialize)]
struct SccsOutput {
    file: String,
    algorithm: SccAlgorithm,
    vertex_count: usize,
    components: Vec<Scc>,
    metrics: MetricsSnapshot,
}

/// Execute `schedgraph sccs`.
pub fn run_sccs(args: &SccsArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let (_, graph) = load_dataset(&args.file)?;
    let algorithm = args.scc.map_or(config.scc_algorithm, SccAlgorithm::from);

    let mut finder = SccFinder::new(SimpleMetrics::new());
    let components = match algorithm {
        SccAlgorithm::Tarjan => finder.find_sccs_tarjan(&graph),
        SccAlgorithm::Kosaraju => finder.find_sccs_kosaraju(&graph),
    }
    .with_context(|| format!("Failed to partition {}", args.file.display()))?;

    let payload = SccsOutput {
        file: args.file.display().to_string(),
        algorithm,
        vertex_count: graph.vertex_count(),
        components,
        metrics: finder.metrics().snapshot(),
    };

    render(output, &payload, render_sccs_human)
}

fn render_sccs_human(payload: &SccsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let cyclic = payload.components.iter().filter(|c| c.len() > 1).count();

    pretty_section(w, "Strongly connected components")?;
    pretty_kv(w, "File", &payload.file)?;
    pretty_kv(w, "Algorithm", payload.algorithm.as_str())?;
    pretty_kv(w, "Vertices", payload.vertex_count.to_string())?;
    pretty_kv(
        w,
        "Components",
        format!("{} ({cyclic} cyclic)", payload.components.len()),
    )?;
    writeln!(w)?;

    for (id, members) in payload.components.iter().enumerate() {
        writeln!(w, "  C{id:<4} {}", format_component(members))?;
    }
    Ok(())
}
