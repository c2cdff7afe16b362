//! `schedgraph analyze`: run the full pipeline on one dataset.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use schedgraph_core::{AnalysisOptions, AnalysisReport, MetricsSnapshot, Vertex, analyze};
use serde::Serialize;

use super::{SccArg, format_component, load_dataset};
use crate::config::AnalysisConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `schedgraph analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Dataset JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source vertex; defaults to the dataset's `source` field.
    #[arg(long)]
    pub source: Option<Vertex>,

    /// SCC algorithm; defaults to the config value.
    #[arg(long, value_enum)]
    pub scc: Option<SccArg>,

    /// Fail instead of falling back to DFS order when Kahn's algorithm finds a cycle.
    #[arg(long)]
    pub no_fallback: bool,
}

impl AnalyzeArgs {
    fn options(&self, config: &AnalysisConfig) -> AnalysisOptions {
        let mut options = config.options();
        if let Some(scc) = self.scc {
            options.scc_algorithm = scc.into();
        }
        if self.no_fallback {
            options.dfs_fallback = false;
        }
        options
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    file: String,
    #[serde(flatten)]
    report: AnalysisReport,
}

/// Execute `schedgraph analyze`.
pub fn run_analyze(args: &AnalyzeArgs, config: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let (data, graph) = load_dataset(&args.file)?;
    let source = args.source.unwrap_or(data.source);
    let options = args.options(config);

    let report = analyze(&graph, source, &options)
        .with_context(|| format!("Failed to analyze {}", args.file.display()))?;
    let payload = AnalyzeOutput {
        file: args.file.display().to_string(),
        report,
    };

    render(output, &payload, render_analyze_human)
}

fn component_label(id: usize) -> String {
    format!("C{id}")
}

fn join_components(ids: &[usize]) -> String {
    ids.iter()
        .copied()
        .map(component_label)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn render_metrics_line(
    w: &mut dyn Write,
    stage: &str,
    snapshot: &MetricsSnapshot,
) -> std::io::Result<()> {
    let elapsed = format!("{:?}", Duration::from_nanos(snapshot.elapsed_ns));
    let counters: Vec<String> = snapshot
        .operations
        .iter()
        .map(|(name, count)| format!("{name}={count}"))
        .collect();
    writeln!(w, "  {stage:<8} {elapsed:>12}  {}", counters.join(" "))
}

fn render_analyze_human(payload: &AnalyzeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &payload.report;

    pretty_section(w, "Summary")?;
    pretty_kv(w, "File", &payload.file)?;
    pretty_kv(w, "Vertices", report.vertex_count.to_string())?;
    pretty_kv(w, "Edges", report.edge_count.to_string())?;
    pretty_kv(
        w,
        "Source",
        format!(
            "{} (component {})",
            report.source,
            component_label(report.source_component)
        ),
    )?;
    pretty_kv(w, "SCC algorithm", report.scc_algorithm.as_str())?;
    pretty_kv(
        w,
        "Components",
        format!(
            "{} ({} cyclic)",
            report.sccs.len(),
            report.cyclic_component_count()
        ),
    )?;
    pretty_kv(
        w,
        "Condensation",
        format!(
            "{} vertices, {} edges",
            report.condensation_vertex_count, report.condensation_edge_count
        ),
    )?;

    writeln!(w)?;
    pretty_section(w, "Strongly connected components")?;
    for (id, members) in report.sccs.iter().enumerate() {
        writeln!(
            w,
            "  {:<5} {}  (size {})",
            component_label(id),
            format_component(members),
            members.len()
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Topological order")?;
    writeln!(w, "  {}", join_components(&report.topological_order))?;
    if report.order_is_approximate {
        writeln!(w, "  (approximate: DFS fallback order)")?;
    }

    writeln!(w)?;
    pretty_section(
        w,
        &format!(
            "Shortest distances from {}",
            component_label(report.source_component)
        ),
    )?;
    for (id, dist) in report.shortest_distances.iter().enumerate() {
        let shown = dist.map_or_else(|| "∞".to_string(), |d| d.to_string());
        writeln!(w, "  {:<5} {shown}", component_label(id))?;
    }

    writeln!(w)?;
    pretty_section(w, "Critical path")?;
    let critical = &report.critical_path;
    pretty_kv(w, "Length", critical.length.to_string())?;
    pretty_kv(w, "Path", join_components(&critical.path))?;
    if !critical.complete {
        pretty_kv(w, "Warning", "reconstruction stopped before the source")?;
    }

    writeln!(w)?;
    pretty_section(w, "Metrics")?;
    render_metrics_line(w, "scc", &report.metrics.scc)?;
    render_metrics_line(w, "topo", &report.metrics.topo)?;
    render_metrics_line(w, "shortest", &report.metrics.shortest)?;
    render_metrics_line(w, "critical", &report.metrics.critical)?;

    Ok(())
}
