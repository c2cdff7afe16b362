use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use schedgraph_core::{
    AnalysisOptions, DagPathEngine, Graph, NoopMetrics, SccAlgorithm, SccFinder,
    TopologicalSorter, analyze,
};

struct Tier {
    name: &'static str,
    vertices: usize,
    fan_out: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        vertices: 1_000,
        fan_out: 3,
    },
    Tier {
        name: "medium",
        vertices: 10_000,
        fan_out: 4,
    },
    Tier {
        name: "large",
        vertices: 100_000,
        fan_out: 4,
    },
];

/// Path reconstruction scans every vertex per hop, so the critical-path
/// benches stop at this size.
const RECONSTRUCTION_LIMIT: usize = 10_000;

/// Forward edges with pseudo-random targets plus a back edge every 97
/// vertices, so the graph has a mix of trivial and cyclic components.
fn synthetic_graph(tier: &Tier) -> Graph {
    let n = tier.vertices;
    let mut graph = Graph::new(n);
    let mut state = 0x9E37_79B9_u64;
    for u in 0..n {
        for _ in 0..tier.fan_out {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let span = (state >> 33) as usize % 64 + 1;
            let v = u + span;
            if v < n {
                let w = ((state >> 16) % 10) as i32 + 1;
                graph.add_edge(u, v, w).expect("in range");
            }
        }
        if u % 97 == 96 {
            graph.add_edge(u, u - 5, 1).expect("in range");
        }
    }
    graph
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline.tiered");

    for tier in &TIERS {
        let graph = synthetic_graph(tier);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("tarjan", tier.name), &graph, |b, g| {
            b.iter(|| black_box(SccFinder::new(NoopMetrics).find_sccs_tarjan(g)));
        });

        group.bench_with_input(BenchmarkId::new("kosaraju", tier.name), &graph, |b, g| {
            b.iter(|| black_box(SccFinder::new(NoopMetrics).find_sccs_kosaraju(g)));
        });

        group.bench_with_input(BenchmarkId::new("dfs_order", tier.name), &graph, |b, g| {
            b.iter(|| black_box(TopologicalSorter::new(NoopMetrics).order_dfs(g)));
        });

        if tier.vertices > RECONSTRUCTION_LIMIT {
            continue;
        }
        let options = AnalysisOptions {
            scc_algorithm: SccAlgorithm::Tarjan,
            dfs_fallback: true,
        };
        group.bench_with_input(BenchmarkId::new("analyze", tier.name), &graph, |b, g| {
            b.iter(|| black_box(analyze(g, 0, &options)));
        });
    }

    group.finish();
}

fn bench_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dagsp.relax");

    // Strip the back edges so Kahn succeeds on the raw graph.
    for tier in &TIERS {
        let cyclic = synthetic_graph(tier);
        let dag = Graph::from_edges(
            cyclic.vertex_count(),
            cyclic.edges().filter(|&(u, v, _)| u < v),
        )
        .expect("in range");
        let order = TopologicalSorter::new(NoopMetrics)
            .order_kahn(&dag)
            .expect("dag");
        group.throughput(Throughput::Elements(dag.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("shortest", tier.name), &dag, |b, g| {
            b.iter(|| black_box(DagPathEngine::new(NoopMetrics).shortest_paths(g, &order, 0)));
        });

        if tier.vertices > RECONSTRUCTION_LIMIT {
            continue;
        }
        group.bench_with_input(BenchmarkId::new("critical", tier.name), &dag, |b, g| {
            b.iter(|| black_box(DagPathEngine::new(NoopMetrics).find_critical_path(g, &order, 0)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_relaxation);
criterion_main!(benches);
