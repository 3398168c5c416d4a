//! Benchmarks for node encoding
//!
//! Large dependency graphs reach several hundred modules; encoding, label
//! wrapping and color hashing run once per module.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use modscope::graph::{ModuleGraph, ModuleId, ModuleKind};
use modscope::loc::{BatchResult, ModuleMetrics};
use modscope::visual::{
    encode_all, hashed_color, wrap_module_name, HashedColorConfig, VisualConfig,
};

/// Create a star-shaped module graph with `modules` dependencies of the root
fn create_graph(modules: usize) -> (ModuleGraph, ModuleMetrics) {
    let root = ModuleId::new("example.com/app", ModuleKind::Root);
    let mut graph = ModuleGraph::new();
    let mut metrics = ModuleMetrics::default();
    graph.add_module(&root);
    metrics.record(BatchResult {
        batch_id: 0,
        module: root.clone(),
        lines: 1_000,
    });

    for i in 0..modules {
        let dep = ModuleId::new(
            format!("github.com/author-{}/module-{}/v2", i % 37, i),
            ModuleKind::Named,
        );
        graph.add_edge(&root, &dep);
        metrics.record(BatchResult {
            batch_id: i + 1,
            module: dep,
            lines: 50 + (i as u64 * 7_919) % 200_000,
        });
    }

    (graph, metrics)
}

/// Benchmark encoding every module of a graph
fn bench_encode_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_all");
    let config = VisualConfig::default();

    for size in [100, 500, 1000, 5000].iter() {
        let (graph, metrics) = create_graph(*size);

        group.bench_with_input(BenchmarkId::new("modules", size), size, |b, _| {
            b.iter(|| black_box(encode_all(&graph, &metrics, &config)));
        });
    }

    group.finish();
}

/// Benchmark label wrapping of long module paths
fn bench_wrap(c: &mut Criterion) {
    let names = [
        "stdlib",
        "github.com/aws/aws-sdk-go-v2/service/s3",
        "golang.org/x/net/http2/hpack/internal/deeply/nested/package/path",
    ];

    c.bench_function("wrap_module_name", |b| {
        b.iter(|| {
            for name in names.iter() {
                black_box(wrap_module_name(name, 15));
            }
        });
    });
}

/// Benchmark hashed color derivation
fn bench_hashed_color(c: &mut Criterion) {
    let config = HashedColorConfig::default();
    let authors: Vec<String> = (0..1000).map(|i| format!("author-{}", i)).collect();

    c.bench_function("hashed_color_1000", |b| {
        b.iter(|| {
            for author in authors.iter() {
                black_box(hashed_color(author, &config));
            }
        });
    });
}

criterion_group!(benches, bench_encode_all, bench_wrap, bench_hashed_color);
criterion_main!(benches);
