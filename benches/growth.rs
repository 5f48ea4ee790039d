//! Tree growth benchmarks.
//!
//! - Sample count scaling on mixed features
//! - Continuous vs categorical split search
//! - Forest growth across thread counts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rsstree::testing::random_mixed_dataset;
use rsstree::training::SplitFinder;
use rsstree::{grow_forest, ForestParams, TreeGrower, TreeParams};

// =============================================================================
// Single tree
// =============================================================================

fn bench_tree_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth/tree");

    for n_samples in [1_000, 10_000, 50_000] {
        let ds = random_mixed_dataset(n_samples, 8, 4, 12, 42);
        group.throughput(Throughput::Elements(n_samples as u64));
        group.bench_with_input(BenchmarkId::new("mixed", n_samples), &ds, |b, ds| {
            b.iter(|| {
                let mut grower = TreeGrower::new(TreeParams::default(), 7).unwrap();
                black_box(grower.grow(ds).unwrap())
            })
        });
    }

    group.finish();
}

// =============================================================================
// Split search
// =============================================================================

fn bench_split_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth/split_search");
    let n_samples = 20_000;
    let ds = random_mixed_dataset(n_samples, 1, 1, 32, 3);
    let indices: Vec<u32> = (0..n_samples as u32).collect();
    group.throughput(Throughput::Elements(n_samples as u64));

    for (name, feature) in [("continuous", 0), ("categorical", 1)] {
        group.bench_function(name, |b| {
            let mut finder = SplitFinder::new(1e-6, 1);
            b.iter(|| black_box(finder.feature_loss(&ds, feature, &indices)))
        });
    }

    group.finish();
}

// =============================================================================
// Forest
// =============================================================================

fn bench_forest_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth/forest");
    let ds = random_mixed_dataset(5_000, 8, 4, 12, 42);

    for n_threads in [1, 2, 4] {
        let params = ForestParams {
            n_trees: 16,
            n_threads,
            tree: TreeParams {
                max_features_per_split: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("threads", n_threads), &params, |b, params| {
            b.iter(|| black_box(grow_forest(&ds, params).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tree_growth, bench_split_search, bench_forest_threads);
criterion_main!(benches);
