//! Run-to-exhaustion benchmarks for the step engines.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stepviz_core::generate::{random_array, RandomGraphConfig};
use stepviz_core::{BubbleSort, Dijkstra, MergeSort};

fn bench_sorts(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let input = random_array(&mut rng, 64, 1000);

    c.bench_function("bubble_sort_64", |b| {
        b.iter(|| {
            let steps: usize = BubbleSort::new(black_box(input.clone())).count();
            black_box(steps)
        });
    });

    c.bench_function("merge_sort_64", |b| {
        b.iter(|| {
            let steps: usize = MergeSort::new(black_box(input.clone())).count();
            black_box(steps)
        });
    });
}

fn bench_dijkstra(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let graph = RandomGraphConfig::new(32, 96)
        .generate(&mut rng)
        .expect("valid config");
    let start = graph.nodes[0].id.clone();

    c.bench_function("dijkstra_32_nodes", |b| {
        b.iter(|| {
            let steps: usize =
                Dijkstra::new(black_box(graph.clone()), start.clone(), None).count();
            black_box(steps)
        });
    });
}

criterion_group!(benches, bench_sorts, bench_dijkstra);
criterion_main!(benches);
