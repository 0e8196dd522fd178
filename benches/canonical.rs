use anon_records::Canonical;

use criterion::*;

const SIZES: [usize; 3] = [8, 64, 512];

fn record(len: usize) -> Canonical<u64> {
    (0..len as u64).collect()
}

fn set_at_index_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_at_index");
    for len in SIZES {
        let r = record(len);
        // Touching every slot is still one pass over the record.
        let updates: Vec<(usize, u64)> = (0..len).rev().map(|i| (i, 0)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(r.set_at_index_ref(updates.iter().copied())))
        });
    }
    group.finish();
}

fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for len in SIZES {
        let r = record(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter_batched(
                || r.clone(),
                |r| black_box(r.insert(vec![1, 2, 3])),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn project_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    for len in SIZES {
        let r = record(len);
        let indices: Vec<usize> = (0..len).rev().step_by(2).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(r.project(&indices)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    set_at_index_benchmark,
    insert_benchmark,
    project_benchmark
);
criterion_main!(benches);
