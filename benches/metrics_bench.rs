//! Benchmarks for the metric computations.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_lossless,
    missing_docs
)]

use std::sync::Arc;

use arrow::{
    array::{Float64Array, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use limpar::{classify, corruption_rate, global_drift, Table};

fn create_table(rows: usize, perturb: bool) -> Table {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("score", DataType::Float64, false),
    ]));

    let ids: Vec<i32> = (0..rows as i32).collect();
    let categories: Vec<String> = ids.iter().map(|i| format!("cat_{}", i % 8)).collect();
    let scores: Vec<f64> = ids
        .iter()
        .map(|i| {
            let base = *i as f64 * 1.5;
            if perturb && i % 97 == 0 {
                base * 10.0
            } else {
                base
            }
        })
        .collect();

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(ids)),
            Arc::new(StringArray::from(categories)),
            Arc::new(Float64Array::from(scores)),
        ],
    )
    .expect("Failed to create batch");

    Table::from_batch(batch).expect("Failed to create table")
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [1_000, 10_000, 100_000].iter() {
        let original = create_table(*size, false);
        let cleaned = create_table(*size, true);
        let mask: Vec<bool> = (0..*size).map(|i| i % 10 == 0).collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| classify(black_box(&original), black_box(&cleaned), &mask).unwrap());
        });
    }

    group.finish();
}

fn bench_corruption_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("corruption_rate");

    for size in [1_000, 10_000, 100_000].iter() {
        let original = create_table(*size, false);
        let cleaned = create_table(*size, true);
        let injected: Vec<usize> = (0..*size).step_by(10).collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                corruption_rate(
                    black_box(&original),
                    black_box(&cleaned),
                    &["id", "category"],
                    &injected,
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_global_drift(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_drift");

    for size in [1_000, 10_000, 100_000].iter() {
        let original = create_table(*size, false);
        let cleaned = create_table(*size, true);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                global_drift(black_box(&original), black_box(&cleaned), None::<&[&str]>).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_corruption_rate,
    bench_global_drift
);
criterion_main!(benches);
