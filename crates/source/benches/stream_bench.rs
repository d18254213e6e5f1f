//! Benchmarks for prism-source streaming using criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prism_core::Value;
use prism_source::{stream_to_column, Column, ColumnDataSource};
use std::collections::BTreeMap;

fn stream_typed_rollover_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_typed_rollover");

    for rollover in [1_000usize, 10_000, 100_000].iter() {
        let base: Vec<f64> = (0..*rollover).map(|i| i as f64).collect();
        let chunk = Column::from(vec![1.0f64; 100]);

        group.bench_with_input(BenchmarkId::from_parameter(rollover), rollover, |b, &rollover| {
            b.iter(|| {
                // Column already at capacity: shifted in place
                let col = stream_to_column(Column::from(base.clone()), &chunk, Some(rollover)).unwrap();
                black_box(col)
            });
        });
    }

    group.finish();
}

fn stream_array_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_array");

    for size in [1_000usize, 10_000].iter() {
        let base: Vec<Value> = (0..*size).map(|i| Value::Int(i as i64)).collect();
        let chunk = Column::from(vec![Value::Int(0); 100]);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let col = stream_to_column(Column::from(base.clone()), &chunk, None).unwrap();
                black_box(col)
            });
        });
    }

    group.finish();
}

fn source_stream_benchmark(c: &mut Criterion) {
    c.bench_function("source_stream_3_columns", |b| {
        let source = ColumnDataSource::builder()
            .column("x", vec![0.0f64; 10_000])
            .column("y", vec![0.0f64; 10_000])
            .column("label", vec![Value::from("a"); 10_000])
            .build();

        b.iter(|| {
            let mut new_data = BTreeMap::new();
            new_data.insert("x".to_string(), Column::from(vec![1.0f64; 10]));
            new_data.insert("y".to_string(), Column::from(vec![2.0f64; 10]));
            new_data.insert("label".to_string(), Column::from(vec![Value::from("b"); 10]));
            source.stream(new_data, Some(10_000)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    stream_typed_rollover_benchmark,
    stream_array_benchmark,
    source_stream_benchmark
);
criterion_main!(benches);
