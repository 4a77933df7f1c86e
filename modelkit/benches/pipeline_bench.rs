//! Benchmarks for pipeline execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use modelkit::pipeline::{pipe_fn, Next, Pipeline};
use modelkit::queue::InMemoryTaskQueue;
use modelkit::prelude::PipesThrough;

#[derive(Debug, Default)]
struct Counter {
    value: u64,
}

impl PipesThrough for Counter {}

fn increment_pipeline(len: usize) -> Pipeline<Counter> {
    (0..len)
        .map(|_| {
            pipe_fn(|mut counter: Counter, next: Next<'_, Counter>| {
                counter.value += 1;
                next.run(counter)
            })
        })
        .collect()
}

fn pipeline_benchmark(c: &mut Criterion) {
    let empty = increment_pipeline(0);
    let short = increment_pipeline(4);
    let long = increment_pipeline(64);

    c.bench_function("run_empty", |b| {
        b.iter(|| empty.then_return(black_box(Counter::default())))
    });
    c.bench_function("run_4_pipes", |b| {
        b.iter(|| short.then_return(black_box(Counter::default())))
    });
    c.bench_function("run_64_pipes", |b| {
        b.iter(|| long.then_return(black_box(Counter::default())))
    });
    c.bench_function("dispatch_and_drain_4_pipes", |b| {
        let queue = InMemoryTaskQueue::new("bench");
        b.iter(|| {
            let pipes = short.pipes().to_vec();
            let ack = Counter::default().dispatch_pipeline(&queue, Some(pipes));
            assert!(ack.is_ok(), "dispatch failed: {ack:?}");
            let processed = queue.drain();
            queue.take_pushed();
            processed
        })
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
