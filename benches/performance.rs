//! Performance benchmarks for the topic registry.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use multitopic::{MemoryAuthority, TopicRegistry};

fn populated_registry(topics: usize) -> TopicRegistry<MemoryAuthority> {
    let registry: TopicRegistry<MemoryAuthority> =
        TopicRegistry::connect("memory://bench").unwrap();
    for i in 0..topics {
        let entry = registry.create_topic(&format!("topic-{i}")).unwrap();
        entry.create_subscription("billing").unwrap();
        entry.create_subscription("audit").unwrap();
    }
    registry
}

/// Benchmark cached lookups at varying registry sizes
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for topics in [10, 100, 1000] {
        let registry = populated_registry(topics);
        group.bench_with_input(BenchmarkId::new("topics", topics), &topics, |b, &n| {
            b.iter(|| {
                let name = format!("topic-{}", n / 2);
                black_box(registry.topic(&name).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark the full create path (existence check, handle bind, insert)
fn bench_create_topic(c: &mut Criterion) {
    c.bench_function("create_topic", |b| {
        let mut i = 0usize;
        let registry: TopicRegistry<MemoryAuthority> =
            TopicRegistry::connect("memory://bench").unwrap();
        b.iter(|| {
            let name = format!("topic-{i}");
            i += 1;
            black_box(registry.create_topic(&name).unwrap());
        });
    });
}

/// Benchmark the shutdown sweep over an already-closed registry
fn bench_close_topics(c: &mut Criterion) {
    let registry = populated_registry(100);
    registry.close_topics().unwrap();

    c.bench_function("close_topics_idle", |b| {
        b.iter(|| {
            registry.close_topics().unwrap();
        });
    });
}

criterion_group!(benches, bench_lookup, bench_create_topic, bench_close_topics);
criterion_main!(benches);
