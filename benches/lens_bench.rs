//! Benchmark for lens reads and updates over nested JSON values.
//!
//! Compares a composed lens update against hand-written `serde_json`
//! traversal, and measures multi-focus updates as the array grows.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use focal::optics::{filter, identity, path};
use serde_json::{Value, json};
use std::hint::black_box;

fn document(size: usize) -> Value {
    let users: Vec<Value> = (0..size)
        .map(|position| json!({"id": position, "profile": {"name": format!("user{position}"), "age": position % 90}}))
        .collect();
    json!({"data": {"users": users}})
}

// =============================================================================
// Nested Set Benchmark
// =============================================================================

fn benchmark_nested_set(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("nested_set");

    for size in [10, 100, 1000] {
        let source = document(size);
        let lens = path("data.users")
            .unwrap()
            .index(-1)
            .path("profile.age")
            .unwrap();

        // Composed lens
        group.bench_with_input(BenchmarkId::new("Lens", size), &source, |bencher, source| {
            bencher.iter(|| black_box(lens.set(source.clone(), black_box(json!(1))).unwrap()));
        });

        // Manual traversal
        group.bench_with_input(BenchmarkId::new("Manual", size), &source, |bencher, source| {
            bencher.iter(|| {
                let mut updated = source.clone();
                if let Some(age) = updated
                    .pointer_mut(&format!("/data/users/{}/profile/age", size - 1))
                {
                    *age = black_box(json!(1));
                }
                black_box(updated)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Multi-Focus Benchmark
// =============================================================================

fn benchmark_each_map(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("each_map");

    for size in [10, 100, 1000] {
        let source = document(size);
        let users = path("data.users").unwrap().view(source.clone());
        let ages = users.each(|user| user.path("profile.age")).unwrap();

        group.bench_with_input(BenchmarkId::new("each", size), &source, |bencher, source| {
            bencher.iter(|| {
                black_box(
                    ages.map(source.clone(), |age| json!(age.as_i64().unwrap_or(0) + 1))
                        .unwrap(),
                )
            });
        });

        let adults = path("data.users")
            .unwrap()
            .compose(filter(|user: &Value| user["profile"]["age"].as_i64().is_some_and(|age| age >= 18)));
        group.bench_with_input(BenchmarkId::new("filter", size), &source, |bencher, source| {
            bencher.iter(|| black_box(adults.get(source).unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// Get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let source = document(100);
    let lens = identity().compose_many([
        path("data.users").unwrap(),
        focal::optics::index(50),
        path("profile.name").unwrap(),
    ]);

    criterion.bench_function("composed_get", |bencher| {
        bencher.iter(|| black_box(lens.get(black_box(&source)).unwrap()));
    });
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(benches, benchmark_nested_set, benchmark_each_map, benchmark_get);

criterion_main!(benches);
