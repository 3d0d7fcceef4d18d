//! Benchmarks for prompt selection.
//!
//! `SelectionEngine::pick` rebuilds the eligible pool on every call, so its
//! cost grows with the bundle. These runs use bundles far larger than any
//! shipped locale to keep an eye on that.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hotpotato_content::{ContentPool, LocaleBundle};
use hotpotato_core::types::Language;
use hotpotato_game::{eligible_prompts, SelectionEngine};

/// Build a pool with `categories` categories of `per_category` prompts each.
fn generate_pool(categories: usize, per_category: usize) -> (ContentPool, HashSet<String>) {
    let mut cats = serde_json::Map::new();
    let mut prompts = serde_json::Map::new();
    for c in 0..categories {
        let key = format!("category_{}", c);
        cats.insert(key.clone(), serde_json::Value::String(format!("Category {}", c)));
        let list = (0..per_category)
            .map(|i| serde_json::json!({ "text": format!("Prompt {} of category {}", i, c) }))
            .collect();
        prompts.insert(key, serde_json::Value::Array(list));
    }
    let tree = serde_json::json!({ "ui": {}, "categories": cats, "prompts": prompts });
    let bundle = LocaleBundle::from_value(Language::En, "bench.json", tree)
        .expect("generated bundle is valid");
    let enabled = (0..categories).map(|c| format!("category_{}", c)).collect();
    (ContentPool::new(Arc::new(bundle)), enabled)
}

fn bench_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_pick");
    group.measurement_time(Duration::from_secs(5));

    for &(categories, per_category) in &[(6, 20), (20, 50), (50, 200)] {
        let (pool, enabled) = generate_pool(categories, per_category);
        let size = categories * per_category;

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            let mut engine = SelectionEngine::default();
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| engine.pick(&pool, &enabled, false, &mut rng));
        });
    }

    group.finish();
}

fn bench_eligible_pool(c: &mut Criterion) {
    let (pool, enabled) = generate_pool(20, 50);

    let mut group = c.benchmark_group("eligible_prompts");
    group.bench_function("all_enabled", |b| {
        b.iter(|| eligible_prompts(&pool, &enabled, false));
    });
    group.bench_function("safe_mode", |b| {
        b.iter(|| eligible_prompts(&pool, &enabled, true));
    });
    group.finish();
}

/// Worst case for the fallback: every eligible prompt is recent.
fn bench_fallback(c: &mut Criterion) {
    let (pool, enabled) = generate_pool(1, 6);
    let mut engine = SelectionEngine::default();
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("selection_fallback_full_history", |b| {
        b.iter(|| engine.pick(&pool, &enabled, false, &mut rng));
    });
}

criterion_group!(benches, bench_pick, bench_eligible_pool, bench_fallback);
criterion_main!(benches);
