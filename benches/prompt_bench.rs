use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use just_begin::prompt;
use just_begin::validation::{validate_with_wildcard, PlanRequestBody};

fn bench_prompt(c: &mut Criterion) {
    let body: PlanRequestBody = serde_json::from_value(json!({
        "capital": 15000,
        "description": "A neighbourhood bakery selling sourdough and pastries",
        "steps": "Found a location, spoke to two suppliers, drafted a menu",
        "wildCard": "Most foot traffic is office workers before 9am"
    }))
    .unwrap();

    let mut group = c.benchmark_group("prompt");
    group.bench_function(BenchmarkId::new("validate", "plan"), |b| {
        b.iter(|| validate_with_wildcard(&body).unwrap())
    });

    let (inputs, wildcard) = validate_with_wildcard(&body).unwrap();
    group.bench_function(BenchmarkId::new("build", "clarifying"), |b| {
        b.iter(|| prompt::clarifying_request(&inputs))
    });
    group.bench_function(BenchmarkId::new("build", "plan"), |b| {
        b.iter(|| prompt::plan_request(&inputs, &wildcard))
    });

    group.finish();
}

criterion_group!(benches, bench_prompt);
criterion_main!(benches);
