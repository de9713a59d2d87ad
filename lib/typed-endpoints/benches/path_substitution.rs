use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use typed_endpoints::{
    ParamLookup, PathParams, QueryValue, SearchParams, substitute, substitute_with,
};

fn benchmark_substitution(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_substitution");

    let params = PathParams::new()
        .with("id", 12)
        .with("idofcomment", 42)
        .with("version", "v1")
        .with("query", "hello world & special chars @#$%");

    let templates = [
        "/user/:id",
        "/user/:id/comment/:idofcomment",
        "/api/:version/user/:id/comment/:idofcomment/:version",
        "/search/:query",
        "/user/:missing/comment/:id",
        "/breeds/list/all",
    ];

    for (i, template) in templates.iter().enumerate() {
        group.bench_function(format!("present_{i}"), |b| {
            b.iter(|| {
                let result = substitute(black_box(template), black_box(&params));
                black_box(result);
            })
        });

        group.bench_function(format!("truthy_{i}"), |b| {
            b.iter(|| {
                let result =
                    substitute_with(black_box(template), black_box(&params), ParamLookup::Truthy);
                black_box(result);
            })
        });
    }

    group.finish();
}

fn benchmark_sanitization(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_sanitization");

    let params = SearchParams::from_iter([
        ("q", QueryValue::from("hound")),
        ("page", QueryValue::Null),
        ("limit", QueryValue::from(20)),
        ("draft", QueryValue::from(false)),
        ("cursor", QueryValue::from("")),
        ("offset", QueryValue::from(0)),
    ]);

    group.bench_function("sanitize", |b| {
        b.iter(|| {
            let result = black_box(params.clone()).sanitize();
            black_box(result);
        })
    });

    group.bench_function("sanitize_and_encode", |b| {
        b.iter(|| {
            let result = black_box(params.clone()).sanitize().to_query_string();
            black_box(result);
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_substitution, benchmark_sanitization);
criterion_main!(benches);
