use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use scout_terminal::demo_backend::DemoBackend;
use scout_terminal::recommend_fetch::parse_recommend_json;
use scout_terminal::render::ResultRenderer;
use scout_terminal::state::{RecommendationRequest, RecommendationResponse, SuccessResponse};

fn sample_body(top_k: u32) -> String {
    let backend = DemoBackend::new();
    let mut rng = StdRng::seed_from_u64(42);
    let request = RecommendationRequest {
        club_name: "Arsenal".to_string(),
        subrole: "WINGER".to_string(),
        top_k,
    };
    backend.recommend_json(&request, &mut rng)
}

fn sample_response(top_k: u32) -> SuccessResponse {
    match parse_recommend_json(&sample_body(top_k)).unwrap() {
        RecommendationResponse::Success(ok) => ok,
        RecommendationResponse::Error(err) => panic!("demo backend error: {}", err.message),
    }
}

fn bench_recommend_parse(c: &mut Criterion) {
    let body = sample_body(20);
    c.bench_function("recommend_parse", |b| {
        b.iter(|| {
            let response = parse_recommend_json(black_box(&body)).unwrap();
            black_box(response);
        })
    });
}

fn bench_table_render(c: &mut Criterion) {
    let response = sample_response(20);
    let mut renderer = ResultRenderer::new();
    c.bench_function("table_render", |b| {
        b.iter(|| {
            renderer.render(black_box(&response));
            black_box(renderer.table().rows.len());
        })
    });
}

criterion_group!(benches, bench_recommend_parse, bench_table_render);
criterion_main!(benches);
