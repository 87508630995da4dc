//! Benchmarks for pipeline evaluation
//!
//! Run with: cargo bench --package search
//!
//! Uses a synthetic catalog sized like the real gallery (a few hundred
//! images spread over a dozen themes).

use catalog::{Catalog, ImageRecord, Orientation};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use search::{FilterSpec, SearchEngine, SortMode};

const THEMES: [&str; 12] = [
    "abstract", "animals", "architecture", "food", "minimal", "nature", "night", "ocean",
    "space", "sports", "technology", "urban",
];
const KEYWORDS: [&str; 8] = [
    "sunset", "forest", "city", "light", "water", "texture", "portrait", "travel",
];

fn build_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for (t, theme) in THEMES.iter().enumerate() {
        let images = (0..50)
            .map(|i| {
                let keyword = KEYWORDS[(t + i) % KEYWORDS.len()];
                ImageRecord::new(
                    format!("{theme}_{i}"),
                    format!("https://img.test/{theme}/{i}.jpg"),
                    format!("{keyword} - professional photography"),
                )
                .with_tags([*theme, keyword, KEYWORDS[(i * 3) % KEYWORDS.len()]])
                .with_orientation(Orientation::ALL[i % 3])
                .with_likes(((t * 50 + i) * 37 % 1000) as u32)
                .with_new(i % 7 == 0)
            })
            .collect();
        catalog.insert_theme(*theme, images);
    }
    catalog
}

fn bench_unfiltered(c: &mut Criterion) {
    let catalog = build_catalog();
    let engine = SearchEngine::new();
    let spec = FilterSpec::default();

    c.bench_function("evaluate_unfiltered", |b| {
        b.iter(|| engine.evaluate(black_box(catalog.images()), black_box(&spec), 1, 24))
    });
}

fn bench_query_popular(c: &mut Criterion) {
    let catalog = build_catalog();
    let engine = SearchEngine::new();
    let spec = FilterSpec::new()
        .with_query("sun")
        .sorted_by(SortMode::Popular);

    c.bench_function("evaluate_query_popular", |b| {
        b.iter(|| engine.evaluate(black_box(catalog.images()), black_box(&spec), 3, 24))
    });
}

fn bench_random_all_criteria(c: &mut Criterion) {
    let catalog = build_catalog();
    let engine = SearchEngine::new().with_nonce(0x5eed);
    let spec = FilterSpec::new()
        .with_category("nature")
        .with_category("ocean")
        .with_tag("water")
        .with_tag("sunset")
        .with_orientation(Orientation::Landscape)
        .sorted_by(SortMode::Random);

    c.bench_function("evaluate_random_all_criteria", |b| {
        b.iter(|| engine.evaluate(black_box(catalog.images()), black_box(&spec), 1, 24))
    });
}

criterion_group!(
    benches,
    bench_unfiltered,
    bench_query_popular,
    bench_random_all_criteria
);
criterion_main!(benches);
