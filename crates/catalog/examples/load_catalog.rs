use catalog::Catalog;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/themes"));

    println!("Loading theme catalog from {}...\n", data_dir.display());

    let start = Instant::now();
    let catalog = Catalog::load_from_dir(&data_dir).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let (themes, images) = catalog.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Themes: {}", themes);
    println!("Images: {}", images);
    println!("Distinct tags: {}", catalog.available_tags().len());
    for theme in catalog.categories() {
        println!("  {:<16} {}", theme, catalog.theme_images(theme).len());
    }
}
