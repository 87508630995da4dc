//! Test harness for the gallery service.
//!
//! Loads the catalog named by `GALLERY_DATA_DIR`, then replays a short
//! browsing session: typing a query, scrolling to the bottom, switching the
//! sort order.

use std::time::Duration;

use anyhow::Result;
use search::{FilterSpec, SortMode};
use tracing::info;

use session::{GalleryConfig, GallerySession, GalleryService, GallerySnapshot, ScrollPosition};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,session=debug,search=debug")
        .init();

    let config = GalleryConfig::from_env();
    info!("Starting gallery harness with {:?}", config);

    let session = GallerySession::open(&config)?;
    let catalog = session.catalog().clone();
    let handle = GalleryService::spawn(session, config.debounce);
    let mut results = handle.subscribe();

    info!("Typing a query...");
    for prefix in ["s", "su", "sun", "suns", "sunse", "sunset"] {
        handle.set_query(prefix).await?;
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    results.changed().await?;
    report(&results.borrow_and_update());

    info!("Scrolling to the bottom...");
    handle.scroll(ScrollPosition::new(1900.0, 800.0, 2700.0)).await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    report(&results.borrow_and_update());

    if let Some(&category) = catalog.categories().first() {
        info!("Browsing {category} by popularity...");
        handle
            .set_filter(FilterSpec::new().with_category(category).sorted_by(SortMode::Popular))
            .await?;
        results.changed().await?;
        report(&results.borrow_and_update());
    }

    let stats = handle.shutdown().await?;
    info!("Harness finished: {:?}", stats);

    Ok(())
}

fn report(snapshot: &GallerySnapshot) {
    let result = &snapshot.result;
    info!(
        "Generation {}: showing {} of {} (page {}, more: {})",
        snapshot.generation,
        result.len(),
        result.total_count,
        result.page,
        result.has_more
    );
    for (i, image) in result.images.iter().enumerate() {
        info!(
            "{}. [{}] {} ({} likes)",
            i + 1,
            image.category,
            image.alt,
            image.popularity()
        );
    }
}
