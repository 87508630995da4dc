use anyhow::{bail, Context, Result};
use catalog::{Catalog, ImageRecord, Orientation};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::seq::IndexedRandom;
use search::{FilterForm, FilterSpec, SortMode};
use session::{GalleryConfig, GallerySession};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// Gallery - themed image search
#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Search, filter and page through a themed image catalog", long_about = None)]
struct Cli {
    /// Directory holding themes.json and/or <theme>.json files
    /// [default: $GALLERY_DATA_DIR or data/themes]
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Images per page [default: $GALLERY_PAGE_SIZE or 24]
    #[arg(long)]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Free-text query (case-insensitive substring of text, tags or category)
        query: Option<String>,

        /// Restrict to a category; repeat to select several
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Require one of these tags; repeat to select several
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// landscape, portrait or square
        #[arg(long, default_value = "")]
        orientation: String,

        /// relevance, newest, popular or random
        #[arg(long, default_value = "relevance")]
        sort: String,

        /// Only images flagged new
        #[arg(long)]
        new_only: bool,

        /// How many pages to show (pages are cumulative)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Fix the shuffle nonce so random order is reproducible
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every tag in the catalog
    Tags,

    /// List categories with their image counts
    Categories,

    /// Show catalog statistics
    Stats,

    /// Time evaluations over randomly generated filters
    Benchmark {
        /// Number of sessions to run
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of sessions running at once
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = GalleryConfig::from_env();
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    if let Some(page_size) = cli.page_size {
        config = config.with_page_size(page_size);
    }

    println!("Loading themes from {}...", config.data_dir.display());
    let start = Instant::now();
    let catalog = Arc::new(
        Catalog::load_from_dir(&config.data_dir).context("Failed to load theme catalog")?,
    );
    let (themes, images) = catalog.counts();
    println!(
        "{} Loaded {} images in {} themes in {:?}",
        "✓".green(),
        images,
        themes,
        start.elapsed()
    );

    match cli.command {
        Commands::Search {
            query,
            categories,
            tags,
            orientation,
            sort,
            new_only,
            page,
            seed,
            json,
        } => {
            let form = FilterForm {
                query: query.unwrap_or_default(),
                categories,
                tags,
                orientation,
                sort_by: sort,
                is_new: new_only,
            };
            handle_search(catalog, &config, form, page, seed, json)?
        }
        Commands::Tags => handle_tags(&catalog),
        Commands::Categories => handle_categories(&catalog),
        Commands::Stats => handle_stats(&catalog),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(catalog, config, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'search' command
fn handle_search(
    catalog: Arc<Catalog>,
    config: &GalleryConfig,
    form: FilterForm,
    pages: usize,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let filter = FilterSpec::try_from(form).context("Invalid search options")?;

    let mut session = match seed {
        Some(nonce) => GallerySession::with_nonce(catalog, config, nonce),
        None => GallerySession::new(catalog, config),
    };
    session.apply_filter(filter);

    // Page through the way a scrolling grid would
    while session.page() < pages && session.load_more().is_some() {}

    let result = session.result();
    if json {
        let images: Vec<&ImageRecord> = result.images.iter().map(|i| i.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&images)?);
        return Ok(());
    }

    print_filter(session.filter());
    println!(
        "{}",
        format!(
            "Showing {} of {} images (page {}):",
            result.len(),
            result.total_count,
            result.page
        )
        .bold()
        .blue()
    );
    for (rank, image) in result.images.iter().enumerate() {
        print_image(rank + 1, image);
    }
    if result.has_more {
        println!(
            "{}",
            format!("... {} more, use --page {}", result.total_count - result.len(), result.page + 1)
                .dimmed()
        );
    }
    Ok(())
}

/// Handle the 'tags' command
fn handle_tags(catalog: &Catalog) {
    let tags = catalog.available_tags();
    println!("{}", format!("{} tags:", tags.len()).bold().blue());
    for tag in tags {
        let count = catalog.images().iter().filter(|i| i.has_tag(tag)).count();
        println!("{}{} ({})", "• ".green(), tag, count);
    }
}

/// Handle the 'categories' command
fn handle_categories(catalog: &Catalog) {
    let categories = catalog.categories();
    println!("{}", format!("{} categories:", categories.len()).bold().blue());
    for category in categories {
        println!(
            "{}{} ({} images)",
            "• ".green(),
            category,
            catalog.theme_images(category).len()
        );
    }
}

/// Handle the 'stats' command
fn handle_stats(catalog: &Catalog) {
    let images = catalog.images();
    let (themes, total) = catalog.counts();

    println!("{}", "Catalog statistics:".bold().blue());
    println!("{}Themes: {}", "• ".green(), themes);
    println!("{}Images: {}", "• ".green(), total);
    println!("{}Tags: {}", "• ".green(), catalog.available_tags().len());

    let new = images.iter().filter(|i| i.is_new).count();
    let dated = images.iter().filter(|i| i.date_added.is_some()).count();
    let liked = images.iter().filter(|i| i.likes.is_some()).count();
    println!("{}Flagged new: {}", "• ".cyan(), new);
    println!("{}With date added: {}", "• ".cyan(), dated);
    println!("{}With likes: {}", "• ".cyan(), liked);

    println!("Orientation:");
    for orientation in Orientation::ALL {
        let count = images
            .iter()
            .filter(|i| i.orientation == Some(orientation))
            .count();
        println!("  - {}: {}", orientation, count);
    }
    let unknown = images.iter().filter(|i| i.orientation.is_none()).count();
    println!("  - unknown: {}", unknown);

    let mut popular: Vec<_> = images.iter().filter(|i| i.likes.is_some()).collect();
    popular.sort_by(|a, b| b.popularity().cmp(&a.popularity()));
    if !popular.is_empty() {
        println!("Most liked:");
        for image in popular.iter().take(5) {
            println!("  - {} [{}] ({} likes)", image.alt, image.category, image.popularity());
        }
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    catalog: Arc<Catalog>,
    config: GalleryConfig,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    let categories: Vec<String> = catalog.categories().iter().map(|c| c.to_string()).collect();
    let tags: Vec<String> = catalog
        .available_tags()
        .iter()
        .map(|t| t.to_string())
        .collect();

    let filters: Vec<FilterSpec> = (0..requests)
        .map(|_| random_filter(&categories, &tags))
        .collect();

    let limiter = Arc::new(Semaphore::new(concurrent.max(1)));
    let config = Arc::new(config);
    let wall = Instant::now();

    let mut handles = vec![];
    for filter in filters {
        let catalog = catalog.clone();
        let config = config.clone();
        let limiter = limiter.clone();
        let handle = tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            let start = Instant::now();
            let mut session = GallerySession::new(catalog, &config);
            session.apply_filter(filter);
            while session.load_more().is_some() && session.page() < 5 {}
            debug!("Benchmark session: {:?}", session.stats());
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall.elapsed();

    let busy: Duration = timings.iter().sum();
    let avg_latency = busy / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Sessions: {} ({} at once)", requests, concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} sessions/second", throughput);

    Ok(())
}

fn random_filter(categories: &[String], tags: &[String]) -> FilterSpec {
    let mut rng = rand::rng();
    let mut filter = FilterSpec::new();

    if rand::random_bool(0.3) {
        if let Some(tag) = tags.choose(&mut rng) {
            // a prefix of a real tag, as if typed halfway
            let typed: String = tag.chars().take(3).collect();
            filter = filter.with_query(typed);
        }
    }
    if rand::random_bool(0.4) {
        if let Some(category) = categories.choose(&mut rng) {
            filter = filter.with_category(category.as_str());
        }
    }
    if rand::random_bool(0.3) {
        for tag in tags.choose_multiple(&mut rng, 2) {
            filter = filter.with_tag(tag.as_str());
        }
    }
    if rand::random_bool(0.2) {
        if let Some(&orientation) = Orientation::ALL.choose(&mut rng) {
            filter = filter.with_orientation(orientation);
        }
    }
    if let Some(&mode) = SortMode::ALL.choose(&mut rng) {
        filter = filter.sorted_by(mode);
    }
    filter.with_new_only(rand::random_bool(0.1))
}

fn print_filter(filter: &FilterSpec) {
    if filter.is_unfiltered() {
        println!("{}", format!("All images, sorted by {}", filter.sort_by).dimmed());
        return;
    }

    let mut parts = vec![];
    if !filter.query.trim().is_empty() {
        parts.push(format!("query \"{}\"", filter.query));
    }
    if !filter.categories.is_empty() {
        let categories: Vec<&str> = filter.categories.iter().map(String::as_str).collect();
        parts.push(format!("categories {}", categories.join("|")));
    }
    if !filter.tags.is_empty() {
        let tags: Vec<&str> = filter.tags.iter().map(String::as_str).collect();
        parts.push(format!("tags {}", tags.join("|")));
    }
    if let Some(orientation) = filter.orientation {
        parts.push(format!("{orientation} only"));
    }
    if filter.new_only {
        parts.push("new only".to_string());
    }
    println!(
        "{}",
        format!(
            "{} active filter(s): {}; sorted by {}",
            filter.active_count(),
            parts.join(", "),
            filter.sort_by
        )
        .dimmed()
    );
}

fn print_image(rank: usize, image: &ImageRecord) {
    let mut badges = vec![];
    if image.is_new {
        badges.push("NEW".yellow().bold().to_string());
    }
    if let Some(orientation) = image.orientation {
        badges.push(orientation.to_string());
    }
    if let Some(likes) = image.likes {
        badges.push(format!("♥ {likes}"));
    }
    if let Some(date) = image.date_added {
        badges.push(date.format("%Y-%m-%d").to_string());
    }

    println!(
        "{}. {} [{}] {}",
        rank.to_string().green(),
        image.alt,
        image.category.cyan(),
        badges.join(" · ")
    );
    if !image.tags.is_empty() {
        println!("   {}", image.tags.join(", ").dimmed());
    }
    println!("   {}", image.src.dimmed());
}
