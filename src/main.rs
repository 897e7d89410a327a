// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::Parser;
use listing_search::app::{create_router, AppState, VERSION};
use listing_search::models::listing::{CategorySummary, Listing};
use listing_search::models::settings::{
    CategoryResolutionPolicy, DistanceSortPolicy, SearchSettings, StoreBackend,
};
use listing_search::services::category::{
    CategoryResolver, InMemoryCategoryResolver, PgCategoryResolver,
};
use listing_search::services::engine::ListingSearchEngine;
use listing_search::services::memory_store::{InMemoryListingStore, SeedData};
use listing_search::services::search::{MeilisearchListingStore, DEFAULT_MAX_TOTAL_HITS};
use listing_search::services::store::ListingStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "listing-search", about = "Classifieds listing discovery service")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Document store backing the search engine: memory or meilisearch
    #[arg(long, env = "STORE_BACKEND", default_value = "memory", value_parser = StoreBackend::parse)]
    store_backend: StoreBackend,

    #[arg(long, env = "MEILISEARCH_HOST", default_value = "127.0.0.1:7700")]
    meilisearch_host: String,

    #[arg(long, env = "MEILISEARCH_KEY")]
    meilisearch_key: Option<String>,

    #[arg(long, env = "MEILISEARCH_INDEX", default_value = "listings")]
    meilisearch_index: String,

    /// Upper bound on hits Meilisearch will count and page through
    #[arg(long, env = "MEILISEARCH_MAX_TOTAL_HITS", default_value_t = DEFAULT_MAX_TOTAL_HITS)]
    meilisearch_max_total_hits: usize,

    /// Postgres URL of the catalogue database, used to resolve category slugs
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// JSON file with `categories` and `listings`, loaded into the memory backend
    #[arg(long, env = "SEED_FILE")]
    seed_file: Option<PathBuf>,

    /// Budget for the concurrent page fetch + total count
    #[arg(long, env = "QUERY_TIMEOUT_MS", default_value_t = 5_000)]
    query_timeout_ms: u64,

    #[arg(long, env = "MAX_RADIUS_KM", default_value_t = 500.0)]
    max_radius_km: f64,

    /// drop-filter or empty-result
    #[arg(long, env = "CATEGORY_MISS_POLICY", default_value = "drop-filter", value_parser = CategoryResolutionPolicy::parse)]
    category_miss_policy: CategoryResolutionPolicy,

    /// noop or reject
    #[arg(long, env = "DISTANCE_SORT_POLICY", default_value = "noop", value_parser = DistanceSortPolicy::parse)]
    distance_sort_policy: DistanceSortPolicy,
}

impl Args {
    fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            query_timeout: Duration::from_millis(self.query_timeout_ms),
            max_radius_km: self.max_radius_km,
            category_policy: self.category_miss_policy,
            distance_policy: self.distance_sort_policy,
            ..SearchSettings::default()
        }
    }
}

async fn load_seed(path: Option<&PathBuf>) -> Result<SeedData> {
    match path {
        Some(path) => {
            let seed = SeedData::load(path)
                .await
                .with_context(|| format!("Failed to load seed file {}", path.display()))?;
            tracing::info!(
                listings = seed.listings.len(),
                categories = seed.categories.len(),
                "Loaded seed data"
            );
            Ok(seed)
        }
        None => Ok(SeedData::default()),
    }
}

/// Pair each seed listing with its category for denormalised indexing.
fn seed_documents(seed: &SeedData) -> Vec<(Listing, Option<CategorySummary>)> {
    seed.listings
        .iter()
        .map(|listing| {
            let category = listing
                .category_id
                .as_deref()
                .and_then(|id| seed.categories.iter().find(|c| c.id == id))
                .map(CategorySummary::from);
            (listing.clone(), category)
        })
        .collect()
}

/// Build the store and the category resolver for the configured backend.
/// Returns `None` when the backend is unreachable so the service can still
/// answer health checks.
async fn build_engine(args: &Args) -> Result<Option<ListingSearchEngine>> {
    let seed = load_seed(args.seed_file.as_ref()).await?;

    let resolver: Arc<dyn CategoryResolver> = match &args.database_url {
        Some(url) => Arc::new(
            PgCategoryResolver::connect(url)
                .await
                .context("Failed to connect to category database")?,
        ),
        None => Arc::new(InMemoryCategoryResolver::from_categories(&seed.categories)),
    };

    let store: Arc<dyn ListingStore> = match args.store_backend {
        StoreBackend::Memory => Arc::new(InMemoryListingStore::from_seed(seed)),
        StoreBackend::Meilisearch => {
            let store = match MeilisearchListingStore::new(
                &args.meilisearch_host,
                args.meilisearch_key.clone(),
                args.meilisearch_index.clone(),
            ) {
                Ok(store) => store.with_max_total_hits(args.meilisearch_max_total_hits),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to configure Meilisearch; search disabled");
                    return Ok(None);
                }
            };
            if let Err(e) = store.init_index().await {
                tracing::warn!(error = %e, "Failed to initialize Meilisearch index");
            } else if let Err(e) = store.index_listings(&seed_documents(&seed)).await {
                tracing::warn!(error = %e, "Failed to index seed listings");
            }
            Arc::new(store)
        }
    };

    Ok(Some(ListingSearchEngine::new(
        store,
        resolver,
        args.search_settings(),
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("listing_search=info")),
        )
        .init();

    let args = Args::parse();
    let engine = build_engine(&args).await?;

    let app = create_router(AppState { engine });

    // Bind to 0.0.0.0 to accept connections from any network interface (required for Docker)
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        version = VERSION,
        %addr,
        store = %args.store_backend,
        "listing-search listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
