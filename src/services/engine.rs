// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Listing discovery pipeline:
//! normalize → resolve category → compile filters → select rank key →
//! paginate (fetch + count concurrently) → project cards.

use crate::error::SearchError;
use crate::models::listing::ListingCard;
use crate::models::plan::{FilterClause, SearchWarning};
use crate::models::query::{ListingsParams, SearchQuery};
use crate::models::response::PageResult;
use crate::models::settings::{CategoryResolutionPolicy, SearchSettings};
use crate::services::category::CategoryResolver;
use crate::services::filter_compiler::compile;
use crate::services::logging::summarize_text;
use crate::services::normalizer::normalize;
use crate::services::pagination::Paginator;
use crate::services::projector::project;
use crate::services::ranking::{distance_sort_warning, select_rank_key};
use crate::services::store::ListingStore;
use std::sync::Arc;
use std::time::Instant;

/// Result of one search: the projected page plus any degradations applied.
#[derive(Debug)]
pub struct SearchOutcome {
    pub page: PageResult<ListingCard>,
    pub warnings: Vec<SearchWarning>,
}

/// Stateless search engine; holds only handles to its collaborators.
#[derive(Clone)]
pub struct ListingSearchEngine {
    store: Arc<dyn ListingStore>,
    resolver: Arc<dyn CategoryResolver>,
    settings: SearchSettings,
}

/// Outcome of category resolution under the configured policy.
enum CategoryFilter {
    None,
    Id(String),
    Dropped(SearchWarning),
    MatchNothing,
}

impl ListingSearchEngine {
    pub fn new(
        store: Arc<dyn ListingStore>,
        resolver: Arc<dyn CategoryResolver>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            store,
            resolver,
            settings,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Validate raw parameters and run the search.
    pub async fn search(&self, params: &ListingsParams) -> Result<SearchOutcome, SearchError> {
        let query = normalize(params, &self.settings)?;
        self.search_query(&query).await
    }

    /// Run an already-validated query.
    pub async fn search_query(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        let started = Instant::now();
        let mut warnings = Vec::new();

        let category_id = match self.resolve_category(query).await? {
            CategoryFilter::None => None,
            CategoryFilter::Id(id) => Some(id),
            CategoryFilter::Dropped(warning) => {
                warnings.push(warning);
                None
            }
            CategoryFilter::MatchNothing => {
                return Ok(SearchOutcome {
                    page: PageResult::empty(query.page, query.limit),
                    warnings,
                });
            }
        };

        let clauses = compile(query, category_id.as_deref());
        let rank = select_rank_key(query);
        warnings.extend(distance_sort_warning(query));

        tracing::debug!(
            clauses = ?clauses.iter().map(FilterClause::kind).collect::<Vec<_>>(),
            rank = %rank,
            "Compiled listing query"
        );

        let page = Paginator::new(self.store.as_ref(), self.settings.query_timeout)
            .paginate(&clauses, &rank, query.page, query.limit)
            .await?;

        tracing::info!(
            text = %query.text.as_deref().map(summarize_text).unwrap_or_default(),
            page = query.page,
            limit = query.limit,
            returned = page.items.len(),
            total = page.pagination.total,
            warnings = warnings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Listing search completed"
        );

        Ok(SearchOutcome {
            page: page.map(project),
            warnings,
        })
    }

    async fn resolve_category(&self, query: &SearchQuery) -> Result<CategoryFilter, SearchError> {
        let Some(slug) = query.category_slug.as_deref() else {
            return Ok(CategoryFilter::None);
        };

        if let Some(id) = self.resolver.resolve(slug).await? {
            return Ok(CategoryFilter::Id(id));
        }

        tracing::info!(slug = %slug, policy = %self.settings.category_policy, "Unknown category slug");
        Ok(match self.settings.category_policy {
            CategoryResolutionPolicy::DropFilterOnMiss => {
                CategoryFilter::Dropped(SearchWarning::category_not_found(slug))
            }
            CategoryResolutionPolicy::EmptyResultOnMiss => CategoryFilter::MatchNothing,
        })
    }
}
