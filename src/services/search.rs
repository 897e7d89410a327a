// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::StoreError;
use crate::models::listing::{CategorySummary, Listing, MatchedListing};
use crate::models::plan::{FilterClause, RankField, RankKey};
use crate::models::search::IndexedListing;
use crate::services::store::ListingStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meilisearch_sdk::client::Client;
use meilisearch_sdk::settings::PaginationSetting;

/// Meilisearch-backed listing store.
///
/// Category names are denormalised into each document at index time, so
/// fetches need no join. Text relevance comes from the index ranking rules,
/// which run before the `sort` rule; a relevance rank entry is therefore
/// implied by the text query and never sent as a sort criterion.
///
/// Meilisearch stops counting and paging at the index's `maxTotalHits`.
/// `init_index` raises it to `max_total_hits`; totals beyond that are
/// reported as the cap.
pub struct MeilisearchListingStore {
    client: Client,
    index_name: String,
    max_total_hits: usize,
}

/// Default for the index's `maxTotalHits` (Meilisearch itself ships 1000).
pub const DEFAULT_MAX_TOTAL_HITS: usize = 100_000;

impl MeilisearchListingStore {
    pub fn new(host: &str, api_key: Option<String>, index_name: String) -> Result<Self, StoreError> {
        // Construct the full URL if only host:port is provided
        let url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        let client = Client::new(&url, api_key)?;
        tracing::info!(url = %url, index = %index_name, "Meilisearch client configured");

        Ok(Self {
            client,
            index_name,
            max_total_hits: DEFAULT_MAX_TOTAL_HITS,
        })
    }

    pub fn with_max_total_hits(self, max_total_hits: usize) -> Self {
        Self {
            max_total_hits: max_total_hits.max(1),
            ..self
        }
    }

    pub fn max_total_hits(&self) -> usize {
        self.max_total_hits
    }

    fn pagination_setting(&self) -> PaginationSetting {
        PaginationSetting {
            max_total_hits: self.max_total_hits,
        }
    }

    /// Apply searchable, filterable and sortable attributes to the index.
    pub async fn init_index(&self) -> Result<(), StoreError> {
        let index = self.client.index(&self.index_name);

        index
            .set_searchable_attributes(["title", "description", "category_name"])
            .await?;
        index
            .set_filterable_attributes([
                "status",
                "expires_at",
                "category_id",
                "city",
                "_geo",
                "price_amount",
                "condition",
            ])
            .await?;
        index
            .set_sortable_attributes(["price_amount", "promotion_tier", "created_at", "_geo"])
            .await?;
        index.set_pagination(self.pagination_setting()).await?;

        tracing::info!(
            index = %self.index_name,
            max_total_hits = self.max_total_hits,
            "Initialized Meilisearch index"
        );
        Ok(())
    }

    /// Index listings in one batch, denormalising each listing's category.
    pub async fn index_listings(
        &self,
        listings: &[(Listing, Option<CategorySummary>)],
    ) -> Result<(), StoreError> {
        if listings.is_empty() {
            return Ok(());
        }

        let docs: Vec<IndexedListing> = listings
            .iter()
            .map(|(listing, category)| IndexedListing::from_listing(listing, category.as_ref()))
            .collect();

        self.client
            .index(&self.index_name)
            .add_documents(&docs, Some("id"))
            .await?;

        tracing::info!(count = docs.len(), "Indexed listings");
        Ok(())
    }

}

/// Quote a string for a Meilisearch filter expression.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// The text query carried by the clauses, if any.
pub fn text_query(clauses: &[FilterClause]) -> Option<&str> {
    clauses.iter().find_map(|c| match c {
        FilterClause::TextMatch(text) => Some(text.as_str()),
        _ => None,
    })
}

/// Compile non-text clauses into a single AND-ed Meilisearch filter.
pub fn filter_expression(clauses: &[FilterClause], now: DateTime<Utc>) -> String {
    let parts: Vec<String> = clauses
        .iter()
        .filter_map(|clause| match clause {
            FilterClause::StatusActive => Some(format!(
                "status = \"active\" AND (expires_at NOT EXISTS OR expires_at > {})",
                now.timestamp()
            )),
            FilterClause::TextMatch(_) => None,
            FilterClause::CategoryEquals(id) => Some(format!("category_id = {}", quote(id))),
            // Requires the containsFilter experimental feature on the server
            FilterClause::CityMatches(city) => Some(format!("city CONTAINS {}", quote(city))),
            FilterClause::GeoWithin {
                center,
                radius_meters,
            } => Some(format!(
                "_geoRadius({}, {}, {})",
                center.lat, center.lng, radius_meters
            )),
            FilterClause::PriceRange { min, max } => {
                let bounds: Vec<String> = [
                    min.map(|m| format!("price_amount >= {m}")),
                    max.map(|m| format!("price_amount <= {m}")),
                ]
                .into_iter()
                .flatten()
                .collect();
                (!bounds.is_empty()).then(|| bounds.join(" AND "))
            }
            FilterClause::ConditionIn(set) => {
                let values: Vec<String> = set.iter().map(|c| quote(c.as_str())).collect();
                Some(format!("condition IN [{}]", values.join(", ")))
            }
        })
        .map(|part| format!("({part})"))
        .collect();
    parts.join(" AND ")
}

/// Translate the rank key into Meilisearch sort criteria. A geo clause adds
/// nearest-first as the final tie-break.
pub fn sort_criteria(rank: &RankKey, clauses: &[FilterClause]) -> Vec<String> {
    let mut criteria: Vec<String> = rank
        .entries()
        .iter()
        .filter_map(|entry| {
            let attribute = match entry.field {
                RankField::RelevanceScore => return None,
                RankField::PriceAmount => "price_amount",
                RankField::PromotionTier => "promotion_tier",
                RankField::CreatedAt => "created_at",
            };
            Some(format!("{attribute}:{}", entry.direction.as_str()))
        })
        .collect();

    if let Some(center) = clauses.iter().find_map(|c| match c {
        FilterClause::GeoWithin { center, .. } => Some(center),
        _ => None,
    }) {
        criteria.push(format!("_geoPoint({}, {}):asc", center.lat, center.lng));
    }
    criteria
}

#[async_trait]
impl ListingStore for MeilisearchListingStore {
    async fn fetch(
        &self,
        clauses: &[FilterClause],
        rank: &RankKey,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<MatchedListing>, StoreError> {
        let index = self.client.index(&self.index_name);
        let filter = filter_expression(clauses, Utc::now());
        let sort = sort_criteria(rank, clauses);
        let sort_refs: Vec<&str> = sort.iter().map(String::as_str).collect();
        let offset = usize::try_from(skip).map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut search = index.search();
        search
            .with_offset(offset)
            .with_limit(limit as usize)
            .with_show_ranking_score(true);
        if let Some(text) = text_query(clauses) {
            search.with_query(text);
        }
        if !filter.is_empty() {
            search.with_filter(&filter);
        }
        if !sort_refs.is_empty() {
            search.with_sort(&sort_refs);
        }

        let results = search.execute::<IndexedListing>().await?;

        Ok(results
            .hits
            .into_iter()
            .map(|hit| {
                let (listing, category) = hit.result.into_parts();
                MatchedListing {
                    listing,
                    category,
                    relevance_score: hit.ranking_score,
                }
            })
            .collect())
    }

    async fn count(&self, clauses: &[FilterClause]) -> Result<u64, StoreError> {
        let index = self.client.index(&self.index_name);
        let filter = filter_expression(clauses, Utc::now());

        // Page-based search with zero hits per page returns an exact total
        let mut search = index.search();
        search.with_page(1).with_hits_per_page(0);
        if let Some(text) = text_query(clauses) {
            search.with_query(text);
        }
        if !filter.is_empty() {
            search.with_filter(&filter);
        }

        let results = search.execute::<IndexedListing>().await?;
        let total = results
            .total_hits
            .or(results.estimated_total_hits)
            .unwrap_or(0);
        if total >= self.max_total_hits {
            tracing::warn!(
                total,
                max_total_hits = self.max_total_hits,
                "Listing count reached the index maxTotalHits cap"
            );
        }
        Ok(total as u64)
    }

    fn backend_name(&self) -> &'static str {
        "meilisearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::{Condition, GeoPoint};
    use crate::models::query::SortOrder;
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_status_only_filter() {
        assert_eq!(
            filter_expression(&[FilterClause::StatusActive], now()),
            "(status = \"active\" AND (expires_at NOT EXISTS OR expires_at > 1700000000))"
        );
    }

    #[test]
    fn test_full_filter_expression() {
        let clauses = vec![
            FilterClause::TextMatch("road bike".to_string()),
            FilterClause::CategoryEquals("cat-1".to_string()),
            FilterClause::CityMatches("San \"Fran\"".to_string()),
            FilterClause::GeoWithin {
                center: GeoPoint {
                    lat: 37.5,
                    lng: -122.25,
                },
                radius_meters: 2500.0,
            },
            FilterClause::PriceRange {
                min: Some(10.0),
                max: None,
            },
            FilterClause::ConditionIn(BTreeSet::from([Condition::New, Condition::LikeNew])),
        ];

        assert_eq!(
            filter_expression(&clauses, now()),
            "(category_id = \"cat-1\") AND (city CONTAINS \"San \\\"Fran\\\"\") \
             AND (_geoRadius(37.5, -122.25, 2500)) AND (price_amount >= 10) \
             AND (condition IN [\"new\", \"like-new\"])"
        );
        assert_eq!(text_query(&clauses), Some("road bike"));
    }

    #[test]
    fn test_inverted_price_range_is_still_emitted() {
        let clauses = [FilterClause::PriceRange {
            min: Some(100.0),
            max: Some(50.0),
        }];
        assert_eq!(
            filter_expression(&clauses, now()),
            "(price_amount >= 100 AND price_amount <= 50)"
        );
    }

    #[test]
    fn test_sort_criteria_drops_relevance_and_appends_geo() {
        let rank = RankKey::new()
            .then(RankField::RelevanceScore, SortOrder::Desc)
            .then(RankField::PriceAmount, SortOrder::Asc);
        let clauses = [FilterClause::GeoWithin {
            center: GeoPoint { lat: 1.5, lng: 2.5 },
            radius_meters: 1000.0,
        }];
        assert_eq!(
            sort_criteria(&rank, &clauses),
            vec!["price_amount:asc", "_geoPoint(1.5, 2.5):asc"]
        );
    }

    #[test]
    fn test_sort_criteria_promotion_tier() {
        let rank = RankKey::new().then(RankField::PromotionTier, SortOrder::Desc);
        assert_eq!(sort_criteria(&rank, &[]), vec!["promotion_tier:desc"]);
    }

    #[test]
    fn test_pagination_setting_raises_default_cap() {
        let store = MeilisearchListingStore::new("127.0.0.1:7700", None, "listings".to_string())
            .unwrap();
        assert_eq!(store.max_total_hits(), DEFAULT_MAX_TOTAL_HITS);
        assert!(store.pagination_setting().max_total_hits > 1000);

        let store = store.with_max_total_hits(250_000);
        assert_eq!(store.pagination_setting().max_total_hits, 250_000);
        assert_eq!(store.with_max_total_hits(0).max_total_hits(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires Meilisearch running
    async fn test_store_creation_and_init() {
        let store =
            MeilisearchListingStore::new("127.0.0.1:7700", None, "listings_test".to_string())
                .expect("Failed to create client");
        store.init_index().await.expect("Failed to init index");
        let total = store
            .count(&[FilterClause::StatusActive])
            .await
            .expect("count failed");
        assert!(total < u64::MAX);
    }
}
