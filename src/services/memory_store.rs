// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Process-local listing store.
//!
//! Evaluates filter clauses directly against the documents. Store-default
//! order is insertion order, or nearest-first when a geo clause is present.
//! Text relevance is a weighted term count (title hits count double).

use crate::error::StoreError;
use crate::models::listing::{Category, CategorySummary, Listing, MatchedListing};
use crate::models::plan::{FilterClause, RankField, RankKey};
use crate::models::query::SortOrder;
use crate::services::store::ListingStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Contents of a seed file for the memory backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

impl SeedData {
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::Backend(format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&raw).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryListingStore {
    listings: RwLock<Vec<Listing>>,
    categories: HashMap<String, Category>,
}

/// A listing that passed every clause, with what ranking needs to know about it.
struct Candidate<'a> {
    listing: &'a Listing,
    score: Option<f64>,
    distance: Option<f64>,
}

impl InMemoryListingStore {
    pub fn new(listings: Vec<Listing>, categories: Vec<Category>) -> Self {
        Self {
            listings: RwLock::new(listings),
            categories: categories.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self::new(seed.listings, seed.categories)
    }

    /// Insert or replace a listing by id.
    pub fn insert(&self, listing: Listing) {
        let mut listings = self.listings.write().unwrap_or_else(|e| e.into_inner());
        match listings.iter_mut().find(|l| l.id == listing.id) {
            Some(existing) => *existing = listing,
            None => listings.push(listing),
        }
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut listings = self.listings.write().unwrap_or_else(|e| e.into_inner());
        let before = listings.len();
        listings.retain(|l| l.id != id);
        listings.len() != before
    }

    pub fn len(&self) -> usize {
        self.listings.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn category_summary(&self, listing: &Listing) -> Option<CategorySummary> {
        listing
            .category_id
            .as_ref()
            .and_then(|id| self.categories.get(id))
            .map(CategorySummary::from)
    }

    /// Run the clauses against every listing, in store-default order.
    fn candidates<'a>(
        listings: &'a [Listing],
        clauses: &[FilterClause],
        now: DateTime<Utc>,
    ) -> Vec<Candidate<'a>> {
        let mut matched: Vec<Candidate<'a>> = listings
            .iter()
            .filter_map(|listing| evaluate(listing, clauses, now))
            .collect();

        let has_geo = clauses
            .iter()
            .any(|c| matches!(c, FilterClause::GeoWithin { .. }));
        if has_geo {
            matched.sort_by(|a, b| {
                let (da, db) = (a.distance.unwrap_or(f64::MAX), b.distance.unwrap_or(f64::MAX));
                da.total_cmp(&db)
            });
        }
        matched
    }
}

fn evaluate<'a>(
    listing: &'a Listing,
    clauses: &[FilterClause],
    now: DateTime<Utc>,
) -> Option<Candidate<'a>> {
    let mut candidate = Candidate {
        listing,
        score: None,
        distance: None,
    };

    for clause in clauses {
        let passed = match clause {
            FilterClause::StatusActive => listing.is_live_at(now),
            FilterClause::TextMatch(text) => {
                let score = text_score(listing, text);
                candidate.score = Some(score);
                score > 0.0
            }
            FilterClause::CategoryEquals(id) => listing.category_id.as_deref() == Some(id.as_str()),
            FilterClause::CityMatches(city) => listing
                .location
                .city
                .to_lowercase()
                .contains(&city.to_lowercase()),
            FilterClause::GeoWithin {
                center,
                radius_meters,
            } => match listing.location.coordinates {
                Some(point) => {
                    let d = center.distance_meters(&point);
                    candidate.distance = Some(d);
                    d <= *radius_meters
                }
                None => false,
            },
            FilterClause::PriceRange { min, max } => {
                let amount = listing.price.amount;
                min.map_or(true, |m| amount >= m) && max.map_or(true, |m| amount <= m)
            }
            FilterClause::ConditionIn(set) => set.contains(&listing.condition),
        };
        if !passed {
            return None;
        }
    }
    Some(candidate)
}

fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Title term hits count twice, description hits once.
fn text_score(listing: &Listing, text: &str) -> f64 {
    let title = terms(&listing.title);
    let description = terms(&listing.description);
    terms(text)
        .iter()
        .map(|term| {
            let in_title = title.iter().filter(|t| *t == term).count();
            let in_description = description.iter().filter(|t| *t == term).count();
            (2 * in_title + in_description) as f64
        })
        .sum()
}

fn compare_by(field: RankField, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    match field {
        RankField::RelevanceScore => a.score.unwrap_or(0.0).total_cmp(&b.score.unwrap_or(0.0)),
        RankField::PriceAmount => a.listing.price.amount.total_cmp(&b.listing.price.amount),
        RankField::PromotionTier => a.listing.promotion.rank().cmp(&b.listing.promotion.rank()),
        RankField::CreatedAt => a.listing.created_at.cmp(&b.listing.created_at),
    }
}

fn rank_ordering(rank: &RankKey, a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    rank.entries()
        .iter()
        .map(|entry| {
            let ord = compare_by(entry.field, a, b);
            match entry.direction {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn fetch(
        &self,
        clauses: &[FilterClause],
        rank: &RankKey,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<MatchedListing>, StoreError> {
        let listings = self.listings.read().unwrap_or_else(|e| e.into_inner());
        let mut matched = Self::candidates(&listings, clauses, Utc::now());
        // Stable, so ties keep store-default order
        matched.sort_by(|a, b| rank_ordering(rank, a, b));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|c| MatchedListing {
                category: self.category_summary(c.listing),
                relevance_score: c.score,
                listing: c.listing.clone(),
            })
            .collect())
    }

    async fn count(&self, clauses: &[FilterClause]) -> Result<u64, StoreError> {
        let listings = self.listings.read().unwrap_or_else(|e| e.into_inner());
        Ok(Self::candidates(&listings, clauses, Utc::now()).len() as u64)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
