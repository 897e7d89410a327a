// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Query plan pieces handed to a [`ListingStore`](crate::services::store::ListingStore):
//! filter clauses (all AND-ed) and the rank key.

use crate::models::listing::{Condition, GeoPoint};
use crate::models::query::SortOrder;
use serde::Serialize;
use std::collections::BTreeSet;
use utoipa::ToSchema;

/// A single predicate of the match stage.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Status is active and the listing has not expired at evaluation time
    StatusActive,
    TextMatch(String),
    CategoryEquals(String),
    /// Case-insensitive literal substring of the listing city
    CityMatches(String),
    GeoWithin { center: GeoPoint, radius_meters: f64 },
    /// Inclusive bounds; a missing bound is unbounded
    PriceRange { min: Option<f64>, max: Option<f64> },
    ConditionIn(BTreeSet<Condition>),
}

impl FilterClause {
    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterClause::StatusActive => "status_active",
            FilterClause::TextMatch(_) => "text_match",
            FilterClause::CategoryEquals(_) => "category_equals",
            FilterClause::CityMatches(_) => "city_matches",
            FilterClause::GeoWithin { .. } => "geo_within",
            FilterClause::PriceRange { .. } => "price_range",
            FilterClause::ConditionIn(_) => "condition_in",
        }
    }
}

/// Fields a store can rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    RelevanceScore,
    PriceAmount,
    PromotionTier,
    CreatedAt,
}

impl RankField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankField::RelevanceScore => "relevanceScore",
            RankField::PriceAmount => "price.amount",
            RankField::PromotionTier => "promotionTier",
            RankField::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEntry {
    pub field: RankField,
    pub direction: SortOrder,
}

/// Ordered sort keys; the first entry is primary and each later entry only
/// breaks ties left by the ones before it. An empty key means store-default
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankKey {
    entries: Vec<RankEntry>,
}

impl RankKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new key with `(field, direction)` appended at the lowest precedence.
    pub fn then(self, field: RankField, direction: SortOrder) -> Self {
        let mut entries = self.entries;
        entries.push(RankEntry { field, direction });
        Self { entries }
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    pub fn primary(&self) -> Option<&RankEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for RankKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} {}", e.field.as_str(), e.direction.as_str()))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// A documented degradation that happened while planning the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchWarning {
    pub code: String,
    pub message: String,
}

impl SearchWarning {
    pub const CATEGORY_NOT_FOUND: &'static str = "CATEGORY_NOT_FOUND";
    pub const DISTANCE_SORT_WITHOUT_GEO: &'static str = "DISTANCE_SORT_WITHOUT_GEO";

    pub fn category_not_found(slug: &str) -> Self {
        Self {
            code: Self::CATEGORY_NOT_FOUND.to_string(),
            message: format!("Category '{slug}' was not found; category filter ignored"),
        }
    }

    pub fn distance_sort_without_geo() -> Self {
        Self {
            code: Self::DISTANCE_SORT_WITHOUT_GEO.to_string(),
            message: "sort=distance needs lat, lng and radius; default order used".to_string(),
        }
    }
}
