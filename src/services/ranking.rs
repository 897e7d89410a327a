// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Chooses the rank key for a query.
//!
//! A text query always ranks by relevance first. The requested `sort` then
//! adds at most one secondary key:
//! - `price`: price in the requested order
//! - `relevance`: promotion tier, but only when there is no text query
//! - `distance`: nothing; proximity comes from the geo clause itself
//! - `date`: creation time in the requested order

use crate::models::plan::{RankField, RankKey, SearchWarning};
use crate::models::query::{SearchQuery, SortField, SortOrder};

pub fn select_rank_key(query: &SearchQuery) -> RankKey {
    let key = if query.text.is_some() {
        RankKey::new().then(RankField::RelevanceScore, SortOrder::Desc)
    } else {
        RankKey::new()
    };

    match query.sort {
        SortField::Price => key.then(RankField::PriceAmount, query.order),
        SortField::Relevance if query.text.is_none() => {
            key.then(RankField::PromotionTier, SortOrder::Desc)
        }
        SortField::Relevance | SortField::Distance => key,
        SortField::Date => key.then(RankField::CreatedAt, query.order),
    }
}

/// `sort=distance` with no geo filter has nothing to sort by.
pub fn distance_sort_warning(query: &SearchQuery) -> Option<SearchWarning> {
    (query.sort == SortField::Distance && !query.has_geo_filter())
        .then(SearchWarning::distance_sort_without_geo)
}
