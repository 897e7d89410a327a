// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Compiles a [`SearchQuery`] into the ordered, AND-ed match stage.

use crate::models::plan::FilterClause;
use crate::models::query::SearchQuery;

const METERS_PER_KM: f64 = 1000.0;

/// Clause order is fixed: status, text, category, city, geo, price, condition.
/// `StatusActive` is always first; the rest appear only when their input is present.
pub fn compile(query: &SearchQuery, category_id: Option<&str>) -> Vec<FilterClause> {
    let geo = match (query.location.coordinates, query.location.radius) {
        (Some(center), Some(radius_km)) => Some(FilterClause::GeoWithin {
            center,
            radius_meters: radius_km * METERS_PER_KM,
        }),
        _ => None,
    };

    // Inverted bounds still compile; the predicate just matches nothing
    let price = (!query.price_range.is_unbounded()).then_some(FilterClause::PriceRange {
        min: query.price_range.min,
        max: query.price_range.max,
    });

    [
        Some(FilterClause::StatusActive),
        query.text.clone().map(FilterClause::TextMatch),
        category_id.map(|id| FilterClause::CategoryEquals(id.to_string())),
        query.location.city.clone().map(FilterClause::CityMatches),
        geo,
        price,
        (!query.conditions.is_empty()).then(|| FilterClause::ConditionIn(query.conditions.clone())),
    ]
    .into_iter()
    .flatten()
    .collect()
}
