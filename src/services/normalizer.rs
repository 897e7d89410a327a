// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Turns raw `GET /listings` parameters into a validated [`SearchQuery`].
//!
//! Numbers that fail to parse are treated as absent. Enumerated values
//! (`condition`, `sort`, `order`) must be recognised, and out-of-range numbers
//! are rejected. Coordinates are range-checked only as a full lat/lng pair.
//! Every problem is collected so the client sees all of them at once.

use crate::error::ValidationError;
use crate::models::listing::{Condition, GeoPoint};
use crate::models::query::{
    ListingsParams, LocationFilter, PriceBounds, SearchQuery, SortField, SortOrder, DEFAULT_LIMIT,
    MAX_LIMIT,
};
use crate::models::response::FieldError;
use crate::models::settings::{DistanceSortPolicy, SearchSettings};
use std::collections::BTreeSet;

pub fn normalize(
    params: &ListingsParams,
    settings: &SearchSettings,
) -> Result<SearchQuery, ValidationError> {
    let mut errors = Vec::new();

    let text = non_blank(params.q.as_deref());
    if let Some(t) = &text {
        if t.chars().count() > settings.max_text_len {
            errors.push(FieldError::new(
                "q",
                format!("must be at most {} characters", settings.max_text_len),
            ));
        }
    }

    let location = normalize_location(params, settings, &mut errors);
    let price_range = normalize_price(params, &mut errors);
    let conditions = parse_conditions(params.condition.as_deref(), &mut errors);

    let sort = match non_blank(params.sort.as_deref()) {
        None => SortField::default(),
        Some(raw) => SortField::parse(&raw).unwrap_or_else(|| {
            errors.push(FieldError::new(
                "sort",
                "must be one of: date, price, relevance, distance",
            ));
            SortField::default()
        }),
    };
    let order = match non_blank(params.order.as_deref()) {
        None => SortOrder::default(),
        Some(raw) => SortOrder::parse(&raw).unwrap_or_else(|| {
            errors.push(FieldError::new("order", "must be one of: asc, desc"));
            SortOrder::default()
        }),
    };

    let query = SearchQuery {
        text,
        category_slug: non_blank(params.category.as_deref()),
        location,
        price_range,
        conditions,
        sort,
        order,
        page: normalize_page(params.page.as_deref()),
        limit: normalize_limit(params.limit.as_deref()),
    };

    if query.sort == SortField::Distance
        && !query.has_geo_filter()
        && settings.distance_policy == DistanceSortPolicy::RejectWithoutGeo
    {
        errors.push(FieldError::new(
            "sort",
            "distance sort requires lat, lng and radius",
        ));
    }

    if errors.is_empty() {
        Ok(query)
    } else {
        Err(ValidationError { details: errors })
    }
}

/// Absent, zero, negative or non-numeric pages all mean page 1.
pub fn normalize_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|&p| p >= 1)
        .map_or(1, |p| u32::try_from(p).unwrap_or(u32::MAX))
}

/// `min(requested or 20, 100)`, floored at 1.
pub fn normalize_limit(raw: Option<&str>) -> u32 {
    let requested = raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(i64::from(DEFAULT_LIMIT));
    requested.clamp(1, i64::from(MAX_LIMIT)) as u32
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn normalize_location(
    params: &ListingsParams,
    settings: &SearchSettings,
    errors: &mut Vec<FieldError>,
) -> LocationFilter {
    let radius = parse_number(params.radius.as_deref());
    if let Some(r) = radius {
        if r <= 0.0 || r > settings.max_radius_km {
            errors.push(FieldError::new(
                "radius",
                format!(
                    "must be greater than 0 and at most {} km",
                    settings.max_radius_km
                ),
            ));
        }
    }

    // Only a full coordinate pair counts; half of one is simply no geo input,
    // so its range is never checked
    let coordinates = match (
        parse_number(params.lat.as_deref()),
        parse_number(params.lng.as_deref()),
    ) {
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) {
                errors.push(FieldError::new("lat", "must be between -90 and 90"));
            }
            if !(-180.0..=180.0).contains(&lng) {
                errors.push(FieldError::new("lng", "must be between -180 and 180"));
            }
            Some(GeoPoint { lat, lng })
        }
        _ => None,
    };

    LocationFilter {
        city: non_blank(params.city.as_deref()),
        radius,
        coordinates,
    }
}

fn normalize_price(params: &ListingsParams, errors: &mut Vec<FieldError>) -> PriceBounds {
    let min = parse_number(params.min_price.as_deref());
    let max = parse_number(params.max_price.as_deref());
    if min.is_some_and(|v| v < 0.0) {
        errors.push(FieldError::new("minPrice", "must be at least 0"));
    }
    if max.is_some_and(|v| v < 0.0) {
        errors.push(FieldError::new("maxPrice", "must be at least 0"));
    }
    PriceBounds { min, max }
}

fn parse_conditions(raw: Option<&str>, errors: &mut Vec<FieldError>) -> BTreeSet<Condition> {
    let Some(raw) = raw else {
        return BTreeSet::new();
    };

    let mut conditions = BTreeSet::new();
    let mut unknown = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match Condition::parse(token) {
            Some(c) => {
                conditions.insert(c);
            }
            None => unknown.push(token.to_string()),
        }
    }

    if !unknown.is_empty() {
        errors.push(FieldError::new(
            "condition",
            format!(
                "unknown condition(s): {}; expected new, like-new, good, fair, poor",
                unknown.join(", ")
            ),
        ));
    }
    conditions
}
