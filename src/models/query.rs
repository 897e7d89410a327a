// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::listing::{Condition, GeoPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::IntoParams;

/// Default page size when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 20;
/// Hard ceiling on page size.
pub const MAX_LIMIT: u32 = 100;

/// Raw query-string parameters of `GET /listings`.
///
/// Every field is kept as a string so that malformed numbers reach the
/// normalizer instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingsParams {
    /// Free-text query
    pub q: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// City name (case-insensitive substring)
    pub city: Option<String>,
    /// Search radius in kilometers, used together with `lat` and `lng`
    pub radius: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Comma-separated list of conditions: new, like-new, good, fair, poor
    pub condition: Option<String>,
    /// One of: date, price, relevance, distance
    pub sort: Option<String>,
    /// One of: asc, desc
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Price,
    Relevance,
    Distance,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date" => Some(SortField::Date),
            "price" => Some(SortField::Price),
            "relevance" => Some(SortField::Relevance),
            "distance" => Some(SortField::Distance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    pub city: Option<String>,
    /// Kilometers
    pub radius: Option<f64>,
    pub coordinates: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBounds {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Canonical, validated search request. Built once per request; the
/// `with_*` methods consume and return a new value so no step mutates a
/// shared accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub category_slug: Option<String>,
    pub location: LocationFilter,
    pub price_range: PriceBounds,
    pub conditions: BTreeSet<Condition>,
    pub sort: SortField,
    pub order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            category_slug: None,
            location: LocationFilter::default(),
            price_range: PriceBounds::default(),
            conditions: BTreeSet::new(),
            sort: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchQuery {
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..self
        }
    }

    pub fn with_category(self, slug: impl Into<String>) -> Self {
        Self {
            category_slug: Some(slug.into()),
            ..self
        }
    }

    pub fn with_city(self, city: impl Into<String>) -> Self {
        Self {
            location: LocationFilter {
                city: Some(city.into()),
                ..self.location
            },
            ..self
        }
    }

    pub fn with_geo(self, center: GeoPoint, radius_km: f64) -> Self {
        Self {
            location: LocationFilter {
                radius: Some(radius_km),
                coordinates: Some(center),
                ..self.location
            },
            ..self
        }
    }

    pub fn with_price(self, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            price_range: PriceBounds { min, max },
            ..self
        }
    }

    pub fn with_conditions(self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            conditions: conditions.into_iter().collect(),
            ..self
        }
    }

    pub fn with_sort(self, sort: SortField, order: SortOrder) -> Self {
        Self {
            sort,
            order,
            ..self
        }
    }

    /// Page and limit are clamped to their valid ranges.
    pub fn with_page(self, page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
            ..self
        }
    }

    /// Both a center point and a radius are present, so a geo clause applies.
    pub fn has_geo_filter(&self) -> bool {
        self.location.coordinates.is_some() && self.location.radius.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_first_page_of_twenty_by_date_desc() {
        let query = SearchQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.sort, SortField::Date);
        assert_eq!(query.order, SortOrder::Desc);
        assert!(!query.has_geo_filter());
    }

    #[test]
    fn test_builder_steps_do_not_disturb_other_fields() {
        let query = SearchQuery::default()
            .with_city("Austin")
            .with_geo(GeoPoint { lat: 30.27, lng: -97.74 }, 10.0)
            .with_text("lamp");

        assert_eq!(query.location.city.as_deref(), Some("Austin"));
        assert_eq!(query.location.radius, Some(10.0));
        assert_eq!(query.text.as_deref(), Some("lamp"));
        assert!(query.has_geo_filter());
    }

    #[test]
    fn test_with_page_clamps() {
        let query = SearchQuery::default().with_page(0, 5000);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MAX_LIMIT);

        let query = SearchQuery::default().with_page(3, 0);
        assert_eq!(query.limit, 1);
    }

    #[test]
    fn test_sort_and_order_parse() {
        assert_eq!(SortField::parse("distance"), Some(SortField::Distance));
        assert_eq!(SortField::parse("popularity"), None);
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("ASC"), None);
    }
}
