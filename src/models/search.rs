// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::listing::{
    CategorySummary, Condition, GeoPoint, Listing, ListingLocation, ListingStats, ListingStatus,
    Price, PromotionTier,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing document as indexed in Meilisearch: flattened, with the category
/// name and slug denormalised at index time and timestamps as epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedListing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_amount: f64,
    pub price_currency: String,
    pub images: Vec<String>,
    pub city: String,
    pub state: Option<String>,
    /// Meilisearch geo field
    #[serde(rename = "_geo", skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
    pub condition: Condition,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub status: ListingStatus,
    /// Seconds since epoch; absent when the listing never expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub promotion_tier: u8,
    pub verified: bool,
    pub views: u64,
    pub favorites: u64,
    pub created_at: i64,
}

impl IndexedListing {
    pub fn from_listing(listing: &Listing, category: Option<&CategorySummary>) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            price_amount: listing.price.amount,
            price_currency: listing.price.currency.clone(),
            images: listing.images.clone(),
            city: listing.location.city.clone(),
            state: listing.location.state.clone(),
            geo: listing.location.coordinates,
            condition: listing.condition,
            category_id: listing.category_id.clone(),
            category_name: category.map(|c| c.name.clone()),
            category_slug: category.map(|c| c.slug.clone()),
            status: listing.status,
            expires_at: listing.expires_at.map(|t| t.timestamp()),
            promotion_tier: listing.promotion.rank(),
            verified: listing.verified,
            views: listing.stats.views,
            favorites: listing.stats.favorites,
            created_at: listing.created_at.timestamp(),
        }
    }

    /// Rebuild the listing and its joined category. Counters other than views
    /// and favorites are not indexed and come back as zero.
    pub fn into_parts(self) -> (Listing, Option<CategorySummary>) {
        let category = match (self.category_name, self.category_slug) {
            (Some(name), Some(slug)) => Some(CategorySummary { name, slug }),
            _ => None,
        };
        let listing = Listing {
            id: self.id,
            title: self.title,
            description: self.description,
            price: Price {
                amount: self.price_amount,
                currency: self.price_currency,
            },
            images: self.images,
            location: ListingLocation {
                city: self.city,
                state: self.state,
                coordinates: self.geo,
            },
            condition: self.condition,
            category_id: self.category_id,
            status: self.status,
            expires_at: self.expires_at.and_then(|s| DateTime::from_timestamp(s, 0)),
            promotion: PromotionTier::from_rank(self.promotion_tier),
            verified: self.verified,
            stats: ListingStats {
                views: self.views,
                favorites: self.favorites,
                ..ListingStats::default()
            },
            seller_id: None,
            created_at: DateTime::from_timestamp(self.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: None,
        };
        (listing, category)
    }
}
