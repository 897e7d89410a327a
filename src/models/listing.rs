// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Physical condition of the item being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Condition::New),
            "like-new" => Some(Condition::LikeNew),
            "good" => Some(Condition::Good),
            "fair" => Some(Condition::Fair),
            "poor" => Some(Condition::Poor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a listing. Only `Active` listings are searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Active,
    Sold,
    Expired,
    Removed,
}

/// Paid visibility boost attached to a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PromotionTier {
    #[default]
    None,
    Urgent,
    Featured,
}

impl PromotionTier {
    /// Numeric rank used for the promotion tie-break; higher surfaces first.
    pub fn rank(&self) -> u8 {
        match self {
            PromotionTier::None => 0,
            PromotionTier::Urgent => 1,
            PromotionTier::Featured => 2,
        }
    }

    pub fn from_rank(rank: u8) -> Self {
        match rank {
            0 => PromotionTier::None,
            1 => PromotionTier::Urgent,
            _ => PromotionTier::Featured,
        }
    }

    pub fn is_promoted(&self) -> bool {
        !matches!(self, PromotionTier::None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

    /// Great-circle distance in meters (haversine).
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * Self::EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingLocation {
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}

/// Engagement counters kept on the listing document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingStats {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub favorites: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub inquiries: u64,
}

/// Listing document as stored by the marketplace. Owned and written by the
/// listing CRUD service; the search engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub images: Vec<String>,
    pub location: ListingLocation,
    pub condition: Condition,
    #[serde(default)]
    pub category_id: Option<String>,
    pub status: ListingStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub promotion: PromotionTier,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub stats: ListingStats,
    #[serde(default)]
    pub seller_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Active and not yet expired at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ListingStatus::Active && self.expires_at.map_or(true, |at| at > now)
    }
}

/// Category record owned by the category service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Category name and slug joined onto a matched listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// A listing returned by the store for a query: the raw document, the
/// category joined onto it, and the store's text score when a text clause ran.
#[derive(Debug, Clone)]
pub struct MatchedListing {
    pub listing: Listing,
    pub category: Option<CategorySummary>,
    pub relevance_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardLocation {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardStats {
    pub views: u64,
    pub favorites: u64,
}

/// Lightweight listing projection returned in search results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: String,
    pub title: String,
    pub price: Price,
    /// First image of the listing, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub location: CardLocation,
    pub condition: Condition,
    pub promotion: PromotionTier,
    pub is_promoted: bool,
    pub is_verified: bool,
    pub stats: CardStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
    pub created_at: DateTime<Utc>,
}
