// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::listing::{CardLocation, CardStats, ListingCard, MatchedListing};

/// Shape a matched listing into the card returned to clients. Keeps only the
/// first image and the view/favorite counters; the category comes already
/// joined by the store.
pub fn project(matched: MatchedListing) -> ListingCard {
    let MatchedListing {
        listing, category, ..
    } = matched;

    ListingCard {
        image: listing.images.into_iter().next(),
        location: CardLocation {
            city: listing.location.city,
            state: listing.location.state,
        },
        stats: CardStats {
            views: listing.stats.views,
            favorites: listing.stats.favorites,
        },
        is_promoted: listing.promotion.is_promoted(),
        is_verified: listing.verified,
        id: listing.id,
        title: listing.title,
        price: listing.price,
        condition: listing.condition,
        promotion: listing.promotion,
        category,
        created_at: listing.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::{CategorySummary, Listing, PromotionTier};
    use chrono::Utc;

    fn matched() -> MatchedListing {
        let listing: Listing = serde_json::from_value(serde_json::json!({
            "id": "l1",
            "title": "Road bike",
            "description": "Lightly used",
            "price": { "amount": 120.0, "currency": "EUR" },
            "images": ["first.jpg", "second.jpg"],
            "location": { "city": "Lyon", "state": "ARA", "coordinates": { "lat": 45.76, "lng": 4.83 } },
            "condition": "good",
            "category_id": "cat-1",
            "status": "active",
            "promotion": "urgent",
            "verified": true,
            "stats": { "views": 40, "favorites": 3, "shares": 7, "inquiries": 2 },
            "seller_id": "seller-9",
            "created_at": Utc::now(),
        }))
        .unwrap();
        MatchedListing {
            listing,
            category: Some(CategorySummary {
                name: "Bicycles".to_string(),
                slug: "bicycles".to_string(),
            }),
            relevance_score: Some(3.0),
        }
    }

    #[test]
    fn test_project_keeps_first_image_only() {
        let card = project(matched());
        assert_eq!(card.image.as_deref(), Some("first.jpg"));
    }

    #[test]
    fn test_project_copies_flags_and_stats() {
        let card = project(matched());
        assert_eq!(card.promotion, PromotionTier::Urgent);
        assert!(card.is_promoted);
        assert!(card.is_verified);
        assert_eq!(card.stats.views, 40);
        assert_eq!(card.stats.favorites, 3);
        assert_eq!(card.category.unwrap().slug, "bicycles");
        assert_eq!(card.location.state.as_deref(), Some("ARA"));
    }

    #[test]
    fn test_card_json_drops_internal_fields() {
        let json = serde_json::to_value(project(matched())).unwrap();
        for hidden in ["description", "sellerId", "seller_id", "images", "status", "coordinates"] {
            assert!(json.get(hidden).is_none(), "{hidden} leaked");
        }
        assert!(json["stats"].get("shares").is_none());
        assert!(json["location"].get("coordinates").is_none());
        assert_eq!(json["isPromoted"], true);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_project_without_images() {
        let mut m = matched();
        m.listing.images.clear();
        assert_eq!(project(m).image, None);
    }
}
