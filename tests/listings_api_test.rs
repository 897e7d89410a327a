// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! End-to-end tests of `GET /listings` against the in-memory store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use listing_search::app::{create_router, AppState};
use listing_search::models::listing::{Category, Listing};
use listing_search::models::settings::SearchSettings;
use listing_search::services::category::InMemoryCategoryResolver;
use listing_search::services::engine::ListingSearchEngine;
use listing_search::services::memory_store::InMemoryListingStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct Fixture {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    price: f64,
    promotion: &'static str,
    minutes_old: i64,
}

impl Fixture {
    fn new(id: &'static str, title: &'static str, price: f64) -> Self {
        Self {
            id,
            title,
            description: "",
            price,
            promotion: "none",
            minutes_old: 0,
        }
    }

    fn into_listing(self, now: DateTime<Utc>) -> Listing {
        serde_json::from_value(json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "price": { "amount": self.price, "currency": "USD" },
            "images": [format!("https://img.example.com/{}.jpg", self.id)],
            "location": {
                "city": "Portland",
                "state": "OR",
                "coordinates": { "lat": 45.5152, "lng": -122.6784 }
            },
            "condition": "good",
            "category_id": "cat-bikes",
            "status": "active",
            "promotion": self.promotion,
            "created_at": now - Duration::minutes(self.minutes_old),
        }))
        .unwrap()
    }
}

fn app(fixtures: Vec<Fixture>) -> Router {
    let now = Utc::now();
    let categories = vec![Category {
        id: "cat-bikes".to_string(),
        name: "Bicycles".to_string(),
        slug: "bicycles".to_string(),
    }];
    let listings = fixtures.into_iter().map(|f| f.into_listing(now)).collect();
    let engine = ListingSearchEngine::new(
        Arc::new(InMemoryListingStore::new(listings, categories.clone())),
        Arc::new(InMemoryCategoryResolver::from_categories(&categories)),
        SearchSettings::default(),
    );
    create_router(AppState {
        engine: Some(engine),
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn ids(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["id"].as_str().unwrap().to_string())
        .collect()
}

fn prices(json: &Value) -> Vec<f64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["price"]["amount"].as_f64().unwrap())
        .collect()
}

fn price_fixtures() -> Vec<Fixture> {
    vec![
        Fixture::new("p10", "Road bike", 10.0),
        Fixture::new("p50", "Gravel bike", 50.0),
        Fixture::new("p30", "City bike", 30.0),
        Fixture::new("p20", "Kids bike", 20.0),
        Fixture::new("p40", "Cargo bike", 40.0),
    ]
}

#[tokio::test]
async fn test_relevance_sort_puts_promoted_first() {
    let mut fixtures: Vec<Fixture> = ["a", "b", "c", "d", "e"]
        .into_iter()
        .map(|id| Fixture::new(id, "Bike", 100.0))
        .collect();
    fixtures[2].promotion = "featured";
    let app = app(fixtures);

    let (status, json) = get(&app, "/listings?sort=relevance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec!["c", "a", "b", "d", "e"]);
    assert_eq!(json["data"][0]["isPromoted"], true);
    assert_eq!(json["data"][1]["isPromoted"], false);
}

#[tokio::test]
async fn test_price_ascending_pages() {
    let app = app(price_fixtures());

    let (_, first) = get(&app, "/listings?sort=price&order=asc&limit=3").await;
    assert_eq!(prices(&first), vec![10.0, 20.0, 30.0]);
    assert_eq!(first["pagination"]["total"], 5);
    assert_eq!(first["pagination"]["pages"], 2);
    assert_eq!(first["pagination"]["hasNext"], true);
    assert_eq!(first["pagination"]["hasPrev"], false);

    let (_, second) = get(&app, "/listings?sort=price&order=asc&limit=3&page=2").await;
    assert_eq!(prices(&second), vec![40.0, 50.0]);
    assert_eq!(second["pagination"]["hasNext"], false);
    assert_eq!(second["pagination"]["hasPrev"], true);
}

#[tokio::test]
async fn test_price_descending_is_non_increasing() {
    let app = app(price_fixtures());
    let (_, json) = get(&app, "/listings?sort=price&order=desc").await;
    let prices = prices(&json);
    assert!(prices.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_text_query_ranks_by_relevance_over_date() {
    let mut fixtures: Vec<Fixture> = (0..8)
        .map(|i| {
            let mut f = Fixture::new(["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"][i], "Sofa", 80.0);
            f.minutes_old = i as i64;
            f
        })
        .collect();
    // Newest match is the weaker one: the term only appears in the description
    let mut weak = Fixture::new("weak", "Helmet and lock", 15.0);
    weak.description = "Fits any bicycle";
    weak.minutes_old = 0;
    let mut strong = Fixture::new("strong", "Bicycle for sale", 120.0);
    strong.minutes_old = 60;
    fixtures.push(weak);
    fixtures.push(strong);
    let app = app(fixtures);

    let (status, json) = get(&app, "/listings?q=bicycle&sort=date").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["total"], 2);
    assert_eq!(ids(&json), vec!["strong", "weak"]);
}

#[tokio::test]
async fn test_inverted_price_range_is_empty_not_error() {
    let app = app(price_fixtures());
    let (status, json) = get(&app, "/listings?minPrice=100&maxPrice=50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["pagination"]["total"], 0);
    assert_eq!(json["pagination"]["pages"], 0);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_adversarial_paging_is_clamped() {
    let app = app(price_fixtures());

    let (status, json) = get(&app, "/listings?limit=100000&page=-3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["limit"], 100);
    assert_eq!(json["pagination"]["page"], 1);

    let (_, json) = get(&app, "/listings?limit=0&page=abc").await;
    assert_eq!(json["pagination"]["limit"], 1);
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["pages"], 5);

    let (_, json) = get(&app, "/listings?limit=ten").await;
    assert_eq!(json["pagination"]["limit"], 20);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = app(price_fixtures());
    let (status, json) = get(&app, "/listings?page=9&limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(json["pagination"]["total"], 5);
    assert_eq!(json["pagination"]["hasNext"], false);
}

#[tokio::test]
async fn test_partial_geo_is_ignored() {
    let app = app(price_fixtures());
    let (_, all) = get(&app, "/listings").await;
    let (status, lat_only) = get(&app, "/listings?lat=45.5&radius=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lat_only["pagination"]["total"], all["pagination"]["total"]);
}

#[tokio::test]
async fn test_geo_radius_filters_by_distance() {
    let app = app(price_fixtures());
    let (_, near) = get(&app, "/listings?lat=45.52&lng=-122.68&radius=5").await;
    assert_eq!(near["pagination"]["total"], 5);

    // Seattle is roughly 233 km away
    let (_, far) = get(&app, "/listings?lat=47.6062&lng=-122.3321&radius=50").await;
    assert_eq!(far["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_unknown_category_keeps_total_and_warns() {
    let app = app(price_fixtures());
    let (_, all) = get(&app, "/listings").await;
    let (status, typo) = get(&app, "/listings?category=bicycels").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(typo["pagination"]["total"], all["pagination"]["total"]);
    assert_eq!(typo["meta"]["warnings"][0]["code"], "CATEGORY_NOT_FOUND");
    assert!(all["meta"].get("warnings").is_none());
}

#[tokio::test]
async fn test_known_category_is_projected_on_cards() {
    let app = app(price_fixtures());
    let (_, json) = get(&app, "/listings?category=bicycles&limit=1").await;
    assert_eq!(json["data"][0]["category"]["slug"], "bicycles");
    assert_eq!(json["data"][0]["category"]["name"], "Bicycles");
}

#[tokio::test]
async fn test_distance_sort_without_geo_warns() {
    let app = app(price_fixtures());
    let (status, json) = get(&app, "/listings?sort=distance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["total"], 5);
    assert_eq!(
        json["meta"]["warnings"][0]["code"],
        "DISTANCE_SORT_WITHOUT_GEO"
    );
}

#[tokio::test]
async fn test_invalid_condition_is_validation_error() {
    let app = app(price_fixtures());
    let (status, json) = get(&app, "/listings?condition=good,shiny").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["details"][0]["field"], "condition");
}

#[tokio::test]
async fn test_out_of_range_latitude_is_validation_error() {
    let app = app(price_fixtures());
    let (status, json) = get(&app, "/listings?lat=123&lng=10&radius=5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app(price_fixtures());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/listings")
                .header("x-request-id", "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["meta"]["requestId"], "trace-42");
    assert!(json["meta"]["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_cards_carry_first_image_only() {
    let app = app(price_fixtures());
    let (_, json) = get(&app, "/listings?limit=1&sort=price&order=asc").await;
    assert_eq!(json["data"][0]["image"], "https://img.example.com/p10.jpg");
    assert!(json["data"][0].get("description").is_none());
}

#[tokio::test]
async fn test_repeated_query_key_is_validation_error() {
    let app = app(price_fixtures());

    let (status, json) = get(&app, "/listings?page=1&page=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["details"][0]["field"], "page");

    let (status, json) = get(&app, "/listings?condition=new&condition=good").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["details"][0]["field"], "condition");
}
