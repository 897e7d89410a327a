// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Listing search route handlers.

use crate::app::{AppState, VERSION};
use crate::error::ApiError;
use crate::models::listing::{
    CardLocation, CardStats, CategorySummary, Condition, ListingCard, Price, PromotionTier,
};
use crate::models::query::ListingsParams;
use crate::models::response::{
    ErrorBody, ErrorResponse, FieldError, ListingsResponse, Pagination, ResponseMeta, WarningBody,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use utoipa::OpenApi;
use uuid::Uuid;

/// Header a gateway may set to correlate logs across services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(search_listings_handler),
    components(schemas(
        ListingsResponse,
        ListingCard,
        Price,
        CardLocation,
        CardStats,
        CategorySummary,
        Condition,
        PromotionTier,
        Pagination,
        ResponseMeta,
        WarningBody,
        ErrorResponse,
        ErrorBody,
        FieldError,
    )),
    tags((name = "listings", description = "Listing discovery"))
)]
pub struct ListingsApiDoc;

pub fn listings_router() -> Router<AppState> {
    Router::new().route("/listings", get(search_listings_handler))
}

/// Use the caller's request id when it sent a usable one.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

/// GET /listings - Search active listings.
#[utoipa::path(
    get,
    path = "/listings",
    tag = "listings",
    params(ListingsParams),
    responses(
        (status = 200, description = "One page of matching listings", body = ListingsResponse),
        (status = 400, description = "Invalid search parameters", body = ErrorResponse),
        (status = 500, description = "Search failed", body = ErrorResponse),
        (status = 503, description = "Search backend not configured", body = ErrorResponse)
    )
)]
pub async fn search_listings_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<ListingsParams>, QueryRejection>,
) -> Result<Json<ListingsResponse>, ApiError> {
    let engine = state.engine.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Search service is not available".to_string())
    })?;
    // Repeated keys fail deserialization and are reported as a validation error
    let Query(params) = params?;

    let request_id = request_id(&headers);
    let outcome = engine.search(&params).await.map_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Listing search failed");
        ApiError::from(e)
    })?;

    Ok(Json(ListingsResponse {
        success: true,
        data: outcome.page.items,
        pagination: outcome.page.pagination,
        meta: ResponseMeta {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            request_id,
            version: VERSION.to_string(),
            warnings: outcome.warnings.into_iter().map(WarningBody::from).collect(),
        },
    }))
}
