// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, service-level handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::response::HealthResponse;
use crate::models::version::VersionResponse;
use crate::routes::{listings_router, ListingsApiDoc};
use crate::services::engine::ListingSearchEngine;
use axum::{extract::State, routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `LISTINGS_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("LISTINGS_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the store backend could not be configured; search routes
    /// then answer 503 while the rest of the service keeps running.
    pub engine: Option<ListingSearchEngine>,
}

impl AppState {
    fn store_name(&self) -> String {
        self.engine
            .as_ref()
            .map_or("unavailable", |e| e.store_backend())
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "listing-search".to_string(),
        version: VERSION.to_string(),
        store_backend: state.store_name(),
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.engine.is_some() {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse {
        status: status.to_string(),
        store: state.store_name(),
    })
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router, including the OpenAPI document and Swagger UI.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/health", get(health_handler))
        .merge(listings_router())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ListingsApiDoc::openapi()))
}
