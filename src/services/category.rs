// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Category slug resolution. Categories are owned by the catalogue service;
//! the search engine only maps a slug to an id once per request.

use crate::error::StoreError;
use crate::models::listing::Category;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;

#[async_trait]
pub trait CategoryResolver: Send + Sync {
    /// Map a slug to a category id. `Ok(None)` means the slug is unknown.
    async fn resolve(&self, slug: &str) -> Result<Option<String>, StoreError>;
}

/// Resolver backed by a fixed slug → id map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryResolver {
    ids_by_slug: HashMap<String, String>,
}

impl InMemoryCategoryResolver {
    pub fn from_categories(categories: &[Category]) -> Self {
        let ids_by_slug = categories
            .iter()
            .map(|c| (c.slug.clone(), c.id.clone()))
            .collect();
        Self { ids_by_slug }
    }
}

#[async_trait]
impl CategoryResolver for InMemoryCategoryResolver {
    async fn resolve(&self, slug: &str) -> Result<Option<String>, StoreError> {
        Ok(self.ids_by_slug.get(slug).cloned())
    }
}

/// Resolver reading the catalogue's `categories` table in Postgres.
#[derive(Clone)]
pub struct PgCategoryResolver {
    pool: PgPool,
}

impl PgCategoryResolver {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl CategoryResolver for PgCategoryResolver {
    async fn resolve(&self, slug: &str) -> Result<Option<String>, StoreError> {
        let id = sqlx::query_scalar::<_, String>(
            "SELECT id::text FROM categories WHERE slug = $1 AND is_active = true LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }
}
