// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::StoreError;
use crate::models::listing::MatchedListing;
use crate::models::plan::{FilterClause, RankKey};
use async_trait::async_trait;

/// Read-only query executor over the listing collection.
///
/// The two reads are independent: `count` is not tied to any particular
/// `fetch`, and neither carries a snapshot token.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Apply `clauses`, order by `rank` (store-default order for ties and for
    /// an empty key), skip `skip` and return at most `limit` listings with
    /// their category joined.
    async fn fetch(
        &self,
        clauses: &[FilterClause],
        rank: &RankKey,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<MatchedListing>, StoreError>;

    /// Number of listings matching `clauses`. A backend may cap this at its
    /// own result window (Meilisearch: the index's `maxTotalHits`).
    async fn count(&self, clauses: &[FilterClause]) -> Result<u64, StoreError>;

    /// Backend name for health and version reporting.
    fn backend_name(&self) -> &'static str;
}
