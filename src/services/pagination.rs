// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Offset pagination over a [`ListingStore`].
//!
//! Consistency model: eventually consistent. The page fetch and the total
//! count are two independent reads issued concurrently, with no snapshot or
//! cursor between them. A write landing between the two can make `total`
//! disagree with what the pages actually contain.

use crate::error::StoreError;
use crate::models::listing::MatchedListing;
use crate::models::plan::{FilterClause, RankKey};
use crate::models::response::{PageResult, Pagination};
use crate::services::store::ListingStore;
use std::time::Duration;

/// Documents to skip before page `page` (1-based) of size `limit`.
pub fn skip_for(page: u32, limit: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(limit)
}

pub struct Paginator<'a> {
    store: &'a dyn ListingStore,
    timeout: Duration,
}

impl<'a> Paginator<'a> {
    pub fn new(store: &'a dyn ListingStore, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Fetch page `page` (1-based) of size `limit` and count all matches.
    /// Both reads run concurrently under one timeout; if either fails the
    /// whole page fails.
    pub async fn paginate(
        &self,
        clauses: &[FilterClause],
        rank: &RankKey,
        page: u32,
        limit: u32,
    ) -> Result<PageResult<MatchedListing>, StoreError> {
        let skip = skip_for(page, limit);

        let fetch = self.store.fetch(clauses, rank, skip, limit);
        // Count ignores the rank key
        let count = self.store.count(clauses);

        let (items, total) = tokio::time::timeout(self.timeout, async {
            futures::try_join!(fetch, count)
        })
        .await
        .map_err(|_| StoreError::Timeout(self.timeout.as_millis()))??;

        Ok(PageResult {
            items,
            pagination: Pagination::new(page, limit, total),
        })
    }
}
