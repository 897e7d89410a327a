// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::listing::ListingCard;
use crate::models::plan::SearchWarning;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One page of results plus metadata derived from the independent total count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PageResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(page, limit, 0),
        }
    }
}

/// Page metadata. Always derived from `total` and `limit`, never from the
/// number of items actually returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = total.div_ceil(u64::from(limit.max(1)));
        Self {
            page,
            limit,
            total,
            pages,
            has_next: u64::from(page) < pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    pub request_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WarningBody {
    pub code: String,
    pub message: String,
}

impl From<SearchWarning> for WarningBody {
    fn from(warning: SearchWarning) -> Self {
        Self {
            code: warning.code,
            message: warning.message,
        }
    }
}

/// Success envelope of `GET /listings`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingsResponse {
    pub success: bool,
    pub data: Vec<ListingCard>,
    pub pagination: Pagination,
    pub meta: ResponseMeta,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Failure envelope shared by every error status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}
