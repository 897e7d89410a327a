// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use std::time::Duration;

/// Which document store backs the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, seeded from a JSON file. Used for development and tests.
    Memory,
    /// Meilisearch index holding denormalised listing documents.
    Meilisearch,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "memory" => Ok(StoreBackend::Memory),
            "meilisearch" => Ok(StoreBackend::Meilisearch),
            _ => Err(format!(
                "STORE_BACKEND must be 'memory' or 'meilisearch', got: {value}"
            )),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Meilisearch => write!(f, "meilisearch"),
        }
    }
}

/// What to do when the requested category slug does not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryResolutionPolicy {
    /// Search as if no category had been given, and say so in a warning.
    #[default]
    DropFilterOnMiss,
    /// Return an empty page without querying the store.
    EmptyResultOnMiss,
}

impl CategoryResolutionPolicy {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "drop-filter" => Ok(CategoryResolutionPolicy::DropFilterOnMiss),
            "empty-result" => Ok(CategoryResolutionPolicy::EmptyResultOnMiss),
            _ => Err(format!(
                "category miss policy must be 'drop-filter' or 'empty-result', got: {value}"
            )),
        }
    }
}

impl std::fmt::Display for CategoryResolutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryResolutionPolicy::DropFilterOnMiss => write!(f, "drop-filter"),
            CategoryResolutionPolicy::EmptyResultOnMiss => write!(f, "empty-result"),
        }
    }
}

/// What to do with `sort=distance` when there is no geo filter to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceSortPolicy {
    /// Fall through to store-default order and attach a warning.
    #[default]
    NoopWithoutGeo,
    /// Fail validation on the `sort` field.
    RejectWithoutGeo,
}

impl DistanceSortPolicy {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "noop" => Ok(DistanceSortPolicy::NoopWithoutGeo),
            "reject" => Ok(DistanceSortPolicy::RejectWithoutGeo),
            _ => Err(format!(
                "distance sort policy must be 'noop' or 'reject', got: {value}"
            )),
        }
    }
}

impl std::fmt::Display for DistanceSortPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceSortPolicy::NoopWithoutGeo => write!(f, "noop"),
            DistanceSortPolicy::RejectWithoutGeo => write!(f, "reject"),
        }
    }
}

/// Engine limits and policies shared by every request.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Budget for the concurrent fetch + count pair
    pub query_timeout: Duration,
    pub max_radius_km: f64,
    pub max_text_len: usize,
    pub category_policy: CategoryResolutionPolicy,
    pub distance_policy: DistanceSortPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_millis(5_000),
            max_radius_km: 500.0,
            max_text_len: 200,
            category_policy: CategoryResolutionPolicy::default(),
            distance_policy: DistanceSortPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_backend() {
        assert_eq!(StoreBackend::parse("memory"), Ok(StoreBackend::Memory));
        assert_eq!(
            StoreBackend::parse("meilisearch"),
            Ok(StoreBackend::Meilisearch)
        );
        assert!(StoreBackend::parse("mongo")
            .unwrap_err()
            .contains("STORE_BACKEND must be 'memory' or 'meilisearch'"));
    }

    #[test]
    fn test_policy_display_matches_parse() {
        for policy in [
            CategoryResolutionPolicy::DropFilterOnMiss,
            CategoryResolutionPolicy::EmptyResultOnMiss,
        ] {
            assert_eq!(
                CategoryResolutionPolicy::parse(&policy.to_string()),
                Ok(policy)
            );
        }
        for policy in [
            DistanceSortPolicy::NoopWithoutGeo,
            DistanceSortPolicy::RejectWithoutGeo,
        ] {
            assert_eq!(DistanceSortPolicy::parse(&policy.to_string()), Ok(policy));
        }
    }

    #[test]
    fn test_default_policies_preserve_silent_degradation() {
        let settings = SearchSettings::default();
        assert_eq!(
            settings.category_policy,
            CategoryResolutionPolicy::DropFilterOnMiss
        );
        assert_eq!(settings.distance_policy, DistanceSortPolicy::NoopWithoutGeo);
        assert_eq!(settings.max_text_len, 200);
    }
}
