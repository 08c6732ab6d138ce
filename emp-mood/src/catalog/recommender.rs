//! Recommendation query builder and result assembly
//!
//! Never fails: every transport error, malformed body or empty result comes
//! back as [`RecommendationResult::Error`] with a reason naming the query.
//! One attempt per call, no retries.

use super::sanitizer::{collection_id, sanitize_tracks, valid_collections};
use super::{CatalogClient, SearchQuery};
use crate::types::RecommendationResult;
use emp_common::config::{CatalogConfig, MAX_PAGE_SIZE};
use emp_common::{Emotion, Genre};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Recommender {
    catalog: Arc<dyn CatalogClient>,
    search_limit: u32,
    item_limit: u32,
    market: Option<String>,
}

impl Recommender {
    /// Recommender with the maximum page sizes and no market
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            search_limit: MAX_PAGE_SIZE,
            item_limit: MAX_PAGE_SIZE,
            market: None,
        }
    }

    pub fn from_config(catalog: Arc<dyn CatalogClient>, config: &CatalogConfig) -> Self {
        Self::new(catalog)
            .with_limits(config.effective_search_limit(), config.effective_item_limit())
            .with_market(config.market.clone())
    }

    /// Page sizes, clamped to `1..=MAX_PAGE_SIZE`
    pub fn with_limits(mut self, search_limit: u32, item_limit: u32) -> Self {
        self.search_limit = search_limit.clamp(1, MAX_PAGE_SIZE);
        self.item_limit = item_limit.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_market(mut self, market: Option<String>) -> Self {
        self.market = market.filter(|m| !m.trim().is_empty());
        self
    }

    pub async fn recommend(&self, emotion: Emotion, genre: Genre) -> RecommendationResult {
        self.recommend_query(&SearchQuery::new(emotion, genre)).await
    }

    pub async fn recommend_query(&self, query: &SearchQuery) -> RecommendationResult {
        info!(query = %query, "Searching catalog");

        let search = match self
            .catalog
            .search_collections(query.as_str(), self.search_limit, self.market.as_deref())
            .await
        {
            Ok(body) => body,
            Err(e) => return request_failed(query, e),
        };

        let collections = valid_collections(&search);
        let Some(first) = collections.first() else {
            return RecommendationResult::error(format!(
                "No usable collection found for query '{}'",
                query
            ));
        };

        let Some(id) = collection_id(first) else {
            return RecommendationResult::error(format!(
                "First collection for query '{}' has no usable id",
                query
            ));
        };
        debug!(query = %query, collection = %id, "Listing collection items");

        let listing = match self.catalog.list_items(id, self.item_limit).await {
            Ok(body) => body,
            Err(e) => return request_failed(query, e),
        };

        let result = RecommendationResult::from_tracks(
            sanitize_tracks(&listing),
            format!("No playable tracks for query '{}'", query),
        );
        match &result {
            RecommendationResult::Tracks { tracks } => {
                info!(query = %query, count = tracks.len(), "Recommendation ready")
            }
            RecommendationResult::Error { reason } => warn!("{}", reason),
        }
        result
    }
}

fn request_failed(query: &SearchQuery, error: impl std::fmt::Display) -> RecommendationResult {
    warn!(query = %query, "Catalog request failed: {}", error);
    RecommendationResult::error(format!(
        "Catalog request failed for query '{}': {}",
        query, error
    ))
}
