use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::{
    cache::DetailCache,
    config::Config,
    error::AppResult,
    models::{CandidateItem, MediaKind},
    services::{
        candidates::{assemble_pool, exclude_favorites},
        metadata::MetadataClient,
        profile::build_profile,
        providers::{FavoritesApi, FavoritesProvider, TmdbProvider},
        ranking::{rank, ScoringPolicy},
    },
};

/// Tunables of one engine instance
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub media_kinds: Vec<MediaKind>,
    pub catalog_pages: u32,
    pub limit: usize,
    pub scoring_policy: ScoringPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            media_kinds: MediaKind::ALL.to_vec(),
            catalog_pages: 5,
            limit: 20,
            scoring_policy: ScoringPolicy::default(),
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            media_kinds: MediaKind::ALL.to_vec(),
            catalog_pages: config.catalog_pages,
            limit: config.recommendation_limit,
            scoring_policy: config.scoring_policy,
        }
    }
}

/// Generates personalized watch recommendations
///
/// Combines the user's favorites into a taste profile, ranks a pool of popular
/// catalog items against it and backfills with the most popular leftovers.
/// Stateless per request; only the detail cache is shared between requests.
#[derive(Clone)]
pub struct RecommendationEngine {
    metadata: MetadataClient,
    favorites: Arc<dyn FavoritesProvider>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        metadata: MetadataClient,
        favorites: Arc<dyn FavoritesProvider>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            metadata,
            favorites,
            settings,
        }
    }

    /// Wires the TMDb and favorites HTTP providers described by `config`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let ttl = Duration::from_secs(config.detail_cache_ttl_secs);
        let empty_ttl = Duration::from_secs(config.detail_cache_empty_ttl_secs).min(ttl);
        let details = DetailCache::with_empty_ttl(config.detail_cache_capacity, ttl, empty_ttl);
        let metadata = MetadataClient::new(Arc::new(TmdbProvider::from_config(config)?), details);
        let favorites = Arc::new(FavoritesApi::from_config(config)?);

        Ok(Self::new(
            metadata,
            favorites,
            EngineSettings::from_config(config),
        ))
    }

    /// Top recommendations for `user_id`, at most `settings.limit` items
    ///
    /// Never fails: a favorites outage yields an empty list, any other upstream
    /// failure only shrinks the data the ranking works with.
    #[instrument(skip(self))]
    pub async fn generate_recommendations(&self, user_id: u64) -> Vec<CandidateItem> {
        let favorites = match self.favorites.fetch_favorites(user_id).await {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::warn!(
                    user_id = user_id,
                    error = %e,
                    "Favorites unavailable, returning no recommendations"
                );
                return Vec::new();
            }
        };

        if favorites.is_empty() {
            tracing::info!(user_id = user_id, "No favorites, ranking by popularity only");
        }

        let (profile, pool) = tokio::join!(
            build_profile(&favorites, &self.metadata),
            assemble_pool(
                &self.metadata,
                &self.settings.media_kinds,
                self.settings.catalog_pages
            ),
        );

        if !favorites.is_empty() && profile.is_empty() {
            tracing::warn!(
                user_id = user_id,
                favorites = favorites.len(),
                "No favorite details available, ranking by popularity only"
            );
        }

        let candidates = exclude_favorites(pool, &favorites);
        let candidate_count = candidates.len();

        let recommendations = rank(
            candidates,
            &profile,
            self.settings.scoring_policy,
            &self.metadata,
            self.settings.limit,
        )
        .await;

        tracing::info!(
            user_id = user_id,
            favorites = favorites.len(),
            candidates = candidate_count,
            recommendations = recommendations.len(),
            "Recommendations generated"
        );

        recommendations
    }
}
