use serde::Deserialize;

use crate::services::ranking::ScoringPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDb v3 API key
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL of the service that stores user favorites
    #[serde(default = "default_favorites_api_url")]
    pub favorites_api_url: String,

    /// Language requested for details and catalog listings
    #[serde(default = "default_metadata_language")]
    pub metadata_language: String,

    /// Original-language filter for catalog listings
    #[serde(default = "default_catalog_original_language")]
    pub catalog_original_language: String,

    /// Timeout applied to every outbound HTTP call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Catalog pages fetched per media kind
    #[serde(default = "default_catalog_pages")]
    pub catalog_pages: u32,

    /// Length of the computed recommendation list
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Maximum number of item details kept in memory
    #[serde(default = "default_detail_cache_capacity")]
    pub detail_cache_capacity: u64,

    /// Lifetime of a cached item detail
    #[serde(default = "default_detail_cache_ttl_secs")]
    pub detail_cache_ttl_secs: u64,

    /// Lifetime of an empty detail left by a failed fetch; capped at the full TTL
    #[serde(default = "default_detail_cache_empty_ttl_secs")]
    pub detail_cache_empty_ttl_secs: u64,

    #[serde(default)]
    pub scoring_policy: ScoringPolicy,

    /// Allowed CORS origin; any origin when unset
    #[serde(default)]
    pub cors_origin: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_favorites_api_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_metadata_language() -> String {
    "ru-RU".to_string()
}

fn default_catalog_original_language() -> String {
    "en".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_catalog_pages() -> u32 {
    5
}

fn default_recommendation_limit() -> usize {
    20
}

fn default_detail_cache_capacity() -> u64 {
    10_000
}

fn default_detail_cache_ttl_secs() -> u64 {
    86_400
}

fn default_detail_cache_empty_ttl_secs() -> u64 {
    300
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.catalog_pages, 5);
        assert_eq!(config.recommendation_limit, 20);
        assert_eq!(config.detail_cache_ttl_secs, 86_400);
        assert_eq!(config.detail_cache_empty_ttl_secs, 300);
        assert_eq!(config.scoring_policy, ScoringPolicy::Lightweight);
        assert_eq!(config.cors_origin, None);
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("CATALOG_PAGES", "3"),
            ("SCORING_POLICY", "full_detail"),
            ("CORS_ORIGIN", "https://example.org"),
        ]))
        .unwrap();

        assert_eq!(config.catalog_pages, 3);
        assert_eq!(config.scoring_policy, ScoringPolicy::FullDetail);
        assert_eq!(config.cors_origin.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = envy::from_iter::<_, Config>(vars(&[]));
        assert!(result.is_err());
    }
}
