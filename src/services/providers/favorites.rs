use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::FavoriteEntry,
    services::providers::FavoritesProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

/// Client for the favorites service: GET /api/favorites/{user_id}
#[derive(Clone)]
pub struct FavoritesApi {
    http_client: HttpClient,
    api_url: String,
}

impl FavoritesApi {
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.favorites_api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

#[async_trait::async_trait]
impl FavoritesProvider for FavoritesApi {
    async fn fetch_favorites(&self, user_id: u64) -> AppResult<Vec<FavoriteEntry>> {
        let url = format!("{}/api/favorites/{}", self.api_url, user_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::upstream("favorites", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "Favorites API returned status {}: {}",
                status, body
            )));
        }

        let favorites: Vec<FavoriteEntry> = response
            .json()
            .await
            .map_err(|e| AppError::upstream("favorites", e))?;

        tracing::info!(
            user_id = user_id,
            favorites = favorites.len(),
            "Favorites fetched"
        );

        Ok(favorites)
    }
}
