/// TMDb metadata provider
///
/// API Flow:
/// 1. Details: /{movie|tv}/{id}?append_to_response=credits → genres, cast, crew
/// 2. Catalog: /discover/{movie|tv}?sort_by=popularity.desc&... → listing page
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ApiItemDetails, ApiListing, CandidateItem, ItemDetail, ItemKey, MediaKind},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

const PROVIDER_NAME: &str = "tmdb";

/// Catalog listing policy, not configurable
const SORT_BY: &str = "popularity.desc";
const MIN_VOTE_AVERAGE: u32 = 5;
const MIN_VOTE_COUNT: u32 = 100;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    original_language: String,
}

impl TmdbProvider {
    /// Creates a provider whose every request is bounded by `timeout`
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        original_language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            original_language,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.metadata_language.clone(),
            config.catalog_original_language.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn detail_url(&self, key: ItemKey) -> String {
        format!(
            "{}/{}/{}",
            self.api_url,
            key.media_kind.tmdb_segment(),
            key.item_id
        )
    }

    fn discover_url(&self, media_kind: MediaKind) -> String {
        format!("{}/discover/{}", self.api_url, media_kind.tmdb_segment())
    }

    fn discover_query(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("api_key", self.api_key.clone()),
            ("language", self.language.clone()),
            ("sort_by", SORT_BY.to_string()),
            ("vote_average.gte", MIN_VOTE_AVERAGE.to_string()),
            ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
            ("with_original_language", self.original_language.clone()),
            ("page", page.to_string()),
        ]
    }

    /// Sends a GET and returns the body of a successful response
    async fn get_text(&self, request: reqwest::RequestBuilder) -> AppResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::upstream(PROVIDER_NAME, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::upstream(PROVIDER_NAME, e))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_detail(&self, key: ItemKey) -> AppResult<ItemDetail> {
        let request = self.http_client.get(self.detail_url(key)).query(&[
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
            ("append_to_response", "credits"),
        ]);

        let body = self.get_text(request).await?;

        let details: ApiItemDetails = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(item = %key, response = %body, "Unexpected TMDb detail body");
            AppError::MalformedResponse(format!("Failed to parse TMDb detail for {}: {}", key, e))
        })?;

        let detail = details.into_detail(key);

        tracing::debug!(
            item = %key,
            genres = detail.genres.len(),
            cast = detail.cast.len(),
            crew = detail.crew.len(),
            provider = PROVIDER_NAME,
            "Detail fetched"
        );

        Ok(detail)
    }

    async fn fetch_catalog_page(
        &self,
        media_kind: MediaKind,
        page: u32,
    ) -> AppResult<Vec<CandidateItem>> {
        let request = self
            .http_client
            .get(self.discover_url(media_kind))
            .query(&self.discover_query(page));

        let body = self.get_text(request).await?;

        // Records stay raw so one unreadable listing does not fail the page
        #[derive(Deserialize)]
        struct DiscoverPage {
            results: Vec<serde_json::Value>,
        }

        let discover_page: DiscoverPage = serde_json::from_str(&body).map_err(|e| {
            AppError::MalformedResponse(format!("Failed to parse TMDb discover page: {}", e))
        })?;

        let candidates: Vec<CandidateItem> = discover_page
            .results
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<ApiListing>(record) {
                Ok(listing) => Some(listing.into_candidate(media_kind)),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable catalog record");
                    None
                }
            })
            .collect();

        tracing::debug!(
            media_kind = %media_kind,
            page = page,
            results = candidates.len(),
            provider = PROVIDER_NAME,
            "Catalog page fetched"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
