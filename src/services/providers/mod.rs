/// Upstream data providers
///
/// Each provider wraps one external HTTP service and reports every failure as
/// an `AppError`. Providers never retry and never substitute defaults; turning
/// failures into empty data is the caller's decision (see
/// `services::metadata::MetadataClient` and `services::recommendations`).
use crate::{
    error::AppResult,
    models::{CandidateItem, FavoriteEntry, ItemDetail, ItemKey, MediaKind},
};

pub mod favorites;
pub mod tmdb;

pub use favorites::FavoritesApi;
pub use tmdb::TmdbProvider;

/// Source of item details and catalog listings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch genres and credits for one item
    async fn fetch_detail(&self, key: ItemKey) -> AppResult<ItemDetail>;

    /// Fetch one page of the popular, well-rated catalog listing for `media_kind`
    ///
    /// Records are already tagged with `media_kind`. Pages are 1-based.
    async fn fetch_catalog_page(
        &self,
        media_kind: MediaKind,
        page: u32,
    ) -> AppResult<Vec<CandidateItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Source of a user's saved items
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoritesProvider: Send + Sync {
    async fn fetch_favorites(&self, user_id: u64) -> AppResult<Vec<FavoriteEntry>>;
}
