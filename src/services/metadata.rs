use std::sync::Arc;

use crate::{
    cache::DetailCache,
    models::{CandidateItem, ItemDetail, ItemKey, MediaKind},
    services::providers::MetadataProvider,
};

/// Memoized, non-failing access to item metadata
///
/// Every upstream failure is logged here and replaced by empty data, so callers
/// can treat a missing detail as "contributes zero weight" and a missing page
/// as "no candidates from that page".
#[derive(Clone)]
pub struct MetadataClient {
    provider: Arc<dyn MetadataProvider>,
    details: DetailCache,
}

impl MetadataClient {
    pub fn new(provider: Arc<dyn MetadataProvider>, details: DetailCache) -> Self {
        Self { provider, details }
    }

    /// Genres and credits for `key`, fetched at most once while cached
    pub async fn detail(&self, key: ItemKey) -> ItemDetail {
        let provider = Arc::clone(&self.provider);

        self.details
            .get_or_fetch(key, async move {
                match provider.fetch_detail(key).await {
                    Ok(detail) => detail,
                    Err(e) => {
                        tracing::warn!(
                            item = %key,
                            provider = provider.name(),
                            error = %e,
                            "Detail unavailable, using empty detail"
                        );
                        ItemDetail::empty(key)
                    }
                }
            })
            .await
    }

    /// One catalog page; empty when the page cannot be fetched
    pub async fn catalog_page(&self, media_kind: MediaKind, page: u32) -> Vec<CandidateItem> {
        match self.provider.fetch_catalog_page(media_kind, page).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    media_kind = %media_kind,
                    page = page,
                    provider = self.provider.name(),
                    error = %e,
                    "Catalog page unavailable, skipping"
                );
                Vec::new()
            }
        }
    }
}
